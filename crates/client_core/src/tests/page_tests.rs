use super::*;
use crate::{error::ClientError, render::EnglishCatalog};
use async_trait::async_trait;
use shared::{
    domain::{OrganisationUrls, UrlKey},
    protocol::UpdateOrganisationRequest,
};
use std::sync::Mutex as StdMutex;
use tokio::sync::Notify;

#[derive(Default)]
struct FakeApi {
    fetch_result: StdMutex<Option<Result<Organisation, ClientError>>>,
    update_result: StdMutex<Option<Result<Organisation, ClientError>>>,
    updates: StdMutex<Vec<UpdateOrganisationRequest>>,
    hold_fetch: Option<Arc<Notify>>,
}

impl FakeApi {
    fn fetching(result: Result<Organisation, ClientError>) -> Self {
        Self {
            fetch_result: StdMutex::new(Some(result)),
            ..Self::default()
        }
    }

    fn with_update(self, result: Result<Organisation, ClientError>) -> Self {
        *self.update_result.lock().expect("lock") = Some(result);
        self
    }

    fn holding_fetch(mut self, gate: Arc<Notify>) -> Self {
        self.hold_fetch = Some(gate);
        self
    }

    fn update_count(&self) -> usize {
        self.updates.lock().expect("lock").len()
    }
}

#[async_trait]
impl OrganisationApi for FakeApi {
    async fn fetch_organisation(&self, _id: &OrganisationId) -> Result<Organisation, ClientError> {
        if let Some(gate) = &self.hold_fetch {
            gate.notified().await;
        }
        self.fetch_result
            .lock()
            .expect("lock")
            .take()
            .unwrap_or_else(|| Err(ClientError::Transport("no fetch scripted".into())))
    }

    async fn update_organisation(
        &self,
        _id: &OrganisationId,
        request: &UpdateOrganisationRequest,
    ) -> Result<Organisation, ClientError> {
        self.updates.lock().expect("lock").push(request.clone());
        self.update_result
            .lock()
            .expect("lock")
            .take()
            .unwrap_or_else(|| Err(ClientError::Transport("no update scripted".into())))
    }
}

#[derive(Default)]
struct RecordingNavigator {
    pushed: StdMutex<Vec<Route>>,
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: Route) {
        self.pushed.lock().expect("lock").push(route);
    }
}

fn acme() -> Organisation {
    Organisation {
        name: Some("Acme".into()),
        language: Some("en".into()),
        about: Some("desc".into()),
        urls: OrganisationUrls {
            twitter: Some("acme".into()),
            ..OrganisationUrls::default()
        },
        ..Organisation::default()
    }
}

struct Harness {
    api: Arc<FakeApi>,
    store: Arc<OrganisationStore>,
    navigator: Arc<RecordingNavigator>,
    page: Arc<EditOrganisationProfilePage>,
}

fn harness(api: FakeApi) -> Harness {
    let api = Arc::new(api);
    let store = Arc::new(OrganisationStore::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let page = Arc::new(EditOrganisationProfilePage::new(
        OrganisationId::new("123"),
        api.clone(),
        store.clone(),
        navigator.clone(),
    ));
    Harness {
        api,
        store,
        navigator,
        page,
    }
}

#[tokio::test]
async fn mount_prefills_form_from_loaded_organisation() {
    let h = harness(FakeApi::fetching(Ok(acme())));

    h.page.mount().await;

    let state = h.store.snapshot().await;
    assert!(!state.loading);
    assert_eq!(state.organisation, Some(acme()));
    let form = h.page.form().await;
    assert_eq!(form.value(FieldKey::About), "desc");
    assert_eq!(form.value(FieldKey::Language), "en");
    assert_eq!(form.value(FieldKey::Url(UrlKey::Twitter)), "acme");
}

#[tokio::test]
async fn transport_failure_on_load_is_stored_with_prefix() {
    let h = harness(FakeApi::fetching(Err(ClientError::Transport(
        "Network Error".into(),
    ))));

    h.page.mount().await;

    let state = h.store.snapshot().await;
    assert!(!state.loading);
    assert_eq!(
        state.error.as_deref(),
        Some("Failed loading profile, reason: Network Error")
    );
}

#[tokio::test]
async fn server_message_on_load_failure_wins_over_status() {
    let h = harness(FakeApi::fetching(Err(ClientError::Api {
        status: 404,
        message: Some("Organisation not found".into()),
    })));

    h.page.mount().await;

    assert_eq!(
        h.store.snapshot().await.error.as_deref(),
        Some("Failed loading profile, reason: Organisation not found")
    );
}

#[tokio::test]
async fn valid_submit_patches_and_navigates_to_returned_id() {
    let saved = Organisation {
        id: Some(OrganisationId::new("123")),
        about: Some("new desc".into()),
        ..acme()
    };
    let h = harness(FakeApi::fetching(Ok(acme())).with_update(Ok(saved.clone())));
    h.page.mount().await;

    h.page.set_field(FieldKey::About, "new desc").await;
    let outcome = h.page.submit().await;

    let redirect = Route::Organisation {
        id: OrganisationId::new("123"),
    };
    assert_eq!(
        outcome,
        SubmitOutcome::Saved {
            organisation: saved.clone(),
            redirect: redirect.clone(),
        }
    );
    assert_eq!(*h.navigator.pushed.lock().expect("lock"), vec![redirect]);
    assert_eq!(redirect_path(&h), "/organisation/123");

    let sent = h.api.updates.lock().expect("lock")[0].clone();
    assert_eq!(sent.about.as_deref(), Some("new desc"));
    assert_eq!(sent.urls.expect("urls").twitter, "acme");

    let state = h.store.snapshot().await;
    assert!(!state.updating);
    assert_eq!(state.organisation, Some(saved));
}

fn redirect_path(h: &Harness) -> String {
    h.navigator.pushed.lock().expect("lock")[0].path()
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_api() {
    let h = harness(FakeApi::fetching(Ok(acme())));
    h.page.mount().await;

    h.page
        .set_field(FieldKey::Url(UrlKey::Twitter), "not valid!")
        .await;
    h.page.set_field(FieldKey::About, "x".repeat(161)).await;
    let outcome = h.page.submit().await;

    let errors = match outcome {
        SubmitOutcome::Invalid(errors) => errors,
        other => panic!("expected validation failure, got {other:?}"),
    };
    assert_eq!(errors.get(FieldKey::About), Some("Max. 160 characters"));
    assert!(errors.get(FieldKey::Url(UrlKey::Twitter)).is_some());
    assert_eq!(h.api.update_count(), 0);
    assert!(h.navigator.pushed.lock().expect("lock").is_empty());
    assert!(!h.store.snapshot().await.updating);
}

#[tokio::test]
async fn failed_update_is_stored_and_can_be_retried() {
    let h = harness(FakeApi::fetching(Ok(acme())).with_update(Err(ClientError::Api {
        status: 500,
        message: None,
    })));
    h.page.mount().await;

    let outcome = h.page.submit().await;

    let expected =
        "Failed updating organisation profile, reason: Request failed with status code 500";
    assert_eq!(outcome, SubmitOutcome::Failed(expected.to_string()));
    let state = h.store.snapshot().await;
    assert_eq!(state.error.as_deref(), Some(expected));
    assert!(!state.updating);
    assert!(h.navigator.pushed.lock().expect("lock").is_empty());

    *h.api.update_result.lock().expect("lock") = Some(Ok(Organisation {
        id: Some(OrganisationId::new("123")),
        ..acme()
    }));
    assert!(matches!(h.page.submit().await, SubmitOutcome::Saved { .. }));
    assert_eq!(h.api.update_count(), 2);
}

#[tokio::test]
async fn missing_id_in_update_response_redirects_with_route_id() {
    let h = harness(FakeApi::fetching(Ok(acme())).with_update(Ok(acme())));
    h.page.mount().await;

    let outcome = h.page.submit().await;

    let redirect = match outcome {
        SubmitOutcome::Saved { redirect, .. } => redirect,
        other => panic!("expected save, got {other:?}"),
    };
    assert_eq!(redirect.path(), "/organisation/123");
}

#[tokio::test]
async fn late_load_after_unmount_is_dropped() {
    let gate = Arc::new(Notify::new());
    let h = harness(FakeApi::fetching(Ok(acme())).holding_fetch(gate.clone()));

    let page = h.page.clone();
    let mount = tokio::spawn(async move { page.mount().await });
    tokio::task::yield_now().await;
    while !h.store.snapshot().await.loading {
        tokio::task::yield_now().await;
    }

    h.page.unmount();
    gate.notify_one();
    mount.await.expect("mount task");

    let state = h.store.snapshot().await;
    assert_eq!(state.organisation, None);
    assert!(!state.loading, "an abandoned fetch must not leave the store loading");
    assert_eq!(h.page.form().await.value(FieldKey::About), "");
}

#[tokio::test]
async fn late_update_after_unmount_is_discarded() {
    let saved = Organisation {
        id: Some(OrganisationId::new("123")),
        ..acme()
    };
    let h = harness(FakeApi::fetching(Ok(acme())).with_update(Ok(saved)));
    h.page.mount().await;

    h.page.unmount();
    let outcome = h.page.submit().await;

    assert_eq!(outcome, SubmitOutcome::Discarded);
    assert_eq!(h.api.update_count(), 1);
    assert!(h.navigator.pushed.lock().expect("lock").is_empty());
    let state = h.store.snapshot().await;
    assert!(!state.updating);
    assert_eq!(state.organisation, Some(acme()));
}

#[tokio::test]
async fn submit_after_failed_load_sends_nothing() {
    let h = harness(FakeApi::fetching(Err(ClientError::Transport(
        "Network Error".into(),
    )))
    .with_update(Ok(acme())));
    h.page.mount().await;

    h.page.set_field(FieldKey::Language, "de").await;
    let outcome = h.page.submit().await;

    assert_eq!(outcome, SubmitOutcome::NotLoaded);
    assert_eq!(h.api.update_count(), 0);
    assert!(h.navigator.pushed.lock().expect("lock").is_empty());
    assert_eq!(
        h.store.snapshot().await.error.as_deref(),
        Some("Failed loading profile, reason: Network Error")
    );
}

#[tokio::test]
async fn render_reflects_store_and_form() {
    let h = harness(FakeApi::fetching(Ok(acme())));
    h.page.mount().await;

    let PageView::Loaded(view) = h.page.render(&EnglishCatalog).await else {
        panic!("expected loaded view");
    };
    assert_eq!(view.initials.as_deref(), Some("A"));
    assert_eq!(view.fields[0].value, "desc");
}

#[test]
fn page_only_accepts_profile_route() {
    let api: Arc<dyn OrganisationApi> = Arc::new(FakeApi::default());
    let store = Arc::new(OrganisationStore::new());
    let navigator: Arc<dyn Navigator> = Arc::new(RecordingNavigator::default());

    let route: Route = "/edit-organisation-profile/abc".parse().expect("route");
    let page = EditOrganisationProfilePage::for_route(
        &route,
        api.clone(),
        store.clone(),
        navigator.clone(),
    )
    .expect("profile route");
    assert_eq!(page.organisation_id(), &OrganisationId::new("abc"));

    let account: Route = "/edit-organisation-account/abc".parse().expect("route");
    assert!(EditOrganisationProfilePage::for_route(&account, api, store, navigator).is_err());
}
