//! Edit-organisation-profile page controller: load on mount, form editing,
//! submit-and-redirect.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::domain::{Organisation, OrganisationId};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    error::RouteError,
    form::{FieldErrors, FieldKey, ProfileDraft, ProfileForm},
    render::{render_page, PageView, Translate},
    routes::Route,
    store::{OrganisationAction, OrganisationStore},
    OrganisationApi,
};

pub const LOAD_ERROR_PREFIX: &str = "Failed loading profile, reason: ";
pub const UPDATE_ERROR_PREFIX: &str = "Failed updating organisation profile, reason: ";

pub trait Navigator: Send + Sync {
    fn push(&self, route: Route);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid(FieldErrors),
    Saved {
        organisation: Organisation,
        redirect: Route,
    },
    /// The update request failed; the store holds the same message.
    Failed(String),
    /// The response arrived after unmount and was dropped.
    Discarded,
    /// No organisation has been loaded, so there is no record to edit.
    NotLoaded,
}

pub struct EditOrganisationProfilePage {
    organisation_id: OrganisationId,
    api: Arc<dyn OrganisationApi>,
    store: Arc<OrganisationStore>,
    navigator: Arc<dyn Navigator>,
    form: Mutex<ProfileForm>,
    mounted: AtomicBool,
}

impl EditOrganisationProfilePage {
    pub fn new(
        organisation_id: OrganisationId,
        api: Arc<dyn OrganisationApi>,
        store: Arc<OrganisationStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            organisation_id,
            api,
            store,
            navigator,
            form: Mutex::new(ProfileForm::default()),
            mounted: AtomicBool::new(false),
        }
    }

    /// Builds the page for `/edit-organisation-profile/{id}`; other routes are
    /// rejected.
    pub fn for_route(
        route: &Route,
        api: Arc<dyn OrganisationApi>,
        store: Arc<OrganisationStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, RouteError> {
        match route {
            Route::EditOrganisationProfile { id } => {
                Ok(Self::new(id.clone(), api, store, navigator))
            }
            other => Err(RouteError::Unknown(other.path())),
        }
    }

    pub fn organisation_id(&self) -> &OrganisationId {
        &self.organisation_id
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub async fn mount(&self) {
        self.mounted.store(true, Ordering::SeqCst);
        self.load().await;
    }

    /// Responses that resolve after this are dropped instead of dispatched.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub async fn load(&self) {
        self.store.dispatch(OrganisationAction::FetchStart).await;
        let result = self.api.fetch_organisation(&self.organisation_id).await;

        if !self.is_mounted() {
            warn!(organisation_id = %self.organisation_id, "profile load resolved after unmount; dropped");
            self.store.dispatch(OrganisationAction::FetchAbandoned).await;
            return;
        }

        match result {
            Ok(organisation) => {
                *self.form.lock().await = ProfileForm::new(Some(&organisation));
                self.store
                    .dispatch(OrganisationAction::FetchSuccess(organisation))
                    .await;
                info!(organisation_id = %self.organisation_id, "organisation profile loaded");
            }
            Err(err) => {
                let message = format!("{LOAD_ERROR_PREFIX}{}", err.reason());
                warn!(organisation_id = %self.organisation_id, error = %err, "organisation profile load failed");
                self.store
                    .dispatch(OrganisationAction::FetchError(message))
                    .await;
            }
        }
    }

    pub async fn set_field(&self, key: FieldKey, value: impl Into<String>) {
        self.form.lock().await.set(key, value);
    }

    pub async fn form(&self) -> ProfileForm {
        self.form.lock().await.clone()
    }

    /// Validates the current draft and, when it passes, sends it.
    ///
    /// Refused until a load has succeeded: the draft of a failed load is
    /// blank, and sending it would clear the stored record.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.store.snapshot().await.organisation.is_none() {
            warn!(organisation_id = %self.organisation_id, "profile submit before a successful load; refused");
            return SubmitOutcome::NotLoaded;
        }
        let validated = self.form.lock().await.handle_submit();
        match validated {
            Ok(draft) => self.submit_draft(&draft).await,
            Err(errors) => {
                info!(
                    organisation_id = %self.organisation_id,
                    invalid_fields = errors.len(),
                    "profile submit blocked by validation"
                );
                SubmitOutcome::Invalid(errors)
            }
        }
    }

    async fn submit_draft(&self, draft: &ProfileDraft) -> SubmitOutcome {
        self.store.dispatch(OrganisationAction::UpdateStart).await;
        let result = self
            .api
            .update_organisation(&self.organisation_id, &draft.to_request())
            .await;

        if !self.is_mounted() {
            warn!(organisation_id = %self.organisation_id, "profile update resolved after unmount; dropped");
            self.store.dispatch(OrganisationAction::UpdateAbandoned).await;
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(organisation) => {
                let id = match &organisation.id {
                    Some(id) => id.clone(),
                    None => {
                        warn!(
                            organisation_id = %self.organisation_id,
                            "update response has no _id; redirecting with the route id"
                        );
                        self.organisation_id.clone()
                    }
                };
                let redirect = Route::Organisation { id };
                self.store
                    .dispatch(OrganisationAction::UpdateSuccess(organisation.clone()))
                    .await;
                info!(organisation_id = %self.organisation_id, redirect = %redirect, "organisation profile updated");
                self.navigator.push(redirect.clone());
                SubmitOutcome::Saved {
                    organisation,
                    redirect,
                }
            }
            Err(err) => {
                let message = format!("{UPDATE_ERROR_PREFIX}{}", err.reason());
                warn!(organisation_id = %self.organisation_id, error = %err, "organisation profile update failed");
                self.store
                    .dispatch(OrganisationAction::UpdateError(message.clone()))
                    .await;
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub async fn render(&self, translator: &dyn Translate) -> PageView {
        let state = self.store.snapshot().await;
        let form = self.form.lock().await;
        render_page(&state, &form, &self.organisation_id, translator)
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
