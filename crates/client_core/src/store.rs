//! Organisation state container shared by the profile pages.

use shared::domain::Organisation;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganisationState {
    /// A fetch is in flight.
    pub loading: bool,
    /// A profile update is in flight.
    pub updating: bool,
    pub organisation: Option<Organisation>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrganisationAction {
    FetchStart,
    FetchSuccess(Organisation),
    FetchError(String),
    UpdateStart,
    UpdateSuccess(Organisation),
    UpdateError(String),
    /// The page that started a fetch went away before it resolved.
    FetchAbandoned,
    /// The page that started an update went away before it resolved.
    UpdateAbandoned,
}

impl OrganisationAction {
    pub fn name(&self) -> &'static str {
        match self {
            OrganisationAction::FetchStart => "fetch_start",
            OrganisationAction::FetchSuccess(_) => "fetch_success",
            OrganisationAction::FetchError(_) => "fetch_error",
            OrganisationAction::UpdateStart => "update_start",
            OrganisationAction::UpdateSuccess(_) => "update_success",
            OrganisationAction::UpdateError(_) => "update_error",
            OrganisationAction::FetchAbandoned => "fetch_abandoned",
            OrganisationAction::UpdateAbandoned => "update_abandoned",
        }
    }
}

pub fn reduce(state: &mut OrganisationState, action: OrganisationAction) {
    match action {
        OrganisationAction::FetchStart => {
            state.loading = true;
            state.error = None;
        }
        OrganisationAction::FetchSuccess(organisation) => {
            state.loading = false;
            state.organisation = Some(organisation);
            state.error = None;
        }
        OrganisationAction::FetchError(message) => {
            state.loading = false;
            state.error = Some(message);
        }
        OrganisationAction::UpdateStart => {
            state.updating = true;
            state.error = None;
        }
        OrganisationAction::UpdateSuccess(organisation) => {
            state.updating = false;
            state.organisation = Some(organisation);
            state.error = None;
        }
        OrganisationAction::UpdateError(message) => {
            state.updating = false;
            state.error = Some(message);
        }
        OrganisationAction::FetchAbandoned => state.loading = false,
        OrganisationAction::UpdateAbandoned => state.updating = false,
    }
}

/// Serializes dispatched actions through [`reduce`] and broadcasts each
/// resulting state.
pub struct OrganisationStore {
    state: Mutex<OrganisationState>,
    events: broadcast::Sender<OrganisationState>,
}

impl Default for OrganisationStore {
    fn default() -> Self {
        Self::with_state(OrganisationState::default())
    }
}

impl OrganisationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: OrganisationState) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            state: Mutex::new(state),
            events,
        }
    }

    pub async fn dispatch(&self, action: OrganisationAction) -> OrganisationState {
        let action_name = action.name();
        let mut guard = self.state.lock().await;
        reduce(&mut guard, action);
        let snapshot = guard.clone();
        drop(guard);

        debug!(action = action_name, "organisation store: action dispatched");
        // No subscribers is fine.
        let _ = self.events.send(snapshot.clone());
        snapshot
    }

    pub async fn snapshot(&self) -> OrganisationState {
        self.state.lock().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrganisationState> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
