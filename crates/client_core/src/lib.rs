use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Organisation, OrganisationId},
    error::ApiError,
    protocol::UpdateOrganisationRequest,
};
use tracing::{debug, warn};
use url::Url;

pub mod error;
pub mod form;
pub mod page;
pub mod render;
pub mod routes;
pub mod store;

pub use error::{ClientError, RouteError};
pub use page::{EditOrganisationProfilePage, Navigator, SubmitOutcome};
pub use store::{OrganisationAction, OrganisationState, OrganisationStore};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait OrganisationApi: Send + Sync {
    async fn fetch_organisation(&self, id: &OrganisationId) -> Result<Organisation, ClientError>;
    async fn update_organisation(
        &self,
        id: &OrganisationId,
        request: &UpdateOrganisationRequest,
    ) -> Result<Organisation, ClientError>;
}

/// `OrganisationApi` over the `/api/organisations` HTTP endpoints.
pub struct HttpOrganisationApi {
    http: Client,
    base_url: Url,
}

impl HttpOrganisationApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid API base url '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API base url '{base_url}' cannot carry a path"));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, base_url })
    }

    fn organisation_url(&self, id: &OrganisationId) -> Url {
        let mut url = self.base_url.clone();
        // Checked in the constructor.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "organisations", id.as_str()]);
        }
        url
    }
}

/// Decodes a success body, or turns an error response into
/// [`ClientError::Api`] carrying the body's `message` when there is one.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&body)
        .ok()
        .and_then(|err| err.message().map(str::to_string));
    warn!(status = status.as_u16(), ?message, "organisation api: request rejected");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl OrganisationApi for HttpOrganisationApi {
    async fn fetch_organisation(&self, id: &OrganisationId) -> Result<Organisation, ClientError> {
        let url = self.organisation_url(id);
        debug!(organisation_id = %id, %url, "organisation api: GET");
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    async fn update_organisation(
        &self,
        id: &OrganisationId,
        request: &UpdateOrganisationRequest,
    ) -> Result<Organisation, ClientError> {
        let url = self.organisation_url(id);
        debug!(organisation_id = %id, %url, "organisation api: PATCH");
        let response = self.http.patch(url).json(request).send().await?;
        read_json(response).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
