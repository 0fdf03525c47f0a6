use serde::{Deserialize, Serialize};

use crate::domain::{OrganisationUrls, UrlKey};

/// Body of `PATCH /api/organisations/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrganisationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<UrlsPatch>,
}

/// Submitted links. Every key is sent, empty strings included, so a cleared
/// input clears the stored link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlsPatch {
    pub app_store: String,
    pub play_store: String,
    pub twitter: String,
    pub linkedin: String,
    pub website: String,
}

impl UrlsPatch {
    pub fn get(&self, key: UrlKey) -> &str {
        match key {
            UrlKey::AppStore => &self.app_store,
            UrlKey::PlayStore => &self.play_store,
            UrlKey::Twitter => &self.twitter,
            UrlKey::Linkedin => &self.linkedin,
            UrlKey::Website => &self.website,
        }
    }

    pub fn get_mut(&mut self, key: UrlKey) -> &mut String {
        match key {
            UrlKey::AppStore => &mut self.app_store,
            UrlKey::PlayStore => &mut self.play_store,
            UrlKey::Twitter => &mut self.twitter,
            UrlKey::Linkedin => &mut self.linkedin,
            UrlKey::Website => &mut self.website,
        }
    }
}

impl From<&OrganisationUrls> for UrlsPatch {
    fn from(urls: &OrganisationUrls) -> Self {
        let field = |key: UrlKey| urls.get(key).unwrap_or_default().to_string();
        Self {
            app_store: field(UrlKey::AppStore),
            play_store: field(UrlKey::PlayStore),
            twitter: field(UrlKey::Twitter),
            linkedin: field(UrlKey::Linkedin),
            website: field(UrlKey::Website),
        }
    }
}
