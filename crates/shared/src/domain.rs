use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(OrganisationId);

/// Social and store links keyed the way the API names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UrlKey {
    AppStore,
    PlayStore,
    Twitter,
    Linkedin,
    Website,
}

impl UrlKey {
    /// Display order on the profile form.
    pub const ALL: [UrlKey; 5] = [
        UrlKey::AppStore,
        UrlKey::PlayStore,
        UrlKey::Twitter,
        UrlKey::Linkedin,
        UrlKey::Website,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UrlKey::AppStore => "appStore",
            UrlKey::PlayStore => "playStore",
            UrlKey::Twitter => "twitter",
            UrlKey::Linkedin => "linkedin",
            UrlKey::Website => "website",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_store: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_store: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl OrganisationUrls {
    pub fn get(&self, key: UrlKey) -> Option<&str> {
        match key {
            UrlKey::AppStore => self.app_store.as_deref(),
            UrlKey::PlayStore => self.play_store.as_deref(),
            UrlKey::Twitter => self.twitter.as_deref(),
            UrlKey::Linkedin => self.linkedin.as_deref(),
            UrlKey::Website => self.website.as_deref(),
        }
    }
}

/// Organisation record as served by `/api/organisations/{id}`.
///
/// Fields the editor does not model are kept in `extra` so a record can be
/// passed back to the server without losing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrganisationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default)]
    pub urls: OrganisationUrls,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
