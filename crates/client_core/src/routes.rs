//! Client-side routes around the profile editor.

use std::{fmt, str::FromStr};

use shared::domain::OrganisationId;

use crate::error::RouteError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    EditOrganisationProfile { id: OrganisationId },
    EditOrganisationAccount { id: OrganisationId },
    Organisation { id: OrganisationId },
}

impl Route {
    pub fn organisation_id(&self) -> &OrganisationId {
        match self {
            Route::EditOrganisationProfile { id }
            | Route::EditOrganisationAccount { id }
            | Route::Organisation { id } => id,
        }
    }

    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::EditOrganisationProfile { id } => write!(f, "/edit-organisation-profile/{id}"),
            Route::EditOrganisationAccount { id } => write!(f, "/edit-organisation-account/{id}"),
            Route::Organisation { id } => write!(f, "/organisation/{id}"),
        }
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments = trimmed.trim_matches('/').split('/');
        let section = segments.next().unwrap_or_default();
        let id = match segments.next() {
            Some(id) if !id.is_empty() => OrganisationId::new(id),
            _ => return Err(RouteError::MissingId(path.to_string())),
        };
        if segments.next().is_some() {
            return Err(RouteError::Unknown(path.to_string()));
        }

        match section {
            "edit-organisation-profile" => Ok(Route::EditOrganisationProfile { id }),
            "edit-organisation-account" => Ok(Route::EditOrganisationAccount { id }),
            "organisation" => Ok(Route::Organisation { id }),
            _ => Err(RouteError::Unknown(path.to_string())),
        }
    }
}
