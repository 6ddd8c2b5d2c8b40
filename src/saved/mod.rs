//! Companies bookmarked from search results

mod storage;

pub use storage::SavedCompanies;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::client::models::Organization;

/// A saved company with the fields shown in listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedCompany {
    pub id: String,
    pub name: String,
    pub legal_form: Option<String>,
    pub status: Option<String>,
    pub jurisdiction: Option<String>,
    pub register_number: Option<String>,
    pub description: Option<String>,
    pub saved_on: DateTime<Utc>,
    /// Full API record at the time of saving
    #[serde(skip)]
    pub record: Value,
}

impl SavedCompany {
    pub fn from_organization(org: &Organization, saved_on: DateTime<Utc>) -> Self {
        Self {
            id: org.fingerprint(),
            name: org.display_name(),
            legal_form: org.legal_form(),
            status: org.status(),
            jurisdiction: org.jurisdiction(),
            register_number: org.register_number(),
            description: org.description(),
            saved_on,
            record: org.raw().clone(),
        }
    }

    /// The saved record as a search result
    pub fn organization(&self) -> Organization {
        Organization::new(self.record.clone())
    }
}
