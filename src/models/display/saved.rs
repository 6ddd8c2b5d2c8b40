//! Saved company display model

use serde::Serialize;
use tabled::Tabled;

use crate::output::formatters::truncate;
use crate::saved::SavedCompany;

/// Saved company display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SavedRow {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "LEGAL FORM")]
    pub legal_form: String,

    #[tabled(rename = "JURISDICTION")]
    pub jurisdiction: String,

    #[tabled(rename = "REGISTER NO.")]
    pub register_number: String,

    /// Local date the company was saved
    #[tabled(rename = "SAVED")]
    pub saved_on: String,
}

impl From<&SavedCompany> for SavedRow {
    fn from(saved: &SavedCompany) -> Self {
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "--".to_string());
        Self {
            id: saved.id.clone(),
            name: truncate(&saved.name, 48),
            legal_form: or_dash(&saved.legal_form),
            jurisdiction: or_dash(&saved.jurisdiction),
            register_number: or_dash(&saved.register_number),
            saved_on: saved
                .saved_on
                .with_timezone(&chrono::Local)
                .format("%d.%m.%Y")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_saved_row() {
        let saved = SavedCompany {
            id: "1".to_string(),
            name: "Example GmbH".to_string(),
            legal_form: Some("GmbH".to_string()),
            status: Some("aktiv".to_string()),
            jurisdiction: None,
            register_number: Some("HRB 123456".to_string()),
            description: None,
            saved_on: Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap(),
            record: json!({}),
        };

        let row = SavedRow::from(&saved);

        assert_eq!(row.id, "1");
        assert_eq!(row.legal_form, "GmbH");
        assert_eq!(row.jurisdiction, "--");
        assert_eq!(row.register_number, "HRB 123456");
        assert!(row.saved_on.ends_with(".2025"));
    }
}
