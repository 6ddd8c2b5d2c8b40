//! Search query models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Only active registrations are searched
pub const SEARCH_STATUS: &str = "aktiv";

/// Earliest selectable participant birth year
pub const BIRTH_YEAR_MIN: i32 = 1900;

/// Latest selectable participant birth year
pub const BIRTH_YEAR_MAX: i32 = 2020;

/// Legal forms accepted by the registry search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalForm {
    #[serde(rename = "AG")]
    Ag,
    #[serde(rename = "AG+Co KG")]
    AgCoKg,
    #[serde(rename = "AG+Co OHG")]
    AgCoOhg,
    #[serde(rename = "AöR")]
    Aoer,
    #[serde(rename = "EGB")]
    Egb,
    #[serde(rename = "EWIV")]
    Ewiv,
    #[serde(rename = "GmbH")]
    Gmbh,
    #[serde(rename = "GmbH+Co KG")]
    GmbhCoKg,
    #[serde(rename = "GmbH+Co OHG")]
    GmbhCoOhg,
    #[serde(rename = "JPpR")]
    Jppr,
    #[serde(rename = "KG")]
    Kg,
    #[serde(rename = "KGaA")]
    Kgaa,
    #[serde(rename = "KöR")]
    Koer,
    #[serde(rename = "OHG")]
    Ohg,
    #[serde(rename = "RAR")]
    Rar,
    #[serde(rename = "SE")]
    Se,
    #[serde(rename = "SJP")]
    Sjp,
    #[serde(rename = "StbR")]
    Stbr,
    #[serde(rename = "UG (haftungsbeschränkt)")]
    Ug,
    #[serde(rename = "VVaG")]
    Vvag,
    #[serde(rename = "eK")]
    Ek,
}

impl LegalForm {
    /// Every legal form, in the order the registry lists them.
    pub const ALL: [LegalForm; 21] = [
        LegalForm::Ag,
        LegalForm::AgCoKg,
        LegalForm::AgCoOhg,
        LegalForm::Aoer,
        LegalForm::Egb,
        LegalForm::Ewiv,
        LegalForm::Gmbh,
        LegalForm::GmbhCoKg,
        LegalForm::GmbhCoOhg,
        LegalForm::Jppr,
        LegalForm::Kg,
        LegalForm::Kgaa,
        LegalForm::Koer,
        LegalForm::Ohg,
        LegalForm::Rar,
        LegalForm::Se,
        LegalForm::Sjp,
        LegalForm::Stbr,
        LegalForm::Ug,
        LegalForm::Vvag,
        LegalForm::Ek,
    ];

    /// Label used on the wire and in the registry.
    pub fn label(&self) -> &'static str {
        match self {
            LegalForm::Ag => "AG",
            LegalForm::AgCoKg => "AG+Co KG",
            LegalForm::AgCoOhg => "AG+Co OHG",
            LegalForm::Aoer => "AöR",
            LegalForm::Egb => "EGB",
            LegalForm::Ewiv => "EWIV",
            LegalForm::Gmbh => "GmbH",
            LegalForm::GmbhCoKg => "GmbH+Co KG",
            LegalForm::GmbhCoOhg => "GmbH+Co OHG",
            LegalForm::Jppr => "JPpR",
            LegalForm::Kg => "KG",
            LegalForm::Kgaa => "KGaA",
            LegalForm::Koer => "KöR",
            LegalForm::Ohg => "OHG",
            LegalForm::Rar => "RAR",
            LegalForm::Se => "SE",
            LegalForm::Sjp => "SJP",
            LegalForm::Stbr => "StbR",
            LegalForm::Ug => "UG (haftungsbeschränkt)",
            LegalForm::Vvag => "VVaG",
            LegalForm::Ek => "eK",
        }
    }
}

impl fmt::Display for LegalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LegalForm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LegalForm::ALL
            .iter()
            .copied()
            .find(|form| form.label() == s)
            .ok_or_else(|| SearchError::UnknownLegalForm(s.to_string()))
    }
}

/// Participant birth-year window, expressed as center year +/- range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthYearFilter {
    pub center: i32,
    pub range: i32,
}

impl Default for BirthYearFilter {
    fn default() -> Self {
        Self {
            center: 1960,
            range: 10,
        }
    }
}

impl BirthYearFilter {
    /// Build the filter from an inclusive year span.
    ///
    /// Both years must lie within `BIRTH_YEAR_MIN..=BIRTH_YEAR_MAX` and
    /// `min` must not exceed `max`. Center and range round down.
    pub fn from_span(min: i32, max: i32) -> Result<Self, SearchError> {
        if !(BIRTH_YEAR_MIN..=BIRTH_YEAR_MAX).contains(&min)
            || !(BIRTH_YEAR_MIN..=BIRTH_YEAR_MAX).contains(&max)
        {
            return Err(SearchError::InvalidBirthYears(format!(
                "years must be between {} and {}",
                BIRTH_YEAR_MIN, BIRTH_YEAR_MAX
            )));
        }
        if min > max {
            return Err(SearchError::InvalidBirthYears(format!(
                "{} is after {}",
                min, max
            )));
        }

        Ok(Self {
            center: (min + max).div_euclid(2),
            range: (max - min).div_euclid(2),
        })
    }

    /// Lower bound of the window
    pub fn min_year(&self) -> i32 {
        self.center - self.range
    }

    /// Upper bound of the window
    pub fn max_year(&self) -> i32 {
        self.center + self.range
    }
}

/// Criteria for a single registry search. Immutable once submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<LegalForm>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub participant_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<BirthYearFilter>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn legal_form(mut self, form: LegalForm) -> Self {
        self.legal_form = Some(form);
        self
    }

    pub fn participant_name(mut self, name: impl Into<String>) -> Self {
        self.participant_name = name.into();
        self
    }

    pub fn birth_year(mut self, filter: BirthYearFilter) -> Self {
        self.birth_year = Some(filter);
        self
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.description.trim().is_empty()
            && self.legal_form.is_none()
            && self.participant_name.trim().is_empty()
            && self.birth_year.is_none()
    }

    /// Convert to query string parameters for one batch.
    ///
    /// Empty text criteria are left out; birth-year parameters are only
    /// sent when the filter is enabled.
    pub fn to_query_params(&self, offset: usize, limit: usize) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("status", SEARCH_STATUS.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];

        let text_params = [
            ("name", &self.name),
            ("description", &self.description),
            ("participant_name", &self.participant_name),
        ];
        for (key, value) in text_params {
            let value = value.trim();
            if !value.is_empty() {
                params.push((key, value.to_string()));
            }
        }

        if let Some(form) = self.legal_form {
            params.push(("legal_form", form.label().to_string()));
        }

        if let Some(filter) = self.birth_year {
            params.push(("participant_birth_year", filter.center.to_string()));
            params.push(("participant_birth_year_range", filter.range.to_string()));
        }

        params
    }
}
