//! Search criteria arguments

use clap::Args;

use crate::cli::completions::legal_form_candidates;
use crate::client::models::{BirthYearFilter, LegalForm, SearchQuery};
use crate::error::SearchError;

/// Search criteria and paging for `regsearch search`
#[derive(Debug, Clone, Args, Default)]
pub struct SearchArgs {
    /// Company name (substring match)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Business purpose / description keywords
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Legal form, e.g. "GmbH" or "GmbH+Co KG"
    #[arg(long, short = 'l', add = legal_form_candidates())]
    pub legal_form: Option<String>,

    /// Name of a participant (managing director, partner, ...)
    #[arg(long, short = 'p')]
    pub participant: Option<String>,

    /// Earliest participant birth year (1900-2020)
    #[arg(long, requires = "birth_year_max")]
    pub birth_year_min: Option<i32>,

    /// Latest participant birth year (1900-2020)
    #[arg(long, requires = "birth_year_min")]
    pub birth_year_max: Option<i32>,

    /// Page of results to show
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Browse results interactively
    #[arg(long, short = 'i', conflicts_with = "save")]
    pub interactive: bool,

    /// Save the result with this number on the shown page
    #[arg(long, value_name = "N")]
    pub save: Option<usize>,
}

impl SearchArgs {
    /// Build the query, validating legal form and birth years.
    pub fn to_query(&self) -> Result<SearchQuery, SearchError> {
        let mut query = SearchQuery::new();

        if let Some(name) = &self.name {
            query = query.name(name.as_str());
        }
        if let Some(description) = &self.description {
            query = query.description(description.as_str());
        }
        if let Some(participant) = &self.participant {
            query = query.participant_name(participant.as_str());
        }
        if let Some(form) = &self.legal_form {
            query = query.legal_form(form.parse::<LegalForm>()?);
        }
        if let (Some(min), Some(max)) = (self.birth_year_min, self.birth_year_max) {
            query = query.birth_year(BirthYearFilter::from_span(min, max)?);
        }

        Ok(query)
    }
}
