//! Dynamic shell completions for regsearch
//!
//! Saved company IDs come from the local database, so completion works
//! offline and never touches the registry API.
//!
//! Shell support:
//! - Fish/Zsh: Full support with descriptions
//! - Bash: Values only (no description display)

use clap_complete::engine::{ArgValueCandidates, CompletionCandidate};

use crate::client::models::LegalForm;
use crate::config::Config;
use crate::output::formatters::truncate;
use crate::saved::SavedCompanies;

/// Maximum number of completion candidates to return
const MAX_COMPLETIONS: usize = 50;

/// Find a `--config` path on the partial command line or in the environment.
///
/// During completion the shell passes the command line being completed as
/// process arguments.
fn config_from_args() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    config_in(&args).or_else(|| std::env::var("REGSEARCH_CONFIG").ok())
}

fn config_in(args: &[String]) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            return iter.next().cloned();
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }
    }
    None
}

/// Complete saved company IDs.
///
/// Format: `{id}` with help `{name} | {legal form}`. Errors yield no
/// candidates so completion never breaks the shell.
pub fn complete_saved_ids() -> Vec<CompletionCandidate> {
    let config = config_from_args();
    let Ok(data_dir) = Config::data_dir(config.as_deref()) else {
        return vec![];
    };
    let Ok(saved) = SavedCompanies::open_at(&data_dir) else {
        return vec![];
    };
    let Ok(companies) = saved.list() else {
        return vec![];
    };

    companies
        .into_iter()
        .take(MAX_COMPLETIONS)
        .map(|company| {
            let help = format!(
                "{} | {}",
                truncate(&company.name, 40),
                company.legal_form.as_deref().unwrap_or("--")
            );
            CompletionCandidate::new(company.id).help(Some(help.into()))
        })
        .collect()
}

/// Complete legal form labels.
pub fn complete_legal_forms() -> Vec<CompletionCandidate> {
    LegalForm::ALL
        .iter()
        .map(|form| CompletionCandidate::new(form.label()))
        .collect()
}

/// Create completion candidates for saved company IDs.
pub fn saved_id_candidates() -> ArgValueCandidates {
    ArgValueCandidates::new(complete_saved_ids)
}

/// Create completion candidates for legal forms.
pub fn legal_form_candidates() -> ArgValueCandidates {
    ArgValueCandidates::new(complete_legal_forms)
}
