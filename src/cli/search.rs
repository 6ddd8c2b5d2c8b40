//! Search command and interactive result browser

use colored::Colorize;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use log::debug;
use tokio::sync::watch;

use crate::auth::AuthState;
use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat, SearchArgs};
use crate::client::SearchGateway;
use crate::client::models::{BirthYearFilter, LegalForm, Organization, SearchQuery};
use crate::error::{Result, SearchError};
use crate::models::{OrganizationRow, render_card, render_details};
use crate::output::json::{JsonOutput, PageMeta};
use crate::output::progress::spinner;
use crate::output::table::format_table;
use crate::saved::{SavedCompanies, SavedCompany};
use crate::search::{Notice, Outcome, PAGE_SIZE, PageMarker, SearchCache};

/// Run the search command
pub async fn run(opts: &GlobalOptions, args: &SearchArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let query = args.to_query()?;
    if query.is_empty() {
        debug!("Searching without criteria");
    }

    let mut cache = SearchCache::new(ctx.client.clone());
    let show_progress = ctx.format != OutputFormat::Json;

    let pb = spinner("Searching the register...", show_progress);
    let outcome = cache.search(query).await;
    pb.finish_and_clear();

    if outcome == Outcome::Failed {
        return Err(failure(cache.notice()).into());
    }

    if args.page > 1 {
        let pb = spinner(&format!("Loading page {}...", args.page), show_progress);
        let outcome = cache.change_page(args.page).await;
        pb.finish_and_clear();

        if outcome? == Outcome::Failed && cache.page() != args.page {
            return Err(failure(cache.notice()).into());
        }
    }

    debug!(
        "Showing page {} ({} of {} rows cached)",
        cache.page(),
        cache.cached_len(),
        cache.total()
    );

    if args.interactive {
        let saved = ctx.saved()?;
        return browse(&mut cache, &saved, ctx.store.subscribe()).await;
    }

    print_page(&cache, ctx.format)?;

    if let Some(index) = args.save {
        let company = save_row(&cache, &ctx.saved()?, index)?;
        if ctx.format != OutputFormat::Json {
            println!(
                "\n{} Saved {} ({})",
                "✓".green(),
                company.name.bold(),
                company.id.dimmed()
            );
        }
    }

    Ok(())
}

fn failure(notice: Option<&Notice>) -> SearchError {
    SearchError::Failed(
        notice
            .map(|n| n.message.clone())
            .unwrap_or_else(|| "Search failed".to_string()),
    )
}

/// Save result `index` (1-based) of the current page
fn save_row<G: SearchGateway>(
    cache: &SearchCache<G>,
    saved: &SavedCompanies,
    index: usize,
) -> Result<SavedCompany> {
    Ok(saved.save(row(cache, index)?)?)
}

/// Result `index` (1-based) on the current page
fn row<G: SearchGateway>(
    cache: &SearchCache<G>,
    index: usize,
) -> std::result::Result<&Organization, SearchError> {
    let rows = cache.current_page_slice().len();
    index
        .checked_sub(1)
        .and_then(|i| cache.on_page(i))
        .ok_or(SearchError::RowOutOfRange { index, rows })
}

fn page_meta<G: SearchGateway>(cache: &SearchCache<G>) -> PageMeta {
    PageMeta {
        page: cache.page(),
        total_pages: cache.total_pages(),
        page_size: PAGE_SIZE,
        total: cache.total(),
    }
}

/// Print the current page in the requested format
fn print_page<G: SearchGateway>(cache: &SearchCache<G>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = JsonOutput::new(cache.current_page_slice())
                .with_pagination(page_meta(cache))
                .with_notice(cache.notice().map(|n| n.message.clone()));
            println!("{}", output.to_pretty_string()?);
        }
        OutputFormat::Table => {
            let rows = OrganizationRow::page(cache.current_page_slice());
            println!("{}", format_table(&rows));
            println!("{}", page_footer(cache));
            print_notice(cache.notice());
        }
        OutputFormat::Pretty => {
            println!("{}", render_page(cache));
            print_notice(cache.notice());
        }
    }
    Ok(())
}

/// Cards for the current page with a header and pagination bar
fn render_page<G: SearchGateway>(cache: &SearchCache<G>) -> String {
    let slice = cache.current_page_slice();
    if slice.is_empty() {
        return "No companies found.".to_string();
    }

    let criteria = cache.query().map(describe_query).unwrap_or_default();
    let mut out = vec![format!(
        "{} {} {}\n",
        "Found".bold(),
        format!("{} companies", cache.total()).bold(),
        criteria.dimmed()
    )];
    out.extend(
        slice
            .iter()
            .enumerate()
            .map(|(i, org)| format!("{}\n", render_card(i + 1, org))),
    );
    out.push(page_footer(cache));
    out.join("\n")
}

/// Short summary of the criteria, e.g. `(name "Acme", GmbH, born 1950-1970)`
fn describe_query(query: &SearchQuery) -> String {
    let mut parts = Vec::new();
    let text = [
        ("name", &query.name),
        ("description", &query.description),
        ("participant", &query.participant_name),
    ];
    for (label, value) in text {
        let value = value.trim();
        if !value.is_empty() {
            parts.push(format!("{} \"{}\"", label, value));
        }
    }
    if let Some(form) = query.legal_form {
        parts.push(form.to_string());
    }
    if let Some(filter) = query.birth_year {
        parts.push(format!("born {}-{}", filter.min_year(), filter.max_year()));
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("({})", parts.join(", "))
    }
}

fn page_footer<G: SearchGateway>(cache: &SearchCache<G>) -> String {
    format!(
        "Page {} of {}   {}",
        cache.page(),
        cache.total_pages().max(1),
        pagination_bar(&cache.page_window(), cache.page())
    )
}

/// `1 … 4 [5] 6 … 12` style bar
fn pagination_bar(markers: &[PageMarker], current: usize) -> String {
    markers
        .iter()
        .map(|marker| match marker {
            PageMarker::Page(n) if *n == current => format!("[{}]", n).bold().to_string(),
            other => other.to_string().dimmed().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_warning(err: &dyn std::fmt::Display) {
    eprintln!("{} {}", "⚠".yellow(), err);
}

fn print_notice(notice: Option<&Notice>) {
    if let Some(notice) = notice {
        eprintln!("\n{} {}", "⚠".yellow(), notice.message.yellow());
        if notice.reauth {
            eprintln!("  → Run 'regsearch signin', then search again");
        }
    }
}

/// Actions offered by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Next,
    Previous,
    Jump,
    Details,
    Save,
    Clear,
    NewSearch,
    Quit,
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Action::Next => "Next page",
            Action::Previous => "Previous page",
            Action::Jump => "Jump to page",
            Action::Details => "Show details",
            Action::Save => "Save a company",
            Action::Clear => "Clear results",
            Action::NewSearch => "New search",
            Action::Quit => "Quit",
        }
    }
}

/// Actions that make sense for the current state of the cache
fn available_actions<G: SearchGateway>(cache: &SearchCache<G>) -> Vec<Action> {
    let mut actions = Vec::new();
    let has_rows = !cache.current_page_slice().is_empty();

    if cache.page() < cache.total_pages() {
        actions.push(Action::Next);
    }
    if cache.page() > 1 {
        actions.push(Action::Previous);
    }
    if cache.total_pages() > 1 {
        actions.push(Action::Jump);
    }
    if has_rows {
        actions.push(Action::Details);
        actions.push(Action::Save);
    }
    if cache.query().is_some() {
        actions.push(Action::Clear);
    }
    actions.push(Action::NewSearch);
    actions.push(Action::Quit);
    actions
}

/// Interactive loop over the result pages
async fn browse<G: SearchGateway>(
    cache: &mut SearchCache<G>,
    saved: &SavedCompanies,
    mut auth: watch::Receiver<AuthState>,
) -> Result<()> {
    let theme = ColorfulTheme::default();
    println!("{}", render_page(cache));
    print_notice(cache.notice());

    loop {
        if auth.has_changed().unwrap_or(false) && !auth.borrow_and_update().is_authenticated() {
            eprintln!(
                "\n{} Your session ended. Run 'regsearch signin' in another terminal to keep browsing.",
                "⚠".yellow()
            );
        }

        let actions = available_actions(cache);
        let labels: Vec<&str> = actions.iter().map(Action::label).collect();
        let Some(choice) = Select::with_theme(&theme)
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact_opt()?
        else {
            return Ok(());
        };

        let moved = match actions[choice] {
            Action::Quit => return Ok(()),
            Action::Next => Some(cache.page() + 1),
            Action::Previous => Some(cache.page() - 1),
            Action::Jump => {
                let page: usize = Input::with_theme(&theme)
                    .with_prompt(format!("Page (1-{})", cache.total_pages()))
                    .interact_text()?;
                Some(page)
            }
            Action::Details => {
                let index = prompt_row(&theme, cache)?;
                match row(cache, index) {
                    Ok(org) => println!("\n{}\n", render_details(org)),
                    Err(e) => print_warning(&e),
                }
                None
            }
            Action::Save => {
                let index = prompt_row(&theme, cache)?;
                match save_row(cache, saved, index) {
                    Ok(company) => println!("{} Saved {}", "✓".green(), company.name.bold()),
                    Err(e) => print_warning(&e),
                }
                None
            }
            Action::Clear => {
                cache.clear();
                println!("{}", "Results cleared.".dimmed());
                None
            }
            Action::NewSearch => {
                let query = prompt_query(&theme)?;
                let pb = spinner("Searching the register...", true);
                cache.search(query).await;
                pb.finish_and_clear();
                println!("{}", render_page(cache));
                print_notice(cache.notice());
                None
            }
        };

        if let Some(page) = moved {
            let pb = spinner(&format!("Loading page {}...", page), true);
            let outcome = cache.change_page(page).await;
            pb.finish_and_clear();

            match outcome {
                Ok(_) => {
                    println!("{}", render_page(cache));
                    print_notice(cache.notice());
                }
                Err(e) => print_warning(&e),
            }
        }
    }
}

fn prompt_row<G: SearchGateway>(theme: &ColorfulTheme, cache: &SearchCache<G>) -> Result<usize> {
    let rows = cache.current_page_slice().len();
    let index: usize = Input::with_theme(theme)
        .with_prompt(format!("Result number (1-{})", rows))
        .validate_with(|n: &usize| -> std::result::Result<(), String> {
            if (1..=rows).contains(n) {
                Ok(())
            } else {
                Err(format!("Enter a number between 1 and {}", rows))
            }
        })
        .interact_text()?;
    Ok(index)
}

fn prompt_query(theme: &ColorfulTheme) -> Result<SearchQuery> {
    let text = |prompt: &str| -> Result<String> {
        let value: String = Input::with_theme(theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    };

    let mut query = SearchQuery::new()
        .name(text("Company name")?)
        .description(text("Description")?)
        .participant_name(text("Participant name")?);

    let mut forms = vec!["Any"];
    forms.extend(LegalForm::ALL.iter().map(LegalForm::label));
    let form = Select::with_theme(theme)
        .with_prompt("Legal form")
        .items(&forms)
        .default(0)
        .interact()?;
    if form > 0 {
        query = query.legal_form(LegalForm::ALL[form - 1]);
    }

    let span: String = Input::with_theme(theme)
        .with_prompt("Participant birth years, e.g. 1950-1970")
        .allow_empty(true)
        .validate_with(|s: &String| -> std::result::Result<(), String> {
            parse_year_span(s).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;
    if let Some(filter) = parse_year_span(&span)? {
        query = query.birth_year(filter);
    }

    Ok(query)
}

/// Parse `MIN-MAX`; blank input means no filter.
fn parse_year_span(input: &str) -> std::result::Result<Option<BirthYearFilter>, SearchError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let invalid = || SearchError::InvalidBirthYears(format!("expected MIN-MAX, got '{}'", input));
    let (min, max) = input.split_once('-').ok_or_else(invalid)?;
    let min = min.trim().parse().map_err(|_| invalid())?;
    let max = max.trim().parse().map_err(|_| invalid())?;

    BirthYearFilter::from_span(min, max).map(Some)
}
