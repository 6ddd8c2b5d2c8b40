//! Saved company commands

use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use serde_json::json;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::{Result, StoreError};
use crate::models::{SavedRow, render_details};
use crate::output::Formattable;
use crate::output::json::JsonOutput;
use crate::output::table::format_fields;

/// Run the saved list command
pub fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let companies = ctx.saved()?.list()?;

    match ctx.format {
        OutputFormat::Json => println!("{}", JsonOutput::new(&companies).to_pretty_string()?),
        format => {
            let rows: Vec<SavedRow> = companies.iter().map(SavedRow::from).collect();
            rows.print(format)?;
        }
    }
    Ok(())
}

/// Run the saved show command
pub fn show(opts: &GlobalOptions, id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let company = ctx
        .saved()?
        .get(id)?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    match ctx.format {
        OutputFormat::Json => {
            let data = json!({ "saved": &company, "record": &company.record });
            println!("{}", JsonOutput::new(data).to_pretty_string()?);
        }
        OutputFormat::Table => {
            let org = company.organization();
            let or_empty = |v: &Option<String>| v.clone().unwrap_or_default();
            println!(
                "{}",
                format_fields(&[
                    ("ID", company.id.clone()),
                    ("Name", company.name.clone()),
                    ("Legal form", or_empty(&company.legal_form)),
                    ("Status", org.status_label().to_string()),
                    ("Jurisdiction", or_empty(&company.jurisdiction)),
                    ("Register no.", or_empty(&company.register_number)),
                    ("Location", org.location()),
                    ("Purpose", or_empty(&company.description)),
                    (
                        "Saved",
                        company
                            .saved_on
                            .with_timezone(&chrono::Local)
                            .format("%d.%m.%Y %H:%M")
                            .to_string(),
                    ),
                ])
            );
        }
        OutputFormat::Pretty => {
            println!("{}", render_details(&company.organization()));
            println!(
                "\n{} {}",
                "Saved on".dimmed(),
                company
                    .saved_on
                    .with_timezone(&chrono::Local)
                    .format("%d.%m.%Y %H:%M")
            );
        }
    }
    Ok(())
}

/// Run the saved remove command
pub fn remove(opts: &GlobalOptions, id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    if !ctx.saved()?.remove(id)? {
        return Err(StoreError::NotFound(id.to_string()).into());
    }

    match ctx.format {
        OutputFormat::Json => println!(
            "{}",
            JsonOutput::new(json!({ "removed": id })).to_pretty_string()?
        ),
        _ => println!("{} Removed {}", "✓".green(), id),
    }
    Ok(())
}

/// Run the saved clear command
pub fn clear(opts: &GlobalOptions, yes: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let saved = ctx.saved()?;

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Remove all saved companies?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = saved.clear()?;
    match ctx.format {
        OutputFormat::Json => println!(
            "{}",
            JsonOutput::new(json!({ "removed": removed })).to_pretty_string()?
        ),
        _ => println!(
            "{} Removed {} saved {}",
            "✓".green(),
            removed,
            if removed == 1 { "company" } else { "companies" }
        ),
    }
    Ok(())
}
