//! Status command implementation

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::auth::AuthState;
use crate::auth::token::{is_token_expired, mask_token, token_expiry};
use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::output::formatters::format_remaining;
use crate::output::json::JsonOutput;

/// Everything `status` reports, also the JSON payload
#[derive(Debug, Serialize)]
struct StatusReport {
    config_file: String,
    config_exists: bool,
    api_url: String,
    data_dir: String,
    session_file: String,
    auth: AuthState,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_expires: Option<DateTime<Utc>>,
    token_expired: bool,
}

/// Run the status command to display session and configuration status
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let config_path = &ctx.config_path;
    let session = ctx.store.session().await;
    let token = session.auth_token;

    let report = StatusReport {
        config_exists: config_path.exists(),
        config_file: config_path.display().to_string(),
        api_url: ctx.client.base_url().to_string(),
        data_dir: ctx.data_dir.display().to_string(),
        session_file: ctx.store.path().display().to_string(),
        auth: ctx.store.state(),
        token_expires: token.as_deref().and_then(token_expiry),
        token_expired: token.as_deref().is_some_and(is_token_expired),
        token: token.as_deref().map(mask_token),
    };

    match ctx.format {
        OutputFormat::Json => println!("{}", JsonOutput::new(&report).to_pretty_string()?),
        _ => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &StatusReport) {
    println!("{}\n", "regsearch Status".bold());

    if report.config_exists {
        println!("Config file: {}", report.config_file.cyan());
    } else {
        println!(
            "Config file: {} {}",
            report.config_file.cyan(),
            "(not created, using defaults)".dimmed()
        );
    }
    println!("API:         {}", report.api_url.cyan());
    println!("Data dir:    {}", report.data_dir.cyan());
    println!("Session:     {}", report.session_file.cyan());
    println!();

    match &report.auth {
        AuthState::Authenticated { email } => {
            let who = email.as_deref().unwrap_or("unknown account");
            println!("{} Signed in as {}", "✓".green(), who.bold());
        }
        AuthState::CodeRequested { email } => {
            println!("{} Access code requested for {}", "○".dimmed(), email.bold());
            println!("  → Run 'regsearch verify --email {} --code <CODE>'", email);
        }
        AuthState::Anonymous => {
            println!("{} Not signed in", "✗".red());
            println!("  → Run 'regsearch signin' to sign in");
        }
    }

    if let Some(token) = &report.token {
        println!("  Token: {}", token.dimmed());
        if report.token_expired {
            println!(
                "{} Token expired (the next search will ask you to sign in again)",
                "⚠".yellow()
            );
        } else if let Some(expires) = report.token_expires {
            println!(
                "{} Token valid (expires in {})",
                "✓".green(),
                format_remaining(expires, Utc::now())
            );
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_shape() {
        let report = StatusReport {
            config_file: "/tmp/config.yaml".to_string(),
            config_exists: false,
            api_url: "https://api.regsearch.de".to_string(),
            data_dir: "/tmp".to_string(),
            session_file: "/tmp/session.yaml".to_string(),
            auth: AuthState::Authenticated {
                email: Some("user@example.com".to_string()),
            },
            token: Some("eyJhbGciO...".to_string()),
            token_expires: None,
            token_expired: false,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["auth"]["state"], "authenticated");
        assert_eq!(json["auth"]["email"], "user@example.com");
        assert_eq!(json["token"], "eyJhbGciO...");
        assert!(json.get("token_expires").is_none());
    }
}
