//! Sign-in, sign-up, verify and logout commands

use colored::Colorize;
use dialoguer::{Input, theme::ColorfulTheme};
use log::debug;

use crate::auth::AuthState;
use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::models::{CodeRequest, SignupProfile, VerifyRequest};
use crate::error::{ConfigError, Result};
use crate::output::json::JsonOutput;
use crate::output::progress::spinner;

/// Run the signin command
pub async fn signin(opts: &GlobalOptions, email: Option<String>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let email = email_or_prompt(email)?;

    run_code_flow(&ctx, CodeRequest::sign_in(&email)).await
}

/// Run the signup command
pub async fn signup(
    opts: &GlobalOptions,
    email: Option<String>,
    profile: SignupProfile,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let email = email_or_prompt(email)?;

    run_code_flow(&ctx, CodeRequest::sign_up(&email, profile)).await
}

/// Run the verify command
pub async fn verify(opts: &GlobalOptions, email: &str, code: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let request = VerifyRequest::new(&require_email(email)?, code);

    let pb = spinner("Verifying access code...", ctx.format != OutputFormat::Json);
    let result = ctx.auth_flow().verify_code(&request).await;
    pb.finish_and_clear();

    let state = result?;
    ctx.ensure_config_file()?;
    print_signed_in(&state, ctx.format)
}

/// Run the logout command
pub async fn logout(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.auth_flow().logout().await?;

    match ctx.format {
        OutputFormat::Json => println!(
            "{}",
            JsonOutput::new(AuthState::Anonymous).to_pretty_string()?
        ),
        _ => println!("{} Signed out", "✓".green()),
    }
    Ok(())
}

/// Request a code, prompt for it, then verify.
async fn run_code_flow(ctx: &CommandContext, request: CodeRequest) -> Result<()> {
    let flow = ctx.auth_flow();
    debug!("Requesting access code via {}", request.mode.endpoint());

    let pb = spinner("Requesting access code...", true);
    let outcome = flow.request_code(&request).await;
    pb.finish_and_clear();
    let outcome = outcome?;

    if outcome.delivered {
        eprintln!(
            "{} Access code sent to {}",
            "✓".green(),
            outcome.email.bold()
        );
    } else {
        eprintln!(
            "{} Could not confirm the code was sent. Check your inbox anyway.",
            "⚠".yellow()
        );
    }

    let code: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Access code")
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() {
                Err("Access code cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let pb = spinner("Verifying access code...", true);
    let state = flow
        .verify_code(&VerifyRequest::new(&outcome.email, &code))
        .await;
    pb.finish_and_clear();

    let state = state?;
    ctx.ensure_config_file()?;
    print_signed_in(&state, ctx.format)
}

fn email_or_prompt(email: Option<String>) -> Result<String> {
    match email {
        Some(email) => require_email(&email),
        None => {
            let email: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Email")
                .validate_with(|input: &String| -> std::result::Result<(), &str> {
                    if input.trim().contains('@') {
                        Ok(())
                    } else {
                        Err("Enter a valid email address")
                    }
                })
                .interact_text()?;
            Ok(email.trim().to_string())
        }
    }
}

fn require_email(email: &str) -> Result<String> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ConfigError::Invalid("Email must not be empty".to_string()).into());
    }
    Ok(email.to_string())
}

fn print_signed_in(state: &AuthState, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", JsonOutput::new(state).to_pretty_string()?),
        _ => match state {
            AuthState::Authenticated { email: Some(email) } => {
                println!("{} Signed in as {}", "✓".green(), email.bold())
            }
            _ => println!("{} Signed in", "✓".green()),
        },
    }
    Ok(())
}
