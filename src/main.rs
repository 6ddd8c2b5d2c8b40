//! regsearch - search the German commercial register from your terminal

use clap::{CommandFactory, Parser};
use clap_complete::CompleteEnv;
use log::debug;

mod auth;
mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;
mod saved;
mod search;

use cli::args::GlobalOptions;
use cli::{Cli, Commands, SavedCommands};
use client::models::SignupProfile;
use error::Result;

#[tokio::main]
async fn main() {
    // Answers `COMPLETE=<shell> regsearch` and exits; no-op otherwise
    CompleteEnv::with_factory(Cli::command).complete();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    debug!("regsearch {}", env!("CARGO_PKG_VERSION"));

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Signin { email } => cli::auth::signin(&opts, email).await,
        Commands::Signup {
            email,
            first_name,
            last_name,
            company,
        } => {
            let profile = SignupProfile {
                first_name,
                last_name,
                company,
            };
            cli::auth::signup(&opts, email, profile).await
        }
        Commands::Verify { email, code } => cli::auth::verify(&opts, &email, &code).await,
        Commands::Logout => cli::auth::logout(&opts).await,
        Commands::Status => cli::status::run(&opts).await,
        Commands::Search(args) => cli::search::run(&opts, &args).await,
        Commands::Saved(saved_cmd) => match saved_cmd {
            SavedCommands::List => cli::saved::list(&opts),
            SavedCommands::Show { id } => cli::saved::show(&opts, &id),
            SavedCommands::Remove { id } => cli::saved::remove(&opts, &id),
            SavedCommands::Clear { yes } => cli::saved::clear(&opts, yes),
        },
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "regsearch", &mut std::io::stdout());
            Ok(())
        }
        Commands::Version => {
            println!("regsearch version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
