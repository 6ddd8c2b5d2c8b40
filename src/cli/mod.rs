//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

use completions::saved_id_candidates;

pub mod args;
pub mod auth;
pub mod completions;
pub mod context;
pub mod saved;
pub mod search;
pub mod status;

pub use args::{OutputFormat, SearchArgs};
pub use context::CommandContext;

/// regsearch - search the German commercial register from your terminal
#[derive(Parser, Debug)]
#[command(name = "regsearch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "REGSEARCH_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "REGSEARCH_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the registry API base URL
    #[arg(long, global = true, env = "REGSEARCH_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "REGSEARCH_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with an emailed access code
    Signin {
        /// Account email (prompted when omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,
    },

    /// Create an account and sign in with an emailed access code
    Signup {
        /// Account email (prompted when omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        company: Option<String>,
    },

    /// Verify an access code without prompting
    Verify {
        /// Email the code was sent to
        #[arg(long, short = 'e')]
        email: String,

        /// Access code from the email
        #[arg(long, short = 'c')]
        code: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show session and configuration status
    Status,

    /// Search the register
    #[command(after_help = "EXAMPLES:\n  \
            regsearch search --name \"Müller\" --legal-form GmbH\n  \
            regsearch search --participant Mustermann --birth-year-min 1950 --birth-year-max 1970\n  \
            regsearch search --description software --page 3\n  \
            regsearch search --name Acme --save 2\n  \
            regsearch search --name Acme --interactive")]
    Search(SearchArgs),

    /// Manage saved companies
    #[command(subcommand)]
    Saved(SavedCommands),

    /// Generate shell completions (static)
    #[command(after_help = "\
Static completions (subcommands/flags only):
  bash:   regsearch completion bash > /etc/bash_completion.d/regsearch
  zsh:    regsearch completion zsh > \"${fpath[1]}/_regsearch\"
  fish:   regsearch completion fish > ~/.config/fish/completions/regsearch.fish

Dynamic completions (includes saved company IDs and legal forms):
  bash:   echo 'source <(COMPLETE=bash regsearch)' >> ~/.bashrc
  zsh:    echo 'source <(COMPLETE=zsh regsearch)' >> ~/.zshrc
  fish:   echo 'COMPLETE=fish regsearch | source' >> ~/.config/fish/config.fish")]
    Completion {
        /// Shell to generate completions for (static only)
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Display version information
    Version,
}

/// Saved company subcommands
#[derive(Subcommand, Debug)]
pub enum SavedCommands {
    /// List saved companies, newest first
    List,

    /// Show the full record of a saved company
    Show {
        /// Saved company ID
        #[arg(add = saved_id_candidates())]
        id: String,
    },

    /// Remove a saved company
    Remove {
        /// Saved company ID
        #[arg(add = saved_id_candidates())]
        id: String,
    },

    /// Remove all saved companies
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
