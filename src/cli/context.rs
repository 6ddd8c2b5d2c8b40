//! Command execution context
//!
//! Loads the config once and wires the session store, API client and output
//! preferences that command handlers share.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::auth::{AuthFlow, AuthStore};
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::RegistryClient;
use crate::config::Config;
use crate::error::Result;
use crate::saved::SavedCompanies;

/// Session file name inside the data directory
pub const SESSION_FILE: &str = "session.yaml";

/// Context for command execution containing config, client, and runtime options.
pub struct CommandContext {
    /// Loaded configuration (defaults when no file exists)
    pub config: Config,
    /// Resolved config file path
    pub config_path: PathBuf,
    /// Directory holding config, session and saved companies
    pub data_dir: PathBuf,
    /// Persisted session, shared with the client
    pub store: Arc<AuthStore>,
    /// Registry API client
    pub client: Arc<RegistryClient>,
    /// Resolved output format
    pub format: OutputFormat,
    /// Pause after requesting an access code
    pub code_delay: Duration,
}

impl CommandContext {
    /// Build the context from global options.
    ///
    /// Format precedence is flag/env, then `preferences.format`, then pretty.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?;
        let config_path = Config::resolve_path(opts.config_ref())?;
        let data_dir = Config::data_dir(opts.config_ref())?;

        let store = Arc::new(AuthStore::open(data_dir.join(SESSION_FILE))?);

        let api_url = config.api_url(opts.api_url_ref());
        debug!("Using API at {}", api_url);
        let client = Arc::new(RegistryClient::new(api_url, store.clone())?);

        let format = match (opts.format, config.preferences.format.as_deref()) {
            (Some(format), _) => format,
            (None, Some(preferred)) => preferred.parse::<OutputFormat>()?,
            (None, None) => OutputFormat::default(),
        };

        let code_delay = Duration::from_millis(config.preferences.request_code_delay_ms);

        Ok(Self {
            config,
            config_path,
            data_dir,
            store,
            client,
            format,
            code_delay,
        })
    }

    /// Sign-in flow bound to this context's client and session
    pub fn auth_flow(&self) -> AuthFlow<RegistryClient> {
        AuthFlow::new(self.client.clone(), self.store.clone(), self.code_delay)
    }

    /// Write the config file with the current settings if none exists yet.
    ///
    /// Returns whether a file was created.
    pub fn ensure_config_file(&self) -> Result<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }
        self.config.save_to(self.config_path.clone())?;
        debug!("Created {}", self.config_path.display());
        Ok(true)
    }

    /// Open the saved-companies database
    pub fn saved(&self) -> Result<SavedCompanies> {
        Ok(SavedCompanies::open_at(&self.data_dir)?)
    }
}
