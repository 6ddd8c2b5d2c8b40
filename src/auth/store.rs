//! Persisted session and auth-state subscriptions
//!
//! The session lives in `session.yaml` next to the config file. State changes
//! are published on a `watch` channel so any component can observe sign-in,
//! sign-out and session expiry without shared globals.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{RwLock, watch};

use super::AuthState;
use crate::config::write_private;
use crate::error::{ConfigError, Result};

/// On-disk session record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionFile {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    #[serde(rename = "userEmail", default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,

    /// User object returned by verification, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,

    /// Email awaiting an access code
    #[serde(rename = "pendingEmail", default, skip_serializing_if = "Option::is_none")]
    pub pending_email: Option<String>,

    /// Set by an explicit logout and cleared on the next load
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub user_logout: bool,
}

impl SessionFile {
    fn state(&self) -> AuthState {
        match (&self.auth_token, &self.pending_email) {
            (Some(_), _) => AuthState::Authenticated {
                email: self.user_email.clone(),
            },
            (None, Some(email)) => AuthState::CodeRequested {
                email: email.clone(),
            },
            (None, None) => AuthState::Anonymous,
        }
    }
}

/// Session store shared by the API client and the auth flow.
pub struct AuthStore {
    path: PathBuf,
    session: RwLock<SessionFile>,
    state: watch::Sender<AuthState>,
}

impl AuthStore {
    /// Open the session file, creating an empty session if it is missing.
    ///
    /// A logout flag left by the previous run is cleared here.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut session = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                SessionFile::default()
            } else {
                serde_yaml::from_str(&contents).map_err(ConfigError::from)?
            }
        } else {
            SessionFile::default()
        };

        if session.user_logout {
            debug!("Clearing logout flag from previous session");
            session.user_logout = false;
            Self::write(&path, &session)?;
        }

        let (state, _) = watch::channel(session.state());

        Ok(Self {
            path,
            session: RwLock::new(session),
            state,
        })
    }

    /// Receive every auth-state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the persisted session
    pub async fn session(&self) -> SessionFile {
        self.session.read().await.clone()
    }

    /// Token to send as `Authorization: Bearer`
    pub async fn bearer_token(&self) -> Option<String> {
        self.session.read().await.auth_token.clone()
    }

    /// Remember the email an access code was sent to.
    pub async fn mark_code_requested(&self, email: &str) -> Result<()> {
        let mut session = self.session.write().await;
        session.pending_email = Some(email.to_string());
        Self::write(&self.path, &session)?;
        if session.auth_token.is_none() {
            self.publish(session.state());
        }
        Ok(())
    }

    /// Persist a verified session and announce it.
    pub async fn establish(&self, token: &str, email: &str, user: Option<Value>) -> Result<()> {
        let mut session = self.session.write().await;
        *session = SessionFile {
            auth_token: Some(token.to_string()),
            user_email: Some(email.to_string()),
            user,
            pending_email: None,
            user_logout: false,
        };
        Self::write(&self.path, &session)?;
        self.publish(session.state());
        Ok(())
    }

    /// Explicit sign-out: everything except the logout flag is removed.
    pub async fn logout(&self) -> Result<()> {
        let mut session = self.session.write().await;
        *session = SessionFile {
            user_logout: true,
            ..SessionFile::default()
        };
        Self::write(&self.path, &session)?;
        self.publish(AuthState::Anonymous);
        Ok(())
    }

    /// The server rejected the token: drop it, keep the email for re-sign-in.
    pub async fn invalidate(&self) -> Result<()> {
        let mut session = self.session.write().await;
        if session.auth_token.is_none() && session.user.is_none() {
            return Ok(());
        }
        session.auth_token = None;
        session.user = None;
        session.pending_email = None;
        Self::write(&self.path, &session)?;
        self.publish(AuthState::Anonymous);
        Ok(())
    }

    fn publish(&self, state: AuthState) {
        debug!("Auth state -> {:?}", state);
        self.state.send_replace(state);
    }

    fn write(path: &Path, session: &SessionFile) -> Result<()> {
        let contents =
            serde_yaml::to_string(session).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        write_private(path, &contents)
    }
}
