//! Access-code sign-in flow
//!
//! `Anonymous → CodeRequested → Authenticated`, back to `Anonymous` on logout
//! or when the server answers 401.

pub mod store;
pub mod token;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::Serialize;

use crate::client::AuthGateway;
use crate::client::models::{CodeRequest, LoginResponse, VerifyRequest};
use crate::error::Result;

pub use store::AuthStore;

/// Where the user is in the sign-in flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthState {
    Anonymous,
    CodeRequested { email: String },
    Authenticated { email: Option<String> },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }
}

/// Result of asking the API to send an access code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCodeOutcome {
    pub email: String,
    /// False when the request failed; the code may still have been sent
    pub delivered: bool,
}

/// Drives the sign-in state machine against an [`AuthGateway`].
pub struct AuthFlow<G: AuthGateway> {
    gateway: Arc<G>,
    store: Arc<AuthStore>,
    code_delay: Duration,
}

impl<G: AuthGateway> AuthFlow<G> {
    pub fn new(gateway: Arc<G>, store: Arc<AuthStore>, code_delay: Duration) -> Self {
        Self {
            gateway,
            store,
            code_delay,
        }
    }

    /// Ask for an access code and move on to code entry.
    ///
    /// Always ends in `CodeRequested` after the configured delay, even when
    /// the request failed: the email may have gone out regardless.
    pub async fn request_code(&self, request: &CodeRequest) -> Result<RequestCodeOutcome> {
        let delivered = match self.gateway.request_code(request).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Access code request failed: {}", e);
                false
            }
        };

        tokio::time::sleep(self.code_delay).await;
        self.store.mark_code_requested(&request.email).await?;

        Ok(RequestCodeOutcome {
            email: request.email.clone(),
            delivered,
        })
    }

    /// Exchange an access code for a session.
    ///
    /// On any error, including a response without a token, the stored
    /// session is left untouched.
    pub async fn verify_code(&self, request: &VerifyRequest) -> Result<AuthState> {
        let body = self.gateway.verify_code(request).await?;
        let login = LoginResponse::from_value(&body)?;
        if !token::is_valid_jwt(&login.token) {
            debug!("Access token is not a JWT; expiry will not be shown");
        }

        debug!(
            "Verified {} (token {})",
            request.email,
            token::mask_token(&login.token)
        );

        self.store
            .establish(&login.token, &request.email, login.user)
            .await?;

        Ok(self.store.state())
    }

    /// Sign out locally.
    pub async fn logout(&self) -> Result<()> {
        self.store.logout().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockRegistryClient;
    use crate::error::{ApiError, Error};
    use serde_json::json;
    use tempfile::TempDir;

    fn flow(mock: MockRegistryClient) -> (AuthFlow<MockRegistryClient>, Arc<AuthStore>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(AuthStore::open(dir.path().join("session.yaml")).unwrap());
        let flow = AuthFlow::new(Arc::new(mock), store.clone(), Duration::ZERO);
        (flow, store, dir)
    }

    #[tokio::test]
    async fn test_request_code_moves_to_code_requested() {
        let (flow, store, _dir) = flow(MockRegistryClient::new());

        let outcome = flow
            .request_code(&CodeRequest::sign_in("a@example.de"))
            .await
            .unwrap();

        assert!(outcome.delivered);
        assert_eq!(
            store.state(),
            AuthState::CodeRequested {
                email: "a@example.de".into()
            }
        );
    }

    #[tokio::test]
    async fn test_request_code_failure_still_moves_on() {
        let mock = MockRegistryClient::new().with_error(ApiError::ServerError("boom".into()));
        let (flow, store, _dir) = flow(mock);

        let outcome = flow
            .request_code(&CodeRequest::sign_in("a@example.de"))
            .await
            .unwrap();

        assert!(!outcome.delivered);
        assert!(matches!(store.state(), AuthState::CodeRequested { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_code_waits_fixed_delay() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(AuthStore::open(dir.path().join("session.yaml")).unwrap());
        let flow = AuthFlow::new(
            Arc::new(MockRegistryClient::new()),
            store,
            Duration::from_millis(1500),
        );

        let start = tokio::time::Instant::now();
        flow.request_code(&CodeRequest::sign_in("a@example.de"))
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_verify_stores_access_token() {
        let mock = MockRegistryClient::new().with_login_response(json!({ "access_token": "a.b.c" }));
        let (flow, store, _dir) = flow(mock);
        let mut rx = store.subscribe();

        let state = flow
            .verify_code(&VerifyRequest::new("a@example.de", "123456"))
            .await
            .unwrap();

        assert!(state.is_authenticated());
        assert_eq!(store.bearer_token().await.as_deref(), Some("a.b.c"));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());
    }

    #[tokio::test]
    async fn test_verify_without_token_changes_nothing() {
        let mock = MockRegistryClient::new().with_login_response(json!({ "message": "ok" }));
        let (flow, store, _dir) = flow(mock);

        let result = flow
            .verify_code(&VerifyRequest::new("a@example.de", "123456"))
            .await;

        assert!(matches!(result, Err(Error::Api(ApiError::MissingToken))));
        assert_eq!(store.state(), AuthState::Anonymous);
        assert!(store.bearer_token().await.is_none());
    }

    #[tokio::test]
    async fn test_verify_rejected_code() {
        let mock = MockRegistryClient::new()
            .with_error(ApiError::BadRequest("Invalid access code".into()));
        let (flow, store, _dir) = flow(mock);

        let result = flow
            .verify_code(&VerifyRequest::new("a@example.de", "000000"))
            .await;

        assert!(matches!(result, Err(Error::Api(ApiError::BadRequest(_)))));
        assert!(store.bearer_token().await.is_none());
    }

    #[tokio::test]
    async fn test_logout_returns_to_anonymous() {
        let mock = MockRegistryClient::new().with_login_response(json!({ "token": "t.o.k" }));
        let (flow, store, _dir) = flow(mock);
        flow.verify_code(&VerifyRequest::new("a@example.de", "1"))
            .await
            .unwrap();

        flow.logout().await.unwrap();

        assert_eq!(store.state(), AuthState::Anonymous);
        assert!(store.session().await.user_logout);
        assert!(store.bearer_token().await.is_none());
    }
}
