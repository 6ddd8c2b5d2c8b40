//! Company-register API client
//!
//! The API surface is split into two focused traits:
//! - [`SearchGateway`] - paged company search
//! - [`AuthGateway`] - access-code sign-in
//!
//! [`RegistryClient`] implements both over HTTP; tests use a mock.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

#[cfg(test)]
pub mod mock;
pub mod models;
pub mod registry;

#[cfg(test)]
pub use mock::MockRegistryClient;
pub use registry::RegistryClient;

use models::{CodeRequest, ResultBatch, SearchQuery, VerifyRequest};

/// Paged search over registered companies
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Fetch up to `limit` matches starting at `offset`.
    async fn search(&self, query: &SearchQuery, offset: usize, limit: usize)
    -> Result<ResultBatch>;
}

/// Access-code authentication
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Ask the API to email an access code.
    async fn request_code(&self, request: &CodeRequest) -> Result<()>;

    /// Exchange an access code; returns the raw response body.
    async fn verify_code(&self, request: &VerifyRequest) -> Result<Value>;
}
