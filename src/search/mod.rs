//! Batched search results with client-side paging
//!
//! Results are fetched from the registry in batches of [`BATCH_SIZE`] and
//! shown [`PAGE_SIZE`] at a time. Every [`PREFETCH_STRIDE`] pages the next
//! batch is requested so paging forward rarely waits on the network.

mod cache;
mod window;

pub use cache::{Outcome, SearchCache};
pub use window::{PageMarker, page_window};

use serde::Serialize;

use crate::error::{ApiError, ConfigError, Error};

/// Rows shown per page
pub const PAGE_SIZE: usize = 10;

/// Rows requested per API call
pub const BATCH_SIZE: usize = 100;

/// Pages between prefetches
pub const PREFETCH_STRIDE: usize = 5;

/// Non-fatal problem to show next to the current results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    /// Signing in again is likely to help
    pub reauth: bool,
}

impl Notice {
    pub fn from_error(err: &Error) -> Self {
        let message = match err {
            Error::Api(ApiError::Network(_)) => {
                "Unable to connect to the server. Please check your internet connection."
                    .to_string()
            }
            Error::Api(ApiError::Unauthorized) => {
                "Your session has expired. Run `regsearch signin` to continue viewing results."
                    .to_string()
            }
            Error::Api(ApiError::Forbidden) => {
                "You do not have permission to perform this search. Please sign in again."
                    .to_string()
            }
            Error::Config(ConfigError::NotSignedIn) => {
                "Please sign in to search. Run `regsearch signin` first.".to_string()
            }
            Error::Api(
                ApiError::BadRequest(detail)
                | ApiError::NotFound(detail)
                | ApiError::ServerError(detail),
            ) => format!("API Error: {}", detail),
            _ => "The server returned an invalid response. Please try again later.".to_string(),
        };

        let reauth = match err {
            Error::Api(e) => e.is_auth_failure(),
            Error::Config(ConfigError::NotSignedIn) => true,
            _ => false,
        };

        Self { message, reauth }
    }
}
