//! Error types for the regsearch CLI

use thiserror::Error;

/// Result type alias for regsearch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Your session has expired. Run `regsearch signin` to sign in again.")]
    Unauthorized,

    #[error("You do not have permission to perform this request. Please sign in again.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Verification succeeded but the server did not return an access token")]
    MissingToken,
}

impl ApiError {
    /// Whether the error means the stored credentials are no longer usable.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::Forbidden)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Not signed in. Run `regsearch signin` to sign in.")]
    NotSignedIn,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Saved-company storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to encode saved record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No saved company with id {0}")]
    NotFound(String),
}

/// Search and pagination errors
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Page {page} is out of range (1-{last})")]
    PageOutOfRange { page: usize, last: usize },

    #[error("No search has been run yet")]
    NoActiveSearch,

    #[error("Unknown legal form: {0}")]
    UnknownLegalForm(String),

    #[error("Invalid birth year range: {0}")]
    InvalidBirthYears(String),

    #[error("No result {index} on this page (1-{rows})")]
    RowOutOfRange { index: usize, rows: usize },

    #[error("{0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_unauthorized_message() {
        let err = ApiError::Unauthorized;
        assert!(err.to_string().contains("regsearch signin"));
    }

    #[test]
    fn test_api_error_forbidden_message() {
        let err = ApiError::Forbidden;
        assert!(err.to_string().contains("permission"));
    }

    #[test]
    fn test_api_error_network() {
        let err = ApiError::Network("Connection refused".to_string());
        assert!(err.to_string().contains("Connection refused"));
    }

    #[test]
    fn test_api_error_missing_token() {
        let err = ApiError::MissingToken;
        assert!(err.to_string().contains("access token"));
    }

    #[test]
    fn test_auth_failure_classification() {
        assert!(ApiError::Unauthorized.is_auth_failure());
        assert!(ApiError::Forbidden.is_auth_failure());
        assert!(!ApiError::Network("x".into()).is_auth_failure());
        assert!(!ApiError::ServerError("x".into()).is_auth_failure());
    }

    #[test]
    fn test_config_error_not_signed_in() {
        let err = ConfigError::NotSignedIn;
        assert!(err.to_string().contains("regsearch signin"));
    }

    #[test]
    fn test_search_error_page_out_of_range() {
        let err = SearchError::PageOutOfRange { page: 9, last: 3 };
        let msg = err.to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains("1-3"));
    }

    #[test]
    fn test_search_error_row_out_of_range() {
        let err = SearchError::RowOutOfRange { index: 12, rows: 10 };
        assert!(err.to_string().contains("1-10"));
    }

    #[test]
    fn test_store_error_not_found() {
        let err = StoreError::NotFound("abc".to_string());
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_error_from_api_error() {
        let err: Error = ApiError::Unauthorized.into();

        match err {
            Error::Api(ApiError::Unauthorized) => (),
            _ => panic!("Expected Error::Api(ApiError::Unauthorized)"),
        }
    }

    #[test]
    fn test_error_from_search_error() {
        let err: Error = SearchError::NoActiveSearch.into();

        match err {
            Error::Search(SearchError::NoActiveSearch) => (),
            _ => panic!("Expected Error::Search(SearchError::NoActiveSearch)"),
        }
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_str = "invalid: [yaml: content";
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let config_err: ConfigError = yaml_err.into();

        match config_err {
            ConfigError::ParseError(_) => (),
            _ => panic!("Expected ConfigError::ParseError"),
        }
    }
}
