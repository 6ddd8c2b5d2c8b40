//! HTTP implementation of the registry API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::models::{CodeRequest, ResultBatch, SearchQuery, VerifyRequest};
use super::{AuthGateway, SearchGateway};
use crate::auth::AuthStore;
use crate::error::{ApiError, ConfigError, Result};

/// Search endpoint, relative to the API base URL
const SEARCH_PATH: &str = "/search";

/// Verification endpoint
const VERIFY_PATH: &str = "/api/verify-code";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Registry API client
///
/// The bearer token is read from the shared [`AuthStore`] on every request,
/// so a sign-in or sign-out elsewhere takes effect on the next call.
pub struct RegistryClient {
    http: HttpClient,
    base_url: String,
    store: Arc<AuthStore>,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>, store: Arc<AuthStore>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request carrying the stored bearer token.
    ///
    /// A 401 invalidates the stored session before the error is returned.
    async fn authenticated<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let token = self
            .store
            .bearer_token()
            .await
            .ok_or(ConfigError::NotSignedIn)?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::from)?;

        match Self::handle_response(response).await {
            Err(ApiError::Unauthorized) => {
                debug!("Server rejected the stored token, invalidating session");
                self.store.invalidate().await?;
                Err(ApiError::Unauthorized.into())
            }
            other => Ok(other?),
        }
    }

    /// Send a request without credentials.
    async fn anonymous<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(ApiError::from)?;
        Ok(Self::handle_response(response).await?)
    }

    /// Map the response status to data or an [`ApiError`].
    async fn handle_response<T: DeserializeOwned>(
        response: Response,
    ) -> std::result::Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await.map_err(ApiError::from)?;
            // Some endpoints answer 2xx with an empty body
            let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
                b"null"
            } else {
                &bytes
            };
            return serde_json::from_slice(body).map_err(|e| {
                ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
            });
        }

        let text = response.text().await.unwrap_or_default();
        let detail = error_detail(&text);

        Err(match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::FORBIDDEN => ApiError::Forbidden,
            StatusCode::NOT_FOUND => {
                ApiError::NotFound(detail.unwrap_or_else(|| "Resource not found".to_string()))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::BadRequest(detail.unwrap_or(text))
            }
            status if status.is_server_error() => ApiError::ServerError(
                detail.unwrap_or_else(|| format!("Server error: {}", status)),
            ),
            status => ApiError::InvalidResponse(format!("Unexpected status code: {}", status)),
        })
    }
}

/// Pull a human-readable message out of an error body.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["detail", "message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

#[async_trait]
impl SearchGateway for RegistryClient {
    async fn search(
        &self,
        query: &SearchQuery,
        offset: usize,
        limit: usize,
    ) -> Result<ResultBatch> {
        let url = self.url(SEARCH_PATH);
        let params = query.to_query_params(offset, limit);
        debug!("GET {} offset={} limit={}", url, offset, limit);

        let request = self.http.request(Method::GET, &url).query(&params);
        let batch: Option<ResultBatch> = self.authenticated(request).await?;
        Ok(batch.unwrap_or_default())
    }
}

#[async_trait]
impl AuthGateway for RegistryClient {
    async fn request_code(&self, request: &CodeRequest) -> Result<()> {
        let url = self.url(request.mode.endpoint());
        debug!("POST {}", url);

        let _: Value = self.anonymous(self.http.post(&url).json(request)).await?;
        Ok(())
    }

    async fn verify_code(&self, request: &VerifyRequest) -> Result<Value> {
        let url = self.url(VERIFY_PATH);
        debug!("POST {}", url);

        match self.anonymous(self.http.post(&url).json(request)).await {
            // No session to invalidate here: the code itself was rejected
            Err(crate::error::Error::Api(ApiError::Unauthorized)) => Err(ApiError::BadRequest(
                "Invalid or expired access code".to_string(),
            )
            .into()),
            other => other,
        }
    }
}
