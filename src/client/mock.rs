//! Mock registry API client for testing
//!
//! Provides an in-memory implementation of the gateway traits for unit
//! testing without making real API calls.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use super::models::{CodeRequest, Organization, ResultBatch, SearchQuery, VerifyRequest};
use super::{AuthGateway, SearchGateway};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure the dataset and failures via builder methods, then hand it to
/// the component under test.
///
/// # Example
/// ```ignore
/// let mock = MockRegistryClient::new().with_generated(23);
/// let batch = mock.search(&SearchQuery::new(), 0, 100).await?;
/// assert_eq!(batch.total, 23);
/// ```
#[derive(Default)]
pub struct MockRegistryClient {
    /// Records served by `search`, paged by offset/limit
    dataset: Vec<Value>,
    /// Total to report instead of the dataset length
    reported_total: Option<usize>,
    /// Most rows a single `search` returns, whatever the requested limit
    batch_cap: Option<usize>,
    /// Body returned from `verify_code`
    login_response: Value,
    /// Errors to return, one per call, before normal responses resume
    errors: Mutex<VecDeque<ApiError>>,
    /// Track number of calls for verification
    call_count: Mutex<CallCounts>,
    /// Captured search requests for test assertions
    captured: Mutex<Vec<CapturedSearch>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub search: usize,
    pub request_code: usize,
    pub verify_code: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.search + self.request_code + self.verify_code
    }
}

/// A captured search request.
#[derive(Debug, Clone)]
pub struct CapturedSearch {
    pub query: SearchQuery,
    pub offset: usize,
    pub limit: usize,
}

impl MockRegistryClient {
    /// Create a new mock client with an empty dataset.
    pub fn new() -> Self {
        Self {
            login_response: json!({}),
            ..Self::default()
        }
    }

    /// Serve these records from `search`.
    pub fn with_records(mut self, records: Vec<Value>) -> Self {
        self.dataset = records;
        self
    }

    /// Serve `count` numbered companies from `search`.
    pub fn with_generated(self, count: usize) -> Self {
        let records = (1..=count)
            .map(|i| {
                json!({
                    "id": format!("org-{}", i),
                    "name": format!("Company {}", i),
                    "status": "aktiv",
                })
            })
            .collect();
        self.with_records(records)
    }

    /// Report this total regardless of how many records exist.
    pub fn with_reported_total(mut self, total: usize) -> Self {
        self.reported_total = Some(total);
        self
    }

    /// Return at most `cap` rows per `search`, like a server with a lower
    /// page limit.
    pub fn with_batch_cap(mut self, cap: usize) -> Self {
        self.batch_cap = Some(cap);
        self
    }

    /// Body to return from `verify_code`.
    pub fn with_login_response(mut self, body: Value) -> Self {
        self.login_response = body;
        self
    }

    /// Queue an error for the next call.
    pub fn with_error(mut self, error: ApiError) -> Self {
        self.errors.get_mut().push_back(error);
        self
    }

    /// Queue an error after construction.
    pub async fn fail_next(&self, error: ApiError) {
        self.errors.lock().await.push_back(error);
    }

    /// Get call counts for verification.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get captured search requests for verification.
    pub async fn captured_searches(&self) -> Vec<CapturedSearch> {
        self.captured.lock().await.clone()
    }

    async fn check_error(&self) -> Result<()> {
        match self.errors.lock().await.pop_front() {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SearchGateway for MockRegistryClient {
    async fn search(
        &self,
        query: &SearchQuery,
        offset: usize,
        limit: usize,
    ) -> Result<ResultBatch> {
        self.call_count.lock().await.search += 1;
        self.captured.lock().await.push(CapturedSearch {
            query: query.clone(),
            offset,
            limit,
        });
        self.check_error().await?;

        let start = offset.min(self.dataset.len());
        let limit = self.batch_cap.map_or(limit, |cap| cap.min(limit));
        let end = (offset + limit).min(self.dataset.len());
        Ok(ResultBatch {
            results: self.dataset[start..end]
                .iter()
                .cloned()
                .map(Organization::new)
                .collect(),
            total: self.reported_total.unwrap_or(self.dataset.len()),
        })
    }
}

#[async_trait]
impl AuthGateway for MockRegistryClient {
    async fn request_code(&self, _request: &CodeRequest) -> Result<()> {
        self.call_count.lock().await.request_code += 1;
        self.check_error().await
    }

    async fn verify_code(&self, _request: &VerifyRequest) -> Result<Value> {
        self.call_count.lock().await.verify_code += 1;
        self.check_error().await?;
        Ok(self.login_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_mock_client_default_empty() {
        let mock = MockRegistryClient::new();
        let batch = mock.search(&SearchQuery::new(), 0, 100).await.unwrap();
        assert!(batch.results.is_empty());
        assert_eq!(batch.total, 0);
    }

    #[tokio::test]
    async fn test_mock_client_pages_dataset() {
        let mock = MockRegistryClient::new().with_generated(150);

        let first = mock.search(&SearchQuery::new(), 0, 100).await.unwrap();
        let second = mock.search(&SearchQuery::new(), 100, 100).await.unwrap();
        let past_end = mock.search(&SearchQuery::new(), 400, 100).await.unwrap();

        assert_eq!(first.results.len(), 100);
        assert_eq!(second.results.len(), 50);
        assert_eq!(second.results[0].display_name(), "Company 101");
        assert!(past_end.results.is_empty());
        assert_eq!(first.total, 150);
    }

    #[tokio::test]
    async fn test_mock_client_queued_errors_consumed_in_order() {
        let mock = MockRegistryClient::new()
            .with_error(ApiError::Unauthorized)
            .with_error(ApiError::Network("down".into()));

        assert!(matches!(
            mock.request_code(&CodeRequest::sign_in("a@example.de")).await,
            Err(Error::Api(ApiError::Unauthorized))
        ));
        assert!(matches!(
            mock.search(&SearchQuery::new(), 0, 10).await,
            Err(Error::Api(ApiError::Network(_)))
        ));
        assert!(mock.search(&SearchQuery::new(), 0, 10).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_client_call_counts_and_captures() {
        let mock = MockRegistryClient::new().with_generated(5);
        let query = SearchQuery::new().name("Acme");

        mock.search(&query, 0, 100).await.unwrap();
        mock.verify_code(&VerifyRequest::new("a@example.de", "1"))
            .await
            .unwrap();

        let counts = mock.call_counts().await;
        assert_eq!(counts.search, 1);
        assert_eq!(counts.verify_code, 1);
        assert_eq!(counts.total(), 2);

        let captured = mock.captured_searches().await;
        assert_eq!(captured[0].offset, 0);
        assert_eq!(captured[0].limit, 100);
        assert_eq!(captured[0].query, query);
    }
}
