//! Search result cache

use std::sync::Arc;

use log::{debug, warn};

use super::{BATCH_SIZE, Notice, PAGE_SIZE, PREFETCH_STRIDE, PageMarker, page_window};
use crate::client::SearchGateway;
use crate::client::models::{Organization, SearchQuery};
use crate::error::{Result, SearchError};

/// What a search or page change did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Served from cache, no request sent
    Cached,
    /// Fetched this many new rows
    Fetched { added: usize },
    /// A request failed; see [`SearchCache::notice`]
    Failed,
}

/// Accumulated results of the active search.
///
/// All mutation goes through `&mut self`, so at most one request per cache
/// is in flight and responses are always applied in request order.
pub struct SearchCache<G: SearchGateway> {
    gateway: Arc<G>,
    query: Option<SearchQuery>,
    cached: Vec<Organization>,
    total: usize,
    page: usize,
    notice: Option<Notice>,
}

impl<G: SearchGateway> SearchCache<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            query: None,
            cached: Vec::new(),
            total: 0,
            page: 1,
            notice: None,
        }
    }

    /// Run a new search from the first batch.
    ///
    /// On failure the previous query and results are kept and a notice is
    /// recorded. The page is reset to 1 either way.
    pub async fn search(&mut self, query: SearchQuery) -> Outcome {
        self.notice = None;
        self.page = 1;

        match self.gateway.search(&query, 0, BATCH_SIZE).await {
            Ok(batch) => {
                self.cached = batch.results;
                self.total = if batch.total == 0 {
                    self.cached.len()
                } else {
                    batch.total.max(self.cached.len())
                };
                self.query = Some(query);
                debug!(
                    "Search returned {} of {} results",
                    self.cached.len(),
                    self.total
                );
                Outcome::Fetched {
                    added: self.cached.len(),
                }
            }
            Err(e) => {
                warn!("Search failed: {}", e);
                self.notice = Some(Notice::from_error(&e));
                Outcome::Failed
            }
        }
    }

    /// Move to page `page` (1-based), fetching more rows when needed.
    ///
    /// Landing on every fifth page prefetches the next batch. Jumping past
    /// the cached rows fetches batches until the page is covered. When a
    /// fetch fails the page only moves if its rows are already cached.
    pub async fn change_page(
        &mut self,
        page: usize,
    ) -> std::result::Result<Outcome, SearchError> {
        let query = self.query.clone().ok_or(SearchError::NoActiveSearch)?;
        let last = self.total_pages().max(1);
        if page == 0 || page > last {
            return Err(SearchError::PageOutOfRange { page, last });
        }

        let start = (page - 1) * PAGE_SIZE;
        let prefetch = page % PREFETCH_STRIDE == 0
            && page * PAGE_SIZE >= self.cached.len()
            && self.has_more();

        if !prefetch && !self.needs_rows_for(page) {
            debug!("Page {} served from cache", page);
            self.page = page;
            return Ok(Outcome::Cached);
        }

        self.notice = None;
        let mut added = 0;
        loop {
            match self.fetch_batch(&query).await {
                Ok(0) => break,
                Ok(n) => added += n,
                Err(e) => {
                    warn!("Fetching page {} failed: {}", page, e);
                    self.notice = Some(Notice::from_error(&e));
                    if start < self.cached.len() {
                        self.page = page;
                    }
                    return Ok(Outcome::Failed);
                }
            }
            if !self.needs_rows_for(page) {
                break;
            }
        }

        // The server may have reported more rows than it could deliver
        self.page = page.min(self.total_pages().max(1));
        Ok(Outcome::Fetched { added })
    }

    /// Rows on the current page
    pub fn current_page_slice(&self) -> &[Organization] {
        let start = ((self.page - 1) * PAGE_SIZE).min(self.cached.len());
        let end = (self.page * PAGE_SIZE).min(self.cached.len());
        &self.cached[start..end]
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(PAGE_SIZE)
    }

    /// Pagination bar for the current page
    pub fn page_window(&self) -> Vec<PageMarker> {
        page_window(self.page, self.total_pages())
    }

    /// Forget the active search entirely.
    pub fn clear(&mut self) {
        self.query = None;
        self.cached.clear();
        self.total = 0;
        self.page = 1;
        self.notice = None;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn cached_len(&self) -> usize {
        self.cached.len()
    }

    pub fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Row `index` (0-based) of the current page
    pub fn on_page(&self, index: usize) -> Option<&Organization> {
        self.current_page_slice().get(index)
    }

    fn has_more(&self) -> bool {
        self.cached.len() < self.total
    }

    /// Whether any row of `page` is still missing from the cache
    fn needs_rows_for(&self, page: usize) -> bool {
        (page * PAGE_SIZE).min(self.total) > self.cached.len() && self.has_more()
    }

    /// Append the next batch; returns how many rows were added.
    async fn fetch_batch(&mut self, query: &SearchQuery) -> Result<usize> {
        let offset = self.cached.len();
        debug!("Fetching batch at offset {}", offset);

        let batch = self.gateway.search(query, offset, BATCH_SIZE).await?;
        let added = batch.results.len();
        self.cached.extend(batch.results);

        self.total = if added == 0 {
            // Nothing more to fetch, whatever the server claimed
            self.cached.len()
        } else if batch.total == 0 {
            self.cached.len()
        } else {
            batch.total.max(self.cached.len())
        };

        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockRegistryClient;
    use crate::error::ApiError;

    async fn searched(
        mock: MockRegistryClient,
    ) -> (SearchCache<MockRegistryClient>, Arc<MockRegistryClient>) {
        let mock = Arc::new(mock);
        let mut cache = SearchCache::new(mock.clone());
        cache.search(SearchQuery::new().name("Company")).await;
        (cache, mock)
    }

    fn names(cache: &SearchCache<MockRegistryClient>) -> Vec<String> {
        cache
            .current_page_slice()
            .iter()
            .map(Organization::display_name)
            .collect()
    }

    #[tokio::test]
    async fn test_twenty_three_results_make_three_pages() {
        let (mut cache, _) = searched(MockRegistryClient::new().with_generated(23)).await;

        assert_eq!(cache.total_pages(), 3);
        assert_eq!(cache.current_page_slice().len(), 10);

        cache.change_page(3).await.unwrap();
        assert_eq!(cache.current_page_slice().len(), 3);
        assert_eq!(names(&cache)[0], "Company 21");
    }

    #[tokio::test]
    async fn test_every_page_is_full_except_last() {
        let (mut cache, _) = searched(MockRegistryClient::new().with_generated(347)).await;
        let pages = cache.total_pages();
        assert_eq!(pages, 35);

        for page in 1..=pages {
            cache.change_page(page).await.unwrap();
            let expected = if page == pages { 7 } else { PAGE_SIZE };
            assert_eq!(cache.current_page_slice().len(), expected, "page {}", page);
        }
    }

    #[tokio::test]
    async fn test_paging_within_batch_makes_no_request() {
        let (mut cache, mock) = searched(MockRegistryClient::new().with_generated(500)).await;

        for page in [2, 3, 4, 3, 1] {
            assert_eq!(cache.change_page(page).await.unwrap(), Outcome::Cached);
        }
        assert_eq!(mock.call_counts().await.search, 1);
    }

    #[tokio::test]
    async fn test_prefetch_on_stride_page() {
        let (mut cache, mock) = searched(MockRegistryClient::new().with_generated(500)).await;

        // Page 5 ends at row 50, still inside the first batch
        assert_eq!(cache.change_page(5).await.unwrap(), Outcome::Cached);

        // Page 10 ends at row 100, the end of the cache
        assert_eq!(
            cache.change_page(10).await.unwrap(),
            Outcome::Fetched { added: 100 }
        );
        assert_eq!(cache.cached_len(), 200);

        let captured = mock.captured_searches().await;
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[1].offset, 100);
        assert_eq!(captured[1].limit, BATCH_SIZE);
        assert_eq!(captured[1].query, SearchQuery::new().name("Company"));
    }

    #[tokio::test]
    async fn test_prefetch_skipped_when_everything_cached() {
        let (mut cache, mock) = searched(MockRegistryClient::new().with_generated(60)).await;

        assert_eq!(cache.change_page(5).await.unwrap(), Outcome::Cached);
        assert_eq!(mock.call_counts().await.search, 1);
    }

    #[tokio::test]
    async fn test_jump_past_cache_fetches_until_covered() {
        let (mut cache, mock) = searched(MockRegistryClient::new().with_generated(500)).await;

        let outcome = cache.change_page(32).await.unwrap();

        assert_eq!(outcome, Outcome::Fetched { added: 300 });
        assert_eq!(cache.page(), 32);
        assert_eq!(names(&cache)[0], "Company 311");
        assert_eq!(mock.call_counts().await.search, 4);
    }

    #[tokio::test]
    async fn test_empty_batch_clamps_total() {
        let mock = MockRegistryClient::new()
            .with_generated(100)
            .with_reported_total(250);
        let (mut cache, _) = searched(mock).await;
        assert_eq!(cache.total_pages(), 25);

        let outcome = cache.change_page(10).await.unwrap();

        assert_eq!(outcome, Outcome::Fetched { added: 0 });
        assert_eq!(cache.total(), 100);
        assert_eq!(cache.total_pages(), 10);
        assert_eq!(cache.page(), 10);
        assert_eq!(cache.current_page_slice().len(), 10);
    }

    #[tokio::test]
    async fn test_jump_beyond_delivered_rows_lands_on_last_page() {
        let mock = MockRegistryClient::new()
            .with_generated(150)
            .with_reported_total(400);
        let (mut cache, _) = searched(mock).await;

        cache.change_page(30).await.unwrap();

        assert_eq!(cache.total(), 150);
        assert_eq!(cache.page(), 15);
        assert_eq!(names(&cache)[0], "Company 141");
    }

    #[tokio::test]
    async fn test_short_batches_fill_whole_page() {
        let mock = MockRegistryClient::new()
            .with_generated(500)
            .with_batch_cap(25);
        let (mut cache, mock) = searched(mock).await;
        assert_eq!(cache.cached_len(), 25);
        assert_eq!(cache.total_pages(), 50);

        let outcome = cache.change_page(3).await.unwrap();

        assert_eq!(outcome, Outcome::Fetched { added: 25 });
        assert_eq!(cache.current_page_slice().len(), PAGE_SIZE);
        assert_eq!(names(&cache)[0], "Company 21");
        assert_eq!(names(&cache)[9], "Company 30");

        let captured = mock.captured_searches().await;
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[1].offset, 25);
    }

    #[tokio::test]
    async fn test_short_batches_every_page_full() {
        let mock = MockRegistryClient::new()
            .with_generated(95)
            .with_batch_cap(25);
        let (mut cache, _) = searched(mock).await;

        for page in 1..=10 {
            cache.change_page(page).await.unwrap();
            let expected = if page == 10 { 5 } else { PAGE_SIZE };
            assert_eq!(cache.current_page_slice().len(), expected, "page {}", page);
        }
    }

    #[tokio::test]
    async fn test_page_out_of_range() {
        let (mut cache, _) = searched(MockRegistryClient::new().with_generated(23)).await;

        assert!(matches!(
            cache.change_page(0).await,
            Err(SearchError::PageOutOfRange { page: 0, last: 3 })
        ));
        assert!(matches!(
            cache.change_page(4).await,
            Err(SearchError::PageOutOfRange { page: 4, last: 3 })
        ));
        assert_eq!(cache.page(), 1);
    }

    #[tokio::test]
    async fn test_change_page_without_search() {
        let mut cache = SearchCache::new(Arc::new(MockRegistryClient::new()));
        assert!(matches!(
            cache.change_page(1).await,
            Err(SearchError::NoActiveSearch)
        ));
    }

    #[tokio::test]
    async fn test_search_resets_page_and_replaces_cache() {
        let mock = Arc::new(MockRegistryClient::new().with_generated(40));
        let mut cache = SearchCache::new(mock.clone());
        cache.search(SearchQuery::new().name("first")).await;
        cache.change_page(3).await.unwrap();

        let outcome = cache.search(SearchQuery::new().name("second")).await;

        assert_eq!(outcome, Outcome::Fetched { added: 40 });
        assert_eq!(cache.page(), 1);
        assert_eq!(cache.cached_len(), 40);
        assert_eq!(cache.query().unwrap().name, "second");
    }

    #[tokio::test]
    async fn test_zero_total_falls_back_to_result_count() {
        let mock = MockRegistryClient::new()
            .with_generated(12)
            .with_reported_total(0);
        let (cache, _) = searched(mock).await;

        assert_eq!(cache.total(), 12);
        assert_eq!(cache.total_pages(), 2);
    }

    #[tokio::test]
    async fn test_failed_search_keeps_previous_results() {
        let (mut cache, mock) = searched(MockRegistryClient::new().with_generated(30)).await;
        cache.change_page(2).await.unwrap();
        mock.fail_next(ApiError::Network("refused".into())).await;

        let outcome = cache.search(SearchQuery::new().name("other")).await;

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(cache.cached_len(), 30);
        assert_eq!(cache.page(), 1);
        assert_eq!(cache.query().unwrap().name, "Company");
        let notice = cache.notice().unwrap();
        assert!(notice.message.starts_with("Unable to connect"));
        assert!(!notice.reauth);
    }

    #[tokio::test]
    async fn test_failed_prefetch_still_moves_to_cached_page() {
        let (mut cache, mock) = searched(MockRegistryClient::new().with_generated(500)).await;
        mock.fail_next(ApiError::Unauthorized).await;

        let outcome = cache.change_page(10).await.unwrap();

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(cache.page(), 10);
        assert_eq!(cache.cached_len(), 100);
        assert!(cache.notice().unwrap().reauth);
    }

    #[tokio::test]
    async fn test_failed_jump_keeps_current_page() {
        let (mut cache, mock) = searched(MockRegistryClient::new().with_generated(500)).await;
        cache.change_page(3).await.unwrap();
        mock.fail_next(ApiError::ServerError("down".into())).await;

        let outcome = cache.change_page(25).await.unwrap();

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(cache.page(), 3);
        assert_eq!(cache.notice().unwrap().message, "API Error: down");
    }

    #[tokio::test]
    async fn test_notice_cleared_by_next_successful_search() {
        let mock = MockRegistryClient::new()
            .with_generated(5)
            .with_error(ApiError::Forbidden);
        let mock = Arc::new(mock);
        let mut cache = SearchCache::new(mock);

        cache.search(SearchQuery::new()).await;
        assert!(cache.notice().is_some());

        cache.search(SearchQuery::new()).await;
        assert!(cache.notice().is_none());
        assert_eq!(cache.cached_len(), 5);
    }

    #[tokio::test]
    async fn test_page_window_follows_current_page() {
        let (mut cache, _) = searched(MockRegistryClient::new().with_generated(90)).await;
        cache.change_page(5).await.unwrap();

        let rendered: Vec<String> = cache.page_window().iter().map(|m| m.to_string()).collect();
        assert_eq!(rendered, ["1", "…", "3", "4", "5", "6", "7", "…", "9"]);
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let (mut cache, _) = searched(MockRegistryClient::new().with_generated(30)).await;
        cache.change_page(2).await.unwrap();

        cache.clear();

        assert!(cache.query().is_none());
        assert_eq!(cache.cached_len(), 0);
        assert_eq!(cache.total_pages(), 0);
        assert_eq!(cache.page(), 1);
        assert!(cache.current_page_slice().is_empty());
    }
}
