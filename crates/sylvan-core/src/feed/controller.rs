//! Product feed controller.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::cache::{PageCache, PageKey};
use crate::catalog::{Page, Product, ProductFilter};
use crate::error::{Error, PaginationError};
use crate::traits::ProductSource;
use crate::types::{Cursor, PageSize};

use super::cancel::CancelSignal;
use super::sentinel::{Sentinel, SentinelState};
use super::state::{FeedState, MergeOutcome};
use super::view::{FeedView, LoadStatus};

/// An infinite-scroll product feed owned by a single view.
///
/// Pages are requested strictly in sequence: the key of the next request is
/// only known once the previous page has merged. Fetching goes through a
/// shared [`PageCache`], so asking for a key that is already in flight or
/// already fetched never produces a second network call.
///
/// The synchronous half ([`Feed::begin_initial`], [`Feed::begin_next`],
/// [`Feed::resolve`]) lets an event loop drive the feed itself; the async
/// methods combine both halves for callers that can simply await.
#[derive(Debug)]
pub struct Feed<S> {
    cache: Arc<PageCache<S>>,
    page_size: PageSize,
    filter: ProductFilter,
    state: FeedState<Product>,
    sentinel: Sentinel,
    status: LoadStatus,
    loaded: bool,
    pending: Option<PageKey>,
    cancel: CancelSignal,
}

impl<S: ProductSource> Feed<S> {
    /// Create an empty feed. Nothing is fetched until [`Feed::load_initial`].
    pub fn new(
        cache: Arc<PageCache<S>>,
        page_size: PageSize,
        filter: ProductFilter,
        cancel: CancelSignal,
    ) -> Self {
        Self {
            cache,
            page_size,
            filter,
            state: FeedState::new(),
            sentinel: Sentinel::new(),
            status: LoadStatus::Idle,
            loaded: false,
            pending: None,
            cancel,
        }
    }

    pub fn items(&self) -> &[Product] {
        self.state.items()
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    pub fn cursor(&self) -> Cursor {
        self.state.cursor()
    }

    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn sentinel_state(&self) -> SentinelState {
        self.sentinel.state()
    }

    /// Returns true once the first page has merged.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// What to render right now.
    pub fn view(&self) -> FeedView<'_, Product> {
        FeedView::build(
            self.state.items(),
            &self.status,
            self.loaded,
            self.state.has_more(),
        )
    }

    /// Start the initial load. Returns the key to fetch, or `None` if the
    /// first page already merged or is in flight.
    pub fn begin_initial(&mut self) -> Option<PageKey> {
        if self.loaded || self.pending.is_some() {
            return None;
        }
        Some(self.begin(self.state.cursor()))
    }

    /// The sentinel became visible. Returns the key to fetch, or `None` if the
    /// trigger is ignored.
    pub fn begin_next(&mut self) -> Option<PageKey> {
        if !self.sentinel.on_visible() {
            return None;
        }
        Some(self.begin(self.state.cursor()))
    }

    fn begin(&mut self, cursor: Cursor) -> PageKey {
        let key = PageKey {
            cursor,
            page_size: self.page_size,
            filter: self.filter,
        };
        debug!(cursor = %key.cursor, page_size = %key.page_size, "requesting page");
        self.status = LoadStatus::Loading;
        self.pending = Some(key);
        key
    }

    /// Apply the result of fetching `key`.
    ///
    /// Results for a key that is no longer pending (the feed was reset in the
    /// meantime) are discarded and reported as [`Error::Cancelled`].
    ///
    /// # Errors
    ///
    /// Returns the fetch error, or [`PaginationError::CursorDidNotAdvance`]
    /// when the page's items merged but its next cursor was already consumed.
    pub fn resolve(&mut self, key: PageKey, result: Result<Page<Product>>) -> Result<MergeOutcome> {
        if self.pending != Some(key) {
            debug!(cursor = %key.cursor, "discarding stale page");
            return Err(Error::Cancelled);
        }
        self.pending = None;

        let page = match result {
            Ok(page) => page,
            Err(Error::Cancelled) => {
                self.status = LoadStatus::Idle;
                self.settle_sentinel();
                return Err(Error::Cancelled);
            }
            Err(err) => {
                warn!(cursor = %key.cursor, error = %err, "page request failed");
                self.status = LoadStatus::Failed(err.to_string());
                self.settle_sentinel();
                return Err(err);
            }
        };

        let outcome = self.state.merge(page);
        self.loaded = true;
        self.settle_sentinel();

        if let Some(cursor) = outcome.stalled_at {
            warn!(%cursor, "backend repeated a consumed cursor, ending feed");
            let err = PaginationError::CursorDidNotAdvance { cursor };
            self.status = LoadStatus::Failed(err.to_string());
            return Err(err.into());
        }

        self.status = LoadStatus::Idle;
        if !self.state.has_more() {
            info!(items = self.state.len(), "feed exhausted");
        }
        Ok(outcome)
    }

    fn settle_sentinel(&mut self) {
        let has_more = self.state.has_more();
        if self.loaded && !self.sentinel.is_armed() {
            self.sentinel.arm(has_more);
        } else if self.sentinel.is_armed() {
            self.sentinel.on_resolved(has_more);
        }
    }

    /// Fetch and merge the first page.
    ///
    /// # Errors
    ///
    /// See [`Feed::resolve`]. Returns `Ok` with an empty outcome if the first
    /// page was already loaded.
    #[instrument(skip(self), fields(filter = ?self.filter))]
    pub async fn load_initial(&mut self) -> Result<MergeOutcome> {
        match self.begin_initial() {
            Some(key) => self.run(key).await,
            None => Ok(MergeOutcome::default()),
        }
    }

    /// The sentinel became visible: fetch and merge the next page if the
    /// trigger is accepted.
    ///
    /// # Errors
    ///
    /// See [`Feed::resolve`].
    #[instrument(skip(self), fields(cursor = %self.state.cursor()))]
    pub async fn on_sentinel_visible(&mut self) -> Result<Option<MergeOutcome>> {
        match self.begin_next() {
            Some(key) => self.run(key).await.map(Some),
            None => Ok(None),
        }
    }

    /// Retry after a failed request, in place. Does nothing unless the last
    /// request failed and more pages may exist.
    ///
    /// # Errors
    ///
    /// See [`Feed::resolve`].
    pub async fn retry(&mut self) -> Result<Option<MergeOutcome>> {
        if !matches!(self.status, LoadStatus::Failed(_)) || !self.state.has_more() {
            return Ok(None);
        }
        if !self.loaded {
            return self.load_initial().await.map(Some);
        }
        let key = self.begin(self.state.cursor());
        self.run(key).await.map(Some)
    }

    /// Keep loading until the feed is exhausted or `max_pages` pages merged,
    /// as a sentinel that stays in view would.
    ///
    /// # Errors
    ///
    /// Stops at the first failed page and returns its error.
    pub async fn load_pages(&mut self, max_pages: Option<usize>) -> Result<usize> {
        let mut pages = 0;
        if !self.loaded {
            self.load_initial().await?;
            pages += 1;
        }
        while max_pages.is_none_or(|max| pages < max) {
            match self.on_sentinel_visible().await? {
                Some(_) => pages += 1,
                None => break,
            }
        }
        Ok(pages)
    }

    /// Switch to another filter. Accumulated items are discarded, any
    /// in-flight result for the old filter will be ignored, and `cancel`
    /// replaces the previous signal.
    pub fn set_filter(&mut self, filter: ProductFilter, cancel: CancelSignal) {
        self.filter = filter;
        self.cancel = cancel;
        self.reset();
    }

    /// Discard accumulated state and start over from the first page.
    pub fn reset(&mut self) {
        self.state.reset();
        self.sentinel.reset();
        self.status = LoadStatus::Idle;
        self.loaded = false;
        self.pending = None;
    }

    async fn run(&mut self, key: PageKey) -> Result<MergeOutcome> {
        let result = if self.cancel.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            let mut cancel = self.cancel.clone();
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(Error::Cancelled),
                page = self.cache.fetch(key) => page,
            }
        };
        self.resolve(key, result)
    }
}
