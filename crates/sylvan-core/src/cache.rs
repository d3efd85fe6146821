//! Keyed page cache with in-flight request sharing.
//!
//! Every distinct `(cursor, page size, filter)` key is fetched at most once.
//! Callers asking for a key that is already being fetched join that attempt
//! and receive its outcome, success or failure. A failed attempt leaves the
//! key empty, so the next explicit fetch asks the source again.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, watch};
use tracing::{debug, instrument, trace};

use crate::Result;
use crate::catalog::{Page, Product, ProductFilter};
use crate::traits::ProductSource;
use crate::types::{Cursor, PageSize};

/// Identifies one page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub cursor: Cursor,
    pub page_size: PageSize,
    pub filter: ProductFilter,
}

impl PageKey {
    /// Key of the first page of a listing.
    pub fn first(page_size: PageSize, filter: ProductFilter) -> Self {
        Self {
            cursor: Cursor::FIRST,
            page_size,
            filter,
        }
    }
}

type Outcome = Option<Result<Page<Product>>>;

#[derive(Debug)]
enum Slot {
    Ready(Page<Product>),
    Pending {
        attempt: u64,
        outcome: watch::Receiver<Outcome>,
    },
}

/// What a caller does for a key.
enum Claim {
    Cached(Page<Product>),
    Lead {
        attempt: u64,
        outcome: watch::Sender<Outcome>,
    },
    Join(watch::Receiver<Outcome>),
}

/// Cache of product pages in front of a [`ProductSource`].
#[derive(Debug)]
pub struct PageCache<S> {
    source: S,
    slots: Mutex<HashMap<PageKey, Slot>>,
    attempts: AtomicU64,
}

impl<S: ProductSource> PageCache<S> {
    /// Create an empty cache over `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            slots: Mutex::new(HashMap::new()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Returns the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the page for `key`, fetching it if it is not cached yet.
    ///
    /// A caller that joins an in-flight attempt gets that attempt's result.
    /// If the caller that started the attempt is dropped before it finishes,
    /// the next caller starts a new one.
    ///
    /// # Errors
    ///
    /// Returns the source's error. Nothing is cached on failure.
    #[instrument(skip(self))]
    pub async fn fetch(&self, key: PageKey) -> Result<Page<Product>> {
        loop {
            match self.claim(key).await {
                Claim::Cached(page) => {
                    trace!("page cache hit");
                    return Ok(page);
                }
                Claim::Lead { attempt, outcome } => {
                    return self.lead(key, attempt, outcome).await;
                }
                Claim::Join(mut outcome) => {
                    trace!("joining in-flight page request");
                    let joined = match outcome.wait_for(Option::is_some).await {
                        Ok(outcome) => outcome.clone(),
                        Err(_) => None,
                    };
                    if let Some(result) = joined {
                        return result;
                    }
                }
            }
        }
    }

    async fn claim(&self, key: PageKey) -> Claim {
        let mut slots = self.slots.lock().await;
        match slots.entry(key) {
            Entry::Occupied(mut slot) => {
                match slot.get() {
                    Slot::Ready(page) => return Claim::Cached(page.clone()),
                    // A closed channel means the leading caller was dropped.
                    Slot::Pending { outcome, .. } if outcome.has_changed().is_ok() => {
                        return Claim::Join(outcome.clone());
                    }
                    Slot::Pending { .. } => debug!("previous page request was abandoned"),
                }
                let (claim, pending) = self.start_attempt();
                slot.insert(pending);
                claim
            }
            Entry::Vacant(slot) => {
                let (claim, pending) = self.start_attempt();
                slot.insert(pending);
                claim
            }
        }
    }

    fn start_attempt(&self) -> (Claim, Slot) {
        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = watch::channel(None);
        (
            Claim::Lead {
                attempt,
                outcome: tx,
            },
            Slot::Pending {
                attempt,
                outcome: rx,
            },
        )
    }

    async fn lead(
        &self,
        key: PageKey,
        attempt: u64,
        outcome: watch::Sender<Outcome>,
    ) -> Result<Page<Product>> {
        debug!("fetching page from source");
        let result = self
            .source
            .fetch_page(key.cursor, key.page_size, &key.filter)
            .await;

        {
            let mut slots = self.slots.lock().await;
            // The slot may have been cleared or replaced while the request ran.
            let current = matches!(
                slots.get(&key),
                Some(Slot::Pending { attempt: pending, .. }) if *pending == attempt
            );
            if current {
                match &result {
                    Ok(page) => {
                        slots.insert(key, Slot::Ready(page.clone()));
                    }
                    Err(err) => {
                        debug!(%err, "page fetch failed");
                        slots.remove(&key);
                    }
                }
            }
        }

        outcome.send_replace(Some(result.clone()));
        result
    }

    /// Returns the cached page for `key` without fetching.
    pub async fn cached(&self, key: &PageKey) -> Option<Page<Product>> {
        let slots = self.slots.lock().await;
        match slots.get(key) {
            Some(Slot::Ready(page)) => Some(page.clone()),
            _ => None,
        }
    }

    /// Drop every cached page of one listing filter.
    pub async fn invalidate(&self, filter: &ProductFilter) {
        let mut slots = self.slots.lock().await;
        slots.retain(|key, _| key.filter != *filter);
        debug!(?filter, "invalidated cached pages");
    }

    /// Drop every cached page.
    pub async fn clear(&self) {
        self.slots.lock().await.clear();
        debug!("cleared page cache");
    }

    /// Number of keys with a completed page.
    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    /// Returns true if no page has completed.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
