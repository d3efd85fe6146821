//! In-memory fixtures shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::Result;
use crate::catalog::{Page, Product, ProductFilter};
use crate::error::ApiError;
use crate::traits::ProductSource;
use crate::types::{Cursor, PageSize, ProductId};

pub fn product(id: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Seedling #{id}"),
        description: None,
        price: Decimal::new(1250, 2),
        discount: 0,
        quantity: 10,
        images: Vec::new(),
        tags: Vec::new(),
        category: None,
    }
}

pub fn page(ids: &[i64], next: Option<u64>) -> Page<Product> {
    Page {
        items: ids.iter().copied().map(product).collect(),
        next_cursor: next.map(Cursor::new),
        page_size: ids.len() as u32,
    }
}

pub fn ids(items: &[Product]) -> Vec<i64> {
    items.iter().map(|p| p.id.get()).collect()
}

/// Serves pre-scripted pages by cursor, ignoring page size and filter.
#[derive(Default)]
pub struct ScriptedSource {
    pages: HashMap<u64, Page<Product>>,
    fail_once: Mutex<HashSet<u64>>,
    always_fail: HashSet<u64>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, cursor: u64, page: Page<Product>) -> Self {
        self.pages.insert(cursor, page);
        self
    }

    pub fn failing_once(self, cursor: u64) -> Self {
        self.fail_once.lock().unwrap().insert(cursor);
        self
    }

    pub fn always_failing(mut self, cursor: u64) -> Self {
        self.always_fail.insert(cursor);
        self
    }

    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay = Some(Duration::from_millis(ms));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductSource for ScriptedSource {
    async fn fetch_page(
        &self,
        cursor: Cursor,
        _page_size: PageSize,
        _filter: &ProductFilter,
    ) -> Result<Page<Product>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failed_once = self.fail_once.lock().unwrap().remove(&cursor.get());
        if failed_once || self.always_fail.contains(&cursor.get()) {
            return Err(ApiError::new(503, Some("catalog unavailable".into())).into());
        }

        self.pages
            .get(&cursor.get())
            .cloned()
            .ok_or_else(|| ApiError::new(404, None).into())
    }
}
