//! Seams between the client-side state and the transport.

use async_trait::async_trait;

use crate::Result;
use crate::catalog::{Page, Product, ProductFilter};
use crate::types::{Cursor, PageSize};

/// A source of product pages.
///
/// `sylvan-http` implements this against `GET Product`; tests use in-memory
/// sources.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch the page starting at `cursor`.
    async fn fetch_page(
        &self,
        cursor: Cursor,
        page_size: PageSize,
        filter: &ProductFilter,
    ) -> Result<Page<Product>>;
}

#[async_trait]
impl<S> ProductSource for std::sync::Arc<S>
where
    S: ProductSource + ?Sized,
{
    async fn fetch_page(
        &self,
        cursor: Cursor,
        page_size: PageSize,
        filter: &ProductFilter,
    ) -> Result<Page<Product>> {
        (**self).fetch_page(cursor, page_size, filter).await
    }
}
