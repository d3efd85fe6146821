//! Product pages served over HTTP.

use async_trait::async_trait;
use tracing::instrument;

use sylvan_core::catalog::{Page, Product, ProductFilter};
use sylvan_core::types::{Cursor, PageSize};
use sylvan_core::{ProductSource, Result};

use crate::rest::{ApiClient, ListProductsQuery, PRODUCT};

/// `GET Product` as a [`ProductSource`].
///
/// This is the source behind the storefront's shared page cache. It does no
/// caching of its own.
#[derive(Debug, Clone)]
pub struct ProductPages {
    client: ApiClient,
}

impl ProductPages {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductSource for ProductPages {
    #[instrument(skip(self))]
    async fn fetch_page(
        &self,
        cursor: Cursor,
        page_size: PageSize,
        filter: &ProductFilter,
    ) -> Result<Page<Product>> {
        let query = ListProductsQuery::new(cursor, page_size, filter);
        self.client.get(PRODUCT, &query).await
    }
}
