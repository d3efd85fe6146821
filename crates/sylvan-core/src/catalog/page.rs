//! Cursor-paginated response envelope.

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Cursor, TagId};

/// One page of a cursor-paginated listing.
///
/// Wire shape: `{ "products": [...], "nextCursor": 12 | null, "pageSize": 12 }`.
/// A `null` next cursor marks the end of the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in backend order.
    #[serde(rename = "products")]
    pub items: Vec<T>,

    /// Cursor of the following page, if more items exist.
    #[serde(default)]
    pub next_cursor: Option<Cursor>,

    /// Page size the backend actually served.
    #[serde(default)]
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Returns true if this is the final page of the listing.
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

/// Optional filters applied to a product listing.
///
/// Each distinct filter is a separate feed: changing it resets accumulated
/// items and starts again from [`Cursor::FIRST`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ProductFilter {
    pub category: Option<CategoryId>,
    pub tag: Option<TagId>,
}

impl ProductFilter {
    /// Filter by category.
    pub fn category(id: CategoryId) -> Self {
        Self {
            category: Some(id),
            tag: None,
        }
    }

    /// Filter by tag.
    pub fn tag(id: TagId) -> Self {
        Self {
            category: None,
            tag: Some(id),
        }
    }

    /// Returns true if no filter is set.
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.tag.is_none()
    }
}
