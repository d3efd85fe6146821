//! sylvan-core - Core storefront types, feed accumulation and client-side stores.
//!
//! The HTTP transport lives in `sylvan-http`; everything here is independent
//! of how pages and records reach the client.

pub mod cache;
pub mod catalog;
pub mod credentials;
pub mod customer;
pub mod error;
pub mod feed;
pub mod store;
pub mod tokens;
pub mod traits;
pub mod types;

#[cfg(test)]
mod testing;

pub use cache::{PageCache, PageKey};
pub use catalog::{Category, Page, Product, ProductFilter, ProductImage, Tag};
pub use credentials::Credentials;
pub use customer::{Address, Customer};
pub use error::Error;
pub use feed::{CancelHandle, CancelSignal, Feed, FeedState, FeedView, Sentinel, SentinelState};
pub use store::{AuthSession, AuthStore, Cart};
pub use tokens::{AccessToken, RefreshToken};
pub use traits::ProductSource;
pub use types::{
    AddressId, ApiUrl, CategoryId, Cursor, CustomerId, Email, PageSize, ProductId, TagId,
};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
