//! sylvan-http - REST transport for the sylvan storefront.
//!
//! [`HttpStorefront`] covers the anonymous half of the backend contract and
//! serves product pages to feeds; [`HttpSession`] covers everything that
//! needs a signed-in customer.
//!
//! # Example
//!
//! ```no_run
//! use sylvan_core::{ApiUrl, CancelSignal, PageSize, ProductFilter};
//! use sylvan_http::HttpStorefront;
//!
//! # async fn example() -> Result<(), sylvan_core::Error> {
//! let api = ApiUrl::new("https://api.sylvan.shop")?;
//! let storefront = HttpStorefront::new(api)?;
//!
//! let mut feed = storefront.feed(
//!     PageSize::default(),
//!     ProductFilter::default(),
//!     CancelSignal::never(),
//! );
//! feed.load_initial().await?;
//! println!("{} products so far", feed.items().len());
//! # Ok(())
//! # }
//! ```

mod catalog;
mod config;
pub mod rest;
mod session;
mod storefront;

pub use catalog::ProductPages;
pub use config::ClientConfig;
pub use rest::ApiClient;
pub use session::HttpSession;
pub use storefront::HttpStorefront;
