//! Core storefront value types.
//!
//! These types validate at construction time so that malformed URLs, page
//! sizes and emails never reach the transport.

mod api_url;
mod email;
mod ids;
mod paging;

pub use api_url::ApiUrl;
pub use email::Email;
pub use ids::{AddressId, CategoryId, CustomerId, ProductId, TagId};
pub use paging::{Cursor, PageSize};
