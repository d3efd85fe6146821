//! Infinite-scroll product feed.
//!
//! A feed turns independently fetched pages into one ordered, duplicate-free
//! list. The pieces, leaves first:
//!
//! - [`FeedState`]: merges pages and tracks the cursor and `has_more`.
//! - [`Sentinel`]: decides when the next page may be requested.
//! - [`FeedView`]: what a front end should render right now.
//! - [`Feed`]: owns the above, fetches through a shared
//!   [`PageCache`](crate::PageCache) and honours a [`CancelSignal`].

mod cancel;
mod controller;
mod sentinel;
mod state;
mod view;

pub use cancel::{CancelHandle, CancelSignal, cancellation};
pub use controller::Feed;
pub use sentinel::{Sentinel, SentinelState};
pub use state::{FeedItem, FeedState, MergeOutcome};
pub use view::{FeedView, LoadStatus, SKELETON_PLACEHOLDERS};
