//! Feed accumulator.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use tracing::trace;

use crate::catalog::{Page, Product};
use crate::types::{Cursor, ProductId};

/// An item that can be accumulated into a feed.
pub trait FeedItem {
    /// Identity used for de-duplication. Must be stable across pages.
    type Id: Eq + Hash + Clone + fmt::Debug;

    fn feed_id(&self) -> Self::Id;
}

impl FeedItem for Product {
    type Id = ProductId;

    fn feed_id(&self) -> ProductId {
        self.id
    }
}

/// Result of merging one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Items appended to the feed.
    pub appended: usize,
    /// Items dropped because their id was already present.
    pub duplicates: usize,
    /// Set when the page's next cursor had already been consumed. The feed
    /// is terminated instead of following it.
    pub stalled_at: Option<Cursor>,
}

/// Accumulated items of a paginated listing, in first-seen order.
///
/// Starts empty at [`Cursor::FIRST`] with `has_more == true`. Only grows;
/// once the last page has been merged `has_more` stays false until
/// [`FeedState::reset`].
#[derive(Debug, Clone)]
pub struct FeedState<T: FeedItem> {
    items: Vec<T>,
    seen: HashSet<T::Id>,
    cursor: Cursor,
    consumed: HashSet<Cursor>,
    has_more: bool,
}

impl<T: FeedItem> Default for FeedState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FeedItem> FeedState<T> {
    /// Create an empty feed positioned at the first page.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            cursor: Cursor::FIRST,
            consumed: HashSet::new(),
            has_more: true,
        }
    }

    /// Accumulated items.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Cursor the next page should be requested with.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Returns true while further pages may exist.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Returns true if nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of accumulated items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Merge the page fetched at the current cursor.
    ///
    /// Items whose id is already present are dropped; the rest are appended
    /// in page order. A missing next cursor ends the feed. A next cursor that
    /// was already consumed also ends it and is reported in
    /// [`MergeOutcome::stalled_at`]. Merging into an ended feed is a no-op.
    pub fn merge(&mut self, page: Page<T>) -> MergeOutcome {
        if !self.has_more {
            trace!("ignoring page merged into an exhausted feed");
            return MergeOutcome::default();
        }

        let total = page.items.len();
        let before = self.items.len();
        let seen = &mut self.seen;
        self.items.extend(
            page.items
                .into_iter()
                .filter(|item| seen.insert(item.feed_id())),
        );
        let appended = self.items.len() - before;

        let mut outcome = MergeOutcome {
            appended,
            duplicates: total - appended,
            stalled_at: None,
        };

        self.consumed.insert(self.cursor);
        match page.next_cursor {
            None => self.has_more = false,
            Some(next) if self.consumed.contains(&next) => {
                self.has_more = false;
                outcome.stalled_at = Some(next);
            }
            Some(next) => self.cursor = next,
        }

        outcome
    }

    /// Discard everything and return to the first page.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ids, page};

    #[test]
    fn starts_empty_at_first_cursor() {
        let feed = FeedState::<Product>::new();
        assert!(feed.is_empty());
        assert!(feed.has_more());
        assert_eq!(feed.cursor(), Cursor::FIRST);
    }

    #[test]
    fn duplicates_across_pages_keep_first_position() {
        let mut feed = FeedState::new();
        feed.merge(page(&[1, 2, 3], Some(3)));
        let outcome = feed.merge(page(&[3, 1, 4], Some(6)));

        assert_eq!(ids(feed.items()), [1, 2, 3, 4]);
        assert_eq!(outcome.appended, 1);
        assert_eq!(outcome.duplicates, 2);
    }

    #[test]
    fn order_is_concatenation_of_pages() {
        let mut feed = FeedState::new();
        feed.merge(page(&[5, 9], Some(2)));
        feed.merge(page(&[2, 7], Some(4)));
        feed.merge(page(&[1], None));

        assert_eq!(ids(feed.items()), [5, 9, 2, 7, 1]);
    }

    #[test]
    fn two_page_scenario_dedups_and_terminates() {
        let mut feed = FeedState::new();

        feed.merge(page(&[1, 2], Some(2)));
        assert!(feed.has_more());
        assert_eq!(feed.cursor(), Cursor::new(2));

        feed.merge(page(&[2, 3], None));
        assert_eq!(ids(feed.items()), [1, 2, 3]);
        assert!(!feed.has_more());
    }

    #[test]
    fn termination_is_permanent() {
        let mut feed = FeedState::new();
        feed.merge(page(&[1], Some(12)));
        feed.merge(page(&[2], None));

        let outcome = feed.merge(page(&[3], Some(24)));

        assert_eq!(outcome, MergeOutcome::default());
        assert!(!feed.has_more());
        assert_eq!(ids(feed.items()), [1, 2]);
    }

    #[test]
    fn empty_page_advances_cursor() {
        let mut feed = FeedState::new();
        feed.merge(page(&[1, 2], Some(12)));

        let outcome = feed.merge(page(&[], Some(24)));

        assert_eq!(outcome.appended, 0);
        assert_eq!(ids(feed.items()), [1, 2]);
        assert_eq!(feed.cursor(), Cursor::new(24));
        assert!(feed.has_more());
    }

    #[test]
    fn repeated_next_cursor_stops_the_feed() {
        let mut feed = FeedState::new();
        feed.merge(page(&[1], Some(12)));

        let outcome = feed.merge(page(&[2], Some(12)));

        assert_eq!(outcome.stalled_at, Some(Cursor::new(12)));
        assert_eq!(outcome.appended, 1);
        assert!(!feed.has_more());
        assert_eq!(ids(feed.items()), [1, 2]);
    }

    #[test]
    fn cursor_pointing_back_to_an_earlier_page_stops_the_feed() {
        let mut feed = FeedState::new();
        feed.merge(page(&[1], Some(12)));
        feed.merge(page(&[2], Some(24)));

        let outcome = feed.merge(page(&[3], Some(0)));

        assert_eq!(outcome.stalled_at, Some(Cursor::FIRST));
        assert!(!feed.has_more());
    }

    #[test]
    fn reset_returns_to_first_page() {
        let mut feed = FeedState::new();
        feed.merge(page(&[1], None));
        feed.reset();

        assert!(feed.is_empty());
        assert!(feed.has_more());
        assert_eq!(feed.cursor(), Cursor::FIRST);

        feed.merge(page(&[1], None));
        assert_eq!(ids(feed.items()), [1]);
    }
}
