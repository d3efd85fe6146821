//! Render model for a feed.

/// Number of skeleton cards shown while a page loads.
pub const SKELETON_PLACEHOLDERS: usize = 4;

/// Progress of the most recent page request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A page request is in flight.
    Loading,
    /// The last page request failed.
    Failed(String),
}

/// What a front end should render for a feed right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedView<'a, T> {
    /// First page is loading: only placeholders.
    Loading { placeholders: usize },
    /// The feed loaded completely and holds no items.
    Empty,
    /// The first page failed; there is nothing to show.
    Failed { message: &'a str },
    /// Accumulated items, trailed by placeholders while the next page loads
    /// and by the sentinel marker while more pages exist. A failed next page
    /// is reported in `error` without hiding what was already loaded.
    Items {
        items: &'a [T],
        placeholders: usize,
        sentinel: bool,
        error: Option<&'a str>,
    },
}

impl<'a, T> FeedView<'a, T> {
    /// Derive the view from feed state.
    ///
    /// `loaded` is true once any page has merged successfully; `has_more`
    /// mirrors the accumulator.
    pub fn build(items: &'a [T], status: &'a LoadStatus, loaded: bool, has_more: bool) -> Self {
        let error = match status {
            LoadStatus::Failed(message) => Some(message.as_str()),
            _ => None,
        };
        let placeholders = if *status == LoadStatus::Loading {
            SKELETON_PLACEHOLDERS
        } else {
            0
        };

        if !loaded {
            return match error {
                Some(message) => Self::Failed { message },
                None => Self::Loading {
                    placeholders: SKELETON_PLACEHOLDERS,
                },
            };
        }

        if items.is_empty() && !has_more && placeholders == 0 && error.is_none() {
            return Self::Empty;
        }

        Self::Items {
            items,
            placeholders,
            sentinel: has_more,
            error,
        }
    }

    /// Returns true if the sentinel marker is part of this view.
    pub fn has_sentinel(&self) -> bool {
        matches!(self, Self::Items { sentinel: true, .. })
    }
}
