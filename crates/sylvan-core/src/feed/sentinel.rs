//! Load trigger for the end of the feed.
//!
//! The sentinel is an invisible marker rendered after the last item while
//! more pages exist. When it becomes visible the next page is requested.

/// Trigger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelState {
    /// Waiting for the marker to become visible.
    Idle,
    /// Marker was seen; the next page is pending.
    Triggered,
    /// The feed has no more pages. No marker, no further triggers.
    Exhausted,
}

/// Decides when the next page may be requested.
///
/// Visibility is ignored until the initial load has established a baseline
/// cursor, and for good once the feed is exhausted. A visible marker while a
/// request is already pending asks again; de-duplicating that request is the
/// job of the keyed [`PageCache`](crate::PageCache).
#[derive(Debug, Clone)]
pub struct Sentinel {
    state: SentinelState,
    armed: bool,
}

impl Default for Sentinel {
    fn default() -> Self {
        Self::new()
    }
}

impl Sentinel {
    /// A sentinel waiting for the initial load.
    pub fn new() -> Self {
        Self {
            state: SentinelState::Idle,
            armed: false,
        }
    }

    pub fn state(&self) -> SentinelState {
        self.state
    }

    /// Returns true once the initial load has completed.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Returns true while the marker should be rendered.
    pub fn is_rendered(&self) -> bool {
        self.state != SentinelState::Exhausted
    }

    /// Record that the initial page resolved successfully.
    pub fn arm(&mut self, has_more: bool) {
        self.armed = true;
        if !has_more {
            self.state = SentinelState::Exhausted;
        }
    }

    /// The marker entered the viewport. Returns true if a page should load.
    pub fn on_visible(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        match self.state {
            SentinelState::Exhausted => false,
            SentinelState::Idle | SentinelState::Triggered => {
                self.state = SentinelState::Triggered;
                true
            }
        }
    }

    /// The pending page resolved, successfully or not.
    pub fn on_resolved(&mut self, has_more: bool) {
        if self.state == SentinelState::Exhausted {
            return;
        }
        self.state = if has_more {
            SentinelState::Idle
        } else {
            SentinelState::Exhausted
        };
    }

    /// Back to the pre-initial-load state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_visibility_before_initial_load() {
        let mut sentinel = Sentinel::new();
        assert!(!sentinel.on_visible());
        assert_eq!(sentinel.state(), SentinelState::Idle);
    }

    #[test]
    fn idle_to_triggered_to_idle() {
        let mut sentinel = Sentinel::new();
        sentinel.arm(true);

        assert!(sentinel.on_visible());
        assert_eq!(sentinel.state(), SentinelState::Triggered);

        sentinel.on_resolved(true);
        assert_eq!(sentinel.state(), SentinelState::Idle);
        assert!(sentinel.is_rendered());
    }

    #[test]
    fn triggered_to_exhausted() {
        let mut sentinel = Sentinel::new();
        sentinel.arm(true);
        sentinel.on_visible();
        sentinel.on_resolved(false);

        assert_eq!(sentinel.state(), SentinelState::Exhausted);
        assert!(!sentinel.is_rendered());
        assert!(!sentinel.on_visible());
    }

    #[test]
    fn single_page_feed_is_exhausted_on_arm() {
        let mut sentinel = Sentinel::new();
        sentinel.arm(false);
        assert!(!sentinel.is_rendered());
        assert!(!sentinel.on_visible());
    }

    #[test]
    fn exhausted_is_terminal() {
        let mut sentinel = Sentinel::new();
        sentinel.arm(false);
        sentinel.on_resolved(true);
        assert_eq!(sentinel.state(), SentinelState::Exhausted);
    }

    #[test]
    fn triggered_marker_asks_again() {
        let mut sentinel = Sentinel::new();
        sentinel.arm(true);
        assert!(sentinel.on_visible());
        assert!(sentinel.on_visible());
        assert_eq!(sentinel.state(), SentinelState::Triggered);
    }
}
