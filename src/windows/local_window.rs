use std::time::SystemTime;

use crate::types::{noop_stop, Count, StopFn};
use crate::window::Window;

/// In-process window with no external coordination.
///
/// All state lives in two plain fields. `sync` does nothing, and the window
/// performs no locking of its own; the owning counter's lock covers it.
///
/// A new window starts at `UNIX_EPOCH` with a zero count, so the first
/// operation on a counter always rotates it onto the current bucket.
///
/// # Example
///
/// ```rust
/// use std::time::{Duration, UNIX_EPOCH};
/// use rate_guard_counter::windows::LocalWindow;
/// use rate_guard_counter::Window;
///
/// let (mut window, stop) = LocalWindow::new();
/// window.add_count(3);
/// assert_eq!(window.count(), 3);
///
/// let start = UNIX_EPOCH + Duration::from_secs(60);
/// window.reset(start, 0);
/// assert_eq!(window.start(), start);
/// assert_eq!(window.count(), 0);
/// stop();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalWindow {
    /// Beginning of the bucket
    start: SystemTime,
    /// Events recorded since `start`
    count: Count,
}

impl LocalWindow {
    /// Creates an empty local window together with its (no-op) stop function.
    ///
    /// The signature matches [`NewWindow`](crate::NewWindow), so this function
    /// can be handed straight to [`Counter::new`](crate::Counter::new).
    pub fn new() -> (Self, StopFn) {
        (Self::default(), noop_stop())
    }
}

impl Default for LocalWindow {
    fn default() -> Self {
        LocalWindow {
            start: SystemTime::UNIX_EPOCH,
            count: 0,
        }
    }
}

impl Window for LocalWindow {
    #[inline]
    fn start(&self) -> SystemTime {
        self.start
    }

    #[inline]
    fn count(&self) -> Count {
        self.count
    }

    #[inline]
    fn add_count(&mut self, n: Count) {
        self.count = self.count.saturating_add(n);
    }

    #[inline]
    fn reset(&mut self, start: SystemTime, count: Count) {
        self.start = start;
        self.count = count;
    }

    #[inline]
    fn sync(&mut self, _now: SystemTime) {}
}
