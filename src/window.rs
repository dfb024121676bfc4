//! Core trait for window backends.
//!
//! This module defines the contract every window implementation satisfies, whether
//! it keeps its count purely in-process or reconciles it with an external store.
//! The [`Counter`](crate::Counter) drives windows exclusively through this trait.

use std::time::SystemTime;

use crate::types::{Count, StopFn};

/// A single fixed-size time bucket tracking an event count.
///
/// The bucket's size is not stored in the window; it belongs to the counter that
/// owns it. Implementations need no internal locking: the owning counter calls
/// every method while holding its own lock.
pub trait Window: Send {
    /// Returns the instant at which this bucket begins.
    fn start(&self) -> SystemTime;

    /// Returns the number of events recorded since [`start`](Window::start).
    fn count(&self) -> Count;

    /// Adds `n` events to the bucket.
    fn add_count(&mut self, n: Count);

    /// Replaces both the start instant and the count.
    fn reset(&mut self, start: SystemTime, count: Count);

    /// Reconciles the in-memory count with the window's backing store.
    ///
    /// Called with the counter's lock held, so it must return promptly and must
    /// handle its own failures. It must be safe to call when there is nothing
    /// to synchronize.
    fn sync(&mut self, now: SystemTime);
}

impl<W: Window + ?Sized> Window for Box<W> {
    fn start(&self) -> SystemTime {
        (**self).start()
    }

    fn count(&self) -> Count {
        (**self).count()
    }

    fn add_count(&mut self, n: Count) {
        (**self).add_count(n)
    }

    fn reset(&mut self, start: SystemTime, count: Count) {
        (**self).reset(start, count)
    }

    fn sync(&mut self, now: SystemTime) {
        (**self).sync(now)
    }
}

/// Builds the window used for a counter's current slot.
///
/// Any `FnOnce() -> (W, StopFn)` is a factory, so [`LocalWindow::new`] can be
/// passed as-is. The returned [`StopFn`] releases whatever background resources the
/// backend holds.
///
/// [`LocalWindow::new`]: crate::windows::LocalWindow::new
pub trait NewWindow {
    /// The window type produced by this factory.
    type Window: Window + 'static;

    /// Creates the window and its stop function.
    fn new_window(self) -> (Self::Window, StopFn);
}

impl<F, W> NewWindow for F
where
    F: FnOnce() -> (W, StopFn),
    W: Window + 'static,
{
    type Window = W;

    fn new_window(self) -> (W, StopFn) {
        self()
    }
}
