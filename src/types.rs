//! Shared type aliases for window counts and backend teardown.
//!
//! Counts are signed: the window contract allows any integer to be added,
//! even though the counter itself only ever adds non-negative values.

/// Alias for the integer type used for window counts and estimates.
pub type Count = i64;

/// Releases background resources owned by a window backend.
///
/// Every window factory returns one of these alongside the window. Call it
/// once you are entirely done with the counter that owns the window.
pub type StopFn = Box<dyn FnOnce() + Send + 'static>;

/// Returns a [`StopFn`] that does nothing, for backends with nothing to release.
pub fn noop_stop() -> StopFn {
    Box::new(|| {})
}
