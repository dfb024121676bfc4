//! A sliding window event counter for Rust applications.
//!
//! This library estimates how many events happened within a trailing time window
//! using only two window buckets, instead of storing a timestamp per event. It is
//! a building block for rate limiters and admission control; deciding whether to
//! allow a request based on the count is left to the caller.
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::{Duration, SystemTime};
//! use rate_guard_counter::Counter;
//! use rate_guard_counter::windows::LocalWindow;
//!
//! // One-minute window kept in-process, no background sync
//! let (counter, stop) = Counter::new(Duration::from_secs(60), LocalWindow::new, Duration::ZERO)
//!     .expect("valid window size");
//!
//! counter.increment();
//! assert!(counter.count(SystemTime::now()) >= 1);
//!
//! counter.stop();
//! stop();
//! ```
//!
//! # Core Concepts
//!
//! ## Two-Window Estimate
//! Time is split into buckets of `size`, aligned from `UNIX_EPOCH`. The counter
//! holds the current bucket and the one before it. The previous bucket's count is
//! scaled by the fraction of it that still lies inside the trailing window:
//!
//! ```text
//!            previous bucket        current bucket
//!        |----------------------|---------------------|
//!              |<-------------- size --------------->|
//!              ^ trailing window start              ^ now
//! ```
//!
//! ## Window Backends
//! Counts live in [`Window`] implementations. The current window is built by a
//! factory passed at construction, so it may be kept purely in memory
//! ([`LocalWindow`](windows::LocalWindow)) or reconciled with an external store
//! through [`Window::sync`]. The previous window is always local.
//!
//! ## Background Sync
//! With a non-zero sync interval the counter runs one thread that periodically
//! calls `sync` on the current window, so a synchronized backend stays current
//! during idle periods. Call [`Counter::stop`] to end it; dropping the counter
//! also stops it.
//!
//! ## Error Handling
//! Counting is infallible. Construction returns [`CounterError`] for a zero window
//! size or a failed thread spawn.
//!
//! ## Thread Safety
//! [`Counter`] is `Send + Sync`. All operations take a single internal mutex, so
//! concurrent writers never lose updates.

pub mod config;
pub mod counter;
pub mod error;
mod sync_loop;
pub mod types;
pub mod window;
pub mod windows;

pub use config::CounterConfig;
pub use counter::Counter;
pub use error::{CounterError, Result};
pub use types::{noop_stop, Count, StopFn};
pub use window::{NewWindow, Window};
