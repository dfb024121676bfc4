//! Window backend implementations.
//!
//! Only the in-process [`LocalWindow`] ships with this crate. Backends that keep
//! a window's count consistent with an external store implement
//! [`Window`](crate::Window) themselves and are injected through a factory when
//! the counter is built.
//!
//! # Backend Comparison
//!
//! | Backend | Shared across processes | `sync` | Background resources |
//! |---------|-------------------------|--------|----------------------|
//! | Local | No | No-op | None |
//! | Synchronized (external) | Yes | Reconciles with store | Released by its `StopFn` |

pub mod local_window;
pub use local_window::LocalWindow;
