//! Background reconciliation for a counter's current window.
//!
//! Windows backed by an external store only get a chance to reconcile when
//! something calls `sync`. Writes do that on their own; this loop covers idle
//! periods by ticking on a fixed interval until it is told to stop.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

use tracing::{debug, trace, warn};

const THREAD_NAME: &str = "window-sync";

/// Handle to a running sync thread.
///
/// Dropping the handle without calling [`stop`](SyncLoop::stop) disconnects the
/// stop channel, which also ends the thread, but does not wait for it.
#[derive(Debug)]
pub(crate) struct SyncLoop {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl SyncLoop {
    /// Spawns a thread that calls `tick` every `interval`.
    pub(crate) fn spawn<F>(interval: Duration, mut tick: F) -> io::Result<Self>
    where
        F: FnMut(SystemTime) + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                debug!(?interval, "window sync loop started");
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    trace!("window sync tick");
                    tick(SystemTime::now());
                }
                debug!("window sync loop stopped");
            })?;

        Ok(Self { stop_tx, handle })
    }

    /// Signals the thread to stop and waits for it to exit.
    pub(crate) fn stop(self) {
        // The thread may already be gone, in which case the send fails harmlessly.
        let _ = self.stop_tx.send(());
        if self.handle.join().is_err() {
            warn!("window sync thread panicked");
        }
    }
}
