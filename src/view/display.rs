//! Display-update signalling.
//!
//! Background loads and view handlers request a repaint through a
//! [`DisplayUpdater`]; the event loop drains the matching
//! [`DisplayUpdates`] and draws once however many requests piled up.

use std::sync::mpsc::{self, Receiver, Sender};
use tracing::trace;

/// Create a connected updater / receiver pair.
pub fn display_channel() -> (DisplayUpdater, DisplayUpdates) {
    let (tx, rx) = mpsc::channel();
    (DisplayUpdater { tx }, DisplayUpdates { rx })
}

/// Fire-and-forget repaint requests. Cheap to clone, safe to send across
/// threads.
#[derive(Debug, Clone)]
pub struct DisplayUpdater {
    tx: Sender<()>,
}

impl DisplayUpdater {
    pub fn update_display(&self) {
        // The receiver is gone only while the app shuts down.
        if self.tx.send(()).is_err() {
            trace!("Display update dropped; event loop has exited");
        }
    }
}

/// Receiving end held by the event loop.
#[derive(Debug)]
pub struct DisplayUpdates {
    rx: Receiver<()>,
}

impl DisplayUpdates {
    /// Consume every pending request without blocking. Returns how many
    /// were pending.
    pub fn drain(&self) -> usize {
        self.rx.try_iter().count()
    }
}
