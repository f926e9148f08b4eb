//! Selection listeners.
//!
//! Views that depend on the selected ref register a [`RefListener`] with the
//! ref view. Notification is an in-order fold that stops at the first
//! failure. It is not transactional: listeners that already ran keep their
//! side effects when a later one fails.

use crate::model::{Oid, ViewError};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Something that reacts to a ref being selected.
pub trait RefListener: Send + Sync {
    fn on_ref_select(&self, ref_name: &str, oid: &Oid) -> Result<(), ViewError>;
}

/// Append-only, ordered list of listeners.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    listeners: Vec<Arc<dyn RefListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: Arc<dyn RefListener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notify listeners in registration order.
    ///
    /// # Errors
    /// The first failure, wrapped in [`ViewError::Listener`]; later
    /// listeners are not invoked.
    pub fn notify(&self, ref_name: &str, oid: &Oid) -> Result<(), ViewError> {
        debug!(ref_name, %oid, listeners = self.listeners.len(), "Notifying ref listeners");

        self.listeners.iter().try_for_each(|listener| {
            listener
                .on_ref_select(ref_name, oid)
                .map_err(|source| ViewError::Listener {
                    ref_name: ref_name.to_string(),
                    source: Box::new(source),
                })
        })
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
