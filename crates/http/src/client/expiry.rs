//! Session-expiry signal
//!
//! Lets UI unrelated to the failing request react when the session cannot be
//! salvaged (force a re-login prompt, redirect, ...). The signal is handed to
//! the client at build time; clones share the same handler slot.

use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::Arc;

type Handler = Box<dyn Fn() + Send + Sync>;

/// Holds at most one expiry handler
#[derive(Clone)]
pub struct ExpirySignal {
    handler: Arc<ArcSwapOption<Handler>>,
}

impl ExpirySignal {
    /// Create a signal with no handler installed
    pub fn new() -> Self {
        Self {
            handler: Arc::new(ArcSwapOption::empty()),
        }
    }

    /// Install the handler, replacing any previous one
    pub fn set_handler(&self, handler: impl Fn() + Send + Sync + 'static) {
        let handler: Handler = Box::new(handler);
        self.handler.store(Some(Arc::new(handler)));
    }

    /// Remove the handler
    pub fn clear_handler(&self) {
        self.handler.store(None);
    }

    pub fn has_handler(&self) -> bool {
        self.handler.load().is_some()
    }

    /// Call the current handler. Returns whether one was installed.
    pub fn trigger(&self) -> bool {
        // load_full so a concurrent set_handler cannot swap it out mid-call
        match self.handler.load_full() {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl Default for ExpirySignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExpirySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpirySignal")
            .field("has_handler", &self.has_handler())
            .finish()
    }
}
