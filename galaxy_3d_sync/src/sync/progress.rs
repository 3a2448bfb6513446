/// Cooperative cancellation and status shared with the host.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Cloneable handle: every clone sees the same cancel flag and status line
#[derive(Debug, Clone, Default)]
pub struct SyncProgress {
    cancel: Arc<AtomicBool>,
    status: Arc<Mutex<String>>,
}

impl SyncProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running pass to stop after the current instance
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Clear a previous cancel request
    pub fn reset(&self) {
        self.cancel.store(false, Ordering::Release);
    }

    pub fn set_status(&self, status: impl Into<String>) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status.into();
    }

    pub fn status(&self) -> String {
        self.status.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
