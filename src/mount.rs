// Liveness guard for view state. A view owns a `Mount`; every async
// completion carries a `MountToken` and only touches view state while the
// view is still mounted.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct Mount {
    live: Arc<AtomicBool>,
}

#[derive(Debug, Clone)]
pub struct MountToken {
    live: Arc<AtomicBool>,
}

impl Default for Mount {
    fn default() -> Self {
        Self::new()
    }
}

impl Mount {
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn token(&self) -> MountToken {
        MountToken {
            live: Arc::clone(&self.live),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    pub fn unmount(&self) {
        self.live.store(false, Ordering::SeqCst);
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl MountToken {
    pub fn is_mounted(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    // Runs `update` against the state only while mounted; returns whether it ran
    pub fn apply<S>(&self, state: &Mutex<S>, update: impl FnOnce(&mut S)) -> bool {
        if !self.is_mounted() {
            debug!("discarding completion for unmounted view");
            return false;
        }
        update(&mut state.lock());
        true
    }
}
