use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_AUTO_CLEAR: Duration = Duration::from_millis(15_000);

#[derive(Debug, Default)]
struct ClearTimer {
    /// Bumped on every set/clear so a stale timer never clears a newer message.
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

/// Last API error, shown as a transient banner.
///
/// Only the most recent message is kept; a new error replaces the previous
/// one and restarts the auto-clear countdown.
#[derive(Debug, Clone)]
pub struct ErrorBroadcaster {
    tx: Arc<watch::Sender<Option<String>>>,
    timer: Arc<Mutex<ClearTimer>>,
    auto_clear: Duration,
}

impl ErrorBroadcaster {
    pub fn new(auto_clear: Duration) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            timer: Arc::new(Mutex::new(ClearTimer::default())),
            auto_clear,
        }
    }

    /// Publish `message` and schedule it to clear after the default delay.
    /// Must be called from within a tokio runtime.
    pub fn set_error(&self, message: impl Into<String>) {
        self.set_error_for(message, self.auto_clear);
    }

    pub fn set_error_for(&self, message: impl Into<String>, auto_clear: Duration) {
        let message = message.into();
        let mut timer = lock(&self.timer);
        timer.generation += 1;
        if let Some(handle) = timer.handle.take() {
            handle.abort();
        }
        self.tx.send_replace(Some(message));

        let generation = timer.generation;
        let tx = self.tx.clone();
        let state = self.timer.clone();
        timer.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(auto_clear).await;
            let mut timer = lock(&state);
            if timer.generation == generation {
                timer.handle = None;
                tx.send_replace(None);
            }
        }));
    }

    pub fn clear_error(&self) {
        let mut timer = lock(&self.timer);
        timer.generation += 1;
        if let Some(handle) = timer.handle.take() {
            handle.abort();
        }
        self.tx.send_replace(None);
    }

    pub fn current(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    /// The returned receiver holds the current state immediately.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}

impl Default for ErrorBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_CLEAR)
    }
}

fn lock(timer: &Mutex<ClearTimer>) -> MutexGuard<'_, ClearTimer> {
    timer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
