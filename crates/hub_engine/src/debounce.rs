use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::lock;

pub type SettledCallback = Arc<dyn Fn() + Send + Sync>;

/// Collapses bursts of triggers into one callback after a quiet period.
///
/// At most one delayed callback is armed at a time; every `trigger` discards
/// the pending one before arming a new one.
pub struct Debouncer {
    handle: Handle,
    quiet: Duration,
    callback: SettledCallback,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(handle: Handle, quiet: Duration, callback: SettledCallback) -> Self {
        Self {
            handle,
            quiet,
            callback,
            pending: Mutex::new(None),
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    pub fn trigger(&self) {
        let callback = Arc::clone(&self.callback);
        // The window runs from the notification, not from when the task is first polled.
        let deadline = Instant::now() + self.quiet;
        let mut pending = lock(&self.pending);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(self.handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            callback();
        }));
    }

    /// Discards the pending callback, if any, without arming a new one.
    pub fn cancel(&self) {
        if let Some(previous) = lock(&self.pending).take() {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.pending)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
