use std::sync::Arc;
use std::time::Duration;

use hub_logging::hub_trace;
use tokio::runtime::Handle;

use crate::debounce::{Debouncer, SettledCallback};
use crate::page::PageObserverPort;

/// Watches the page and fires `on_settled` once per quiet interval.
///
/// Dropping the observer disarms it; the page keeps only a weak reference.
pub struct CaptureObserver {
    debouncer: Arc<Debouncer>,
}

impl CaptureObserver {
    pub fn start(
        page: &dyn PageObserverPort,
        handle: Handle,
        quiet: Duration,
        on_settled: SettledCallback,
    ) -> Self {
        let debouncer = Arc::new(Debouncer::new(handle, quiet, on_settled));
        let weak = Arc::downgrade(&debouncer);
        page.observe(Arc::new(move || {
            if let Some(debouncer) = weak.upgrade() {
                hub_trace!("Page mutation; re-arming rescan timer");
                debouncer.trigger();
            }
        }));
        Self { debouncer }
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }
}
