use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use hub_core::ControlState;
use hub_logging::hub_debug;

use crate::lock;
use crate::page::PageObserverPort;
use crate::save_runner::SaveRunner;

/// Attaches one save control to every conversation item that lacks one.
pub struct ButtonInjector {
    page: Arc<dyn PageObserverPort>,
    runner: Arc<SaveRunner>,
    check_saved: bool,
    next_id: AtomicU64,
    // Scans may arrive from several threads; the marker check alone only
    // suffices on a single thread.
    scan_guard: Mutex<()>,
}

impl ButtonInjector {
    pub fn new(page: Arc<dyn PageObserverPort>, runner: Arc<SaveRunner>) -> Self {
        Self {
            page,
            runner,
            check_saved: false,
            next_id: AtomicU64::new(1),
            scan_guard: Mutex::new(()),
        }
    }

    /// Looks up every newly injected item on the backend so chats saved in an
    /// earlier session show as saved.
    pub fn with_saved_check(mut self, enabled: bool) -> Self {
        self.check_saved = enabled;
        self
    }

    /// Returns the number of controls injected by this scan.
    pub fn scan(&self) -> usize {
        let _guard = lock(&self.scan_guard);
        let mut injected = 0;
        for item in self.page.find_candidates() {
            if self.page.has_control(&item) {
                continue;
            }
            let control_id = self.next_id.fetch_add(1, Ordering::Relaxed);
            self.runner.register(control_id, item.clone());

            let runner = Arc::downgrade(&self.runner);
            self.page.attach_control(
                &item,
                control_id,
                Arc::new(move || {
                    if let Some(runner) = runner.upgrade() {
                        runner.click(control_id);
                    }
                }),
            );
            self.page
                .render_control(control_id, ControlState::Unsaved.visual());
            if self.check_saved {
                self.runner.check_saved(control_id);
            }
            injected += 1;
        }
        if injected > 0 {
            hub_debug!("Injected {} save control(s)", injected);
        }
        injected
    }
}
