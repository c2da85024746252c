use std::sync::Arc;

use hub_logging::hub_info;
use tokio::runtime::Handle;

use crate::api::ApiClient;
use crate::injector::ButtonInjector;
use crate::observer::CaptureObserver;
use crate::page::PageObserverPort;
use crate::save_runner::{Prompter, SaveRunner};
use crate::settings::HubSettings;

/// The wired capture side: observer → injector → save runner.
pub struct CapturePipeline {
    injector: Arc<ButtonInjector>,
    runner: Arc<SaveRunner>,
    observer: CaptureObserver,
}

impl CapturePipeline {
    /// Subscribes to the page, performs the startup scan, and returns the
    /// running pipeline. Dropping it stops further rescans.
    pub fn start(
        page: Arc<dyn PageObserverPort>,
        api: Arc<dyn ApiClient>,
        prompter: Arc<dyn Prompter>,
        settings: &HubSettings,
        handle: Handle,
    ) -> Self {
        let runner = Arc::new(SaveRunner::new(
            Arc::clone(&page),
            api,
            prompter,
            settings,
            handle.clone(),
        ));
        let injector = Arc::new(
            ButtonInjector::new(Arc::clone(&page), Arc::clone(&runner))
                .with_saved_check(settings.capture.check_saved_on_inject),
        );

        let weak_injector = Arc::downgrade(&injector);
        let observer = CaptureObserver::start(
            page.as_ref(),
            handle,
            settings.capture.debounce_quiet,
            Arc::new(move || {
                if let Some(injector) = weak_injector.upgrade() {
                    injector.scan();
                }
            }),
        );

        let injected = injector.scan();
        hub_info!("Capture pipeline started; {} control(s) injected", injected);

        Self {
            injector,
            runner,
            observer,
        }
    }

    /// Immediate rescan, bypassing the debounce timer.
    pub fn rescan(&self) -> usize {
        self.injector.scan()
    }

    pub fn runner(&self) -> &Arc<SaveRunner> {
        &self.runner
    }

    pub fn observer(&self) -> &CaptureObserver {
        &self.observer
    }
}
