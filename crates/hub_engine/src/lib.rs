//! Chat hub engine: page ports, backend client, and effect execution for the
//! capture pipeline and the popup.
mod api;
mod debounce;
mod document;
mod injector;
mod observer;
mod page;
mod pipeline;
mod popup;
mod save_runner;
mod settings;
mod text;
mod transcript;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use api::{ApiClient, ApiSetupError, ReqwestApiClient};
pub use debounce::{Debouncer, SettledCallback};
pub use document::{DocumentPage, NavigationHandler};
pub use injector::ButtonInjector;
pub use observer::CaptureObserver;
pub use page::{ClickHandler, MutationCallback, PageObserverPort, RenderedMessage};
pub use pipeline::CapturePipeline;
pub use popup::{PopupController, PopupRenderer};
pub use save_runner::{Prompter, SaveRunner, COLLECTION_PROMPT};
pub use settings::{
    ApiSettings, CaptureSettings, ContentFormat, HubSettings, PageSelectors, ScrapeSettings,
    DEFAULT_BASE_URL,
};
pub use transcript::TranscriptScraper;

/// A panicked holder leaves plain data behind; keep using it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
