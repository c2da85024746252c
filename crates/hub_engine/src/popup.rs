use std::sync::{Arc, Mutex};

use hub_core::{update, PopupEffect, PopupMsg, PopupState, PopupViewModel};
use hub_logging::hub_debug;
use tokio::runtime::Handle;

use crate::api::ApiClient;
use crate::lock;

/// Draws the popup. Called with a fresh view model after every change.
pub trait PopupRenderer: Send + Sync {
    fn render(&self, view: &PopupViewModel);
}

/// Runs the popup: applies messages to [`PopupState`], renders, and executes
/// the resulting backend calls, feeding their outcomes back as messages.
pub struct PopupController {
    api: Arc<dyn ApiClient>,
    renderer: Arc<dyn PopupRenderer>,
    handle: Handle,
    state: Mutex<Revisioned>,
    // Revision of the newest view handed to the renderer.
    rendered: Mutex<u64>,
}

/// Popup state plus a counter bumped on every change that needs a render.
#[derive(Default)]
struct Revisioned {
    state: PopupState,
    revision: u64,
}

impl PopupController {
    pub fn new(api: Arc<dyn ApiClient>, renderer: Arc<dyn PopupRenderer>, handle: Handle) -> Arc<Self> {
        Arc::new(Self {
            api,
            renderer,
            handle,
            state: Mutex::new(Revisioned::default()),
            rendered: Mutex::new(0),
        })
    }

    /// Shortcut for [`PopupMsg::Opened`].
    pub fn open(self: &Arc<Self>) {
        self.dispatch(PopupMsg::Opened);
    }

    /// Applies `msg`, renders if anything changed, and starts the resulting
    /// backend calls.
    ///
    /// Completions dispatch from worker tasks, so two dispatches may race to
    /// the renderer; a view older than the last one rendered is discarded.
    /// The renderer must not dispatch from inside `render`.
    pub fn dispatch(self: &Arc<Self>, msg: PopupMsg) {
        let (effects, maybe_view) = {
            let mut guard = lock(&self.state);
            let state = std::mem::take(&mut guard.state);
            let (mut state, effects) = update(state, msg);
            let maybe_view = if state.consume_dirty() {
                guard.revision += 1;
                Some((guard.revision, state.view()))
            } else {
                None
            };
            guard.state = state;
            (effects, maybe_view)
        };

        if let Some((revision, view)) = maybe_view {
            self.render(revision, &view);
        }
        for effect in effects {
            self.spawn_effect(effect);
        }
    }

    pub fn view(&self) -> PopupViewModel {
        lock(&self.state).state.view()
    }

    fn render(&self, revision: u64, view: &PopupViewModel) {
        let mut rendered = lock(&self.rendered);
        if revision < *rendered {
            hub_debug!("Skipping stale popup render {} (shown {})", revision, *rendered);
            return;
        }
        *rendered = revision;
        self.renderer.render(view);
    }

    fn spawn_effect(self: &Arc<Self>, effect: PopupEffect) {
        let controller = Arc::clone(self);
        self.handle.spawn(async move {
            let msg = controller.execute(effect).await;
            controller.dispatch(msg);
        });
    }

    async fn execute(&self, effect: PopupEffect) -> PopupMsg {
        match effect {
            PopupEffect::FetchCollections => {
                hub_debug!("Fetching collections");
                PopupMsg::CollectionsLoaded(self.api.list_collections().await)
            }
            PopupEffect::FetchChats { collection } => {
                hub_debug!("Fetching chats in {:?}", collection);
                let result = self.api.list_chats(&collection).await;
                PopupMsg::ChatsLoaded { collection, result }
            }
            PopupEffect::Search(query) => {
                hub_debug!(
                    "Searching {:?} (filter {:?})",
                    query.query,
                    query.collection_filter
                );
                let result = self.api.ai_search(&query).await;
                PopupMsg::SearchCompleted { query, result }
            }
        }
    }
}
