use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hub_core::{ControlId, ControlState, ConversationItem, SaveEffect, SaveFlow, SaveMsg};
use hub_logging::{hub_debug, hub_info, hub_warn};
use tokio::runtime::Handle;

use crate::api::ApiClient;
use crate::lock;
use crate::page::PageObserverPort;
use crate::settings::HubSettings;
use crate::transcript::TranscriptScraper;

pub const COLLECTION_PROMPT: &str = "Save this chat to which collection?";

/// Asks the user for a collection label. `None` means the prompt was dismissed.
///
/// Implementations may block; the runner calls them on the blocking pool.
pub trait Prompter: Send + Sync {
    fn ask(&self, message: &str, default: &str) -> Option<String>;
}

/// Executes [`SaveFlow`] effects for every injected control.
pub struct SaveRunner {
    page: Arc<dyn PageObserverPort>,
    api: Arc<dyn ApiClient>,
    prompter: Arc<dyn Prompter>,
    scraper: TranscriptScraper,
    settle_delay: Duration,
    default_collection: String,
    handle: Handle,
    flows: Mutex<HashMap<ControlId, SaveFlow>>,
}

impl SaveRunner {
    pub fn new(
        page: Arc<dyn PageObserverPort>,
        api: Arc<dyn ApiClient>,
        prompter: Arc<dyn Prompter>,
        settings: &HubSettings,
        handle: Handle,
    ) -> Self {
        Self {
            page,
            api,
            prompter,
            scraper: TranscriptScraper::new(settings.scrape.clone()),
            settle_delay: settings.capture.settle_delay,
            default_collection: settings.capture.default_collection.clone(),
            handle,
            flows: Mutex::new(HashMap::new()),
        }
    }

    /// Creates the flow for a freshly injected control.
    pub fn register(&self, control_id: ControlId, item: ConversationItem) {
        let flow = SaveFlow::with_default_collection(item, self.default_collection.clone());
        lock(&self.flows).entry(control_id).or_insert(flow);
    }

    /// Asks the backend whether the control's conversation is already stored
    /// and, if so, marks the control saved. Lookup failures leave it unsaved.
    pub fn check_saved(self: &Arc<Self>, control_id: ControlId) {
        let Some(item) = lock(&self.flows)
            .get(&control_id)
            .map(|flow| flow.item().clone())
        else {
            return;
        };
        let url = self.page.item_url(&item);
        let runner = Arc::clone(self);
        self.handle.spawn(async move {
            match runner.api.chat_status(&url).await {
                Ok(status) if status.exists => {
                    hub_debug!(
                        "Control {}: {} already stored (id {:?})",
                        control_id,
                        url,
                        status.id
                    );
                    runner.apply(control_id, SaveMsg::AlreadySaved);
                }
                Ok(_) => {}
                Err(err) => hub_debug!("Control {}: status lookup failed: {}", control_id, err),
            }
        });
    }

    pub fn control_state(&self, control_id: ControlId) -> Option<ControlState> {
        lock(&self.flows)
            .get(&control_id)
            .map(SaveFlow::control_state)
    }

    /// Click handler entry point.
    ///
    /// The state guard runs synchronously, before anything is scheduled, so a
    /// second click during a run is dropped even if rendering lags behind.
    /// Returns whether a run was started.
    pub fn click(self: &Arc<Self>, control_id: ControlId) -> bool {
        let effects = self.apply(control_id, SaveMsg::Clicked);
        if effects.is_empty() {
            hub_debug!("Ignoring click on control {} while busy or saved", control_id);
            return false;
        }
        let runner = Arc::clone(self);
        self.handle.spawn(async move {
            runner.drive(control_id, effects).await;
        });
        true
    }

    /// Runs a click to completion on the calling task and returns the final state.
    pub async fn click_and_wait(&self, control_id: ControlId) -> Option<ControlState> {
        let effects = self.apply(control_id, SaveMsg::Clicked);
        self.drive(control_id, effects).await;
        self.control_state(control_id)
    }

    async fn drive(&self, control_id: ControlId, effects: Vec<SaveEffect>) {
        let mut queue: VecDeque<SaveEffect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            if let Some(msg) = self.execute(control_id, effect).await {
                queue.extend(self.apply(control_id, msg));
            }
        }
    }

    fn apply(&self, control_id: ControlId, msg: SaveMsg) -> Vec<SaveEffect> {
        let (effects, state) = {
            let mut flows = lock(&self.flows);
            let Some(flow) = flows.get_mut(&control_id) else {
                hub_warn!("Message for unknown control {}", control_id);
                return Vec::new();
            };
            let before = flow.control_state();
            let effects = flow.apply(msg);
            let after = flow.control_state();
            (effects, (before != after).then_some(after))
        };
        if let Some(state) = state {
            self.page.render_control(control_id, state.visual());
        }
        effects
    }

    async fn execute(&self, control_id: ControlId, effect: SaveEffect) -> Option<SaveMsg> {
        match effect {
            SaveEffect::Activate(item) => {
                self.page.activate(&item);
                Some(SaveMsg::Activated)
            }
            SaveEffect::WaitSettle => {
                tokio::time::sleep(self.settle_delay).await;
                Some(SaveMsg::SettleElapsed)
            }
            SaveEffect::Scrape => Some(SaveMsg::Scraped(
                self.scraper.scrape_current(self.page.as_ref()),
            )),
            SaveEffect::PromptCollection { default } => {
                let prompter = Arc::clone(&self.prompter);
                let answer = self
                    .handle
                    .spawn_blocking(move || prompter.ask(COLLECTION_PROMPT, &default))
                    .await
                    .unwrap_or_else(|err| {
                        hub_warn!("Control {}: collection prompt aborted: {}", control_id, err);
                        None
                    });
                Some(SaveMsg::CollectionChosen(answer))
            }
            SaveEffect::Submit(request) => {
                hub_info!(
                    "Saving {:?} ({} messages) to collection {:?}",
                    request.sidebar_title,
                    request.transcript.messages.len(),
                    request.collection
                );
                Some(SaveMsg::Submitted(self.api.save_chat(&request).await))
            }
            SaveEffect::ReportSaved(ack) => {
                if ack.already_saved() {
                    hub_info!(
                        "Control {}: backend already had this chat ({})",
                        control_id,
                        ack.message.as_deref().unwrap_or("no message")
                    );
                } else {
                    hub_info!("Control {}: chat saved (id {:?})", control_id, ack.database_id);
                }
                None
            }
            SaveEffect::ReportFailure(failure) => {
                hub_warn!("Control {}: save failed: {}", control_id, failure);
                None
            }
        }
    }
}
