#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use hub_core::{
    ChatStatus, ChatSummary, ControlId, ControlVisual, ConversationItem, PopupViewModel, RequestError,
    SaveAck, SaveRequest, SearchQuery, SearchResult,
};
use hub_engine::{
    ApiClient, ClickHandler, MutationCallback, PageObserverPort, PopupRenderer, Prompter,
    RenderedMessage,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(hub_logging::initialize_for_tests);
}

/// Lets spawned tasks run until they block on a timer or finish.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Waits until `check` holds, polling with short timer sleeps so blocking-pool
/// work (the collection prompt) can finish.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..2_000 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not reached");
}

#[derive(Default)]
struct FakePageState {
    items: Vec<ConversationItem>,
    transcripts: HashMap<String, Vec<RenderedMessage>>,
    open: Option<String>,
    observers: Vec<MutationCallback>,
    controls: HashMap<String, (ControlId, ClickHandler)>,
    visuals: HashMap<ControlId, ControlVisual>,
    activations: Vec<String>,
}

/// In-memory host page: a conversation list plus one transcript per item.
#[derive(Default)]
pub struct FakePage {
    state: Mutex<FakePageState>,
}

impl FakePage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Adds a list entry without notifying observers.
    pub fn add_item(&self, href: &str, label: &str, messages: Vec<RenderedMessage>) {
        let mut state = self.state.lock().unwrap();
        state.items.push(ConversationItem::new(href, label));
        state.transcripts.insert(href.to_string(), messages);
    }

    /// Fires one structural-change notification.
    pub fn mutate(&self) {
        let observers = self.state.lock().unwrap().observers.clone();
        for observer in observers {
            observer();
        }
    }

    pub fn click(&self, href: &str) -> bool {
        let handler = self
            .state
            .lock()
            .unwrap()
            .controls
            .get(href)
            .map(|(_, handler)| Arc::clone(handler));
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    pub fn control_id(&self, href: &str) -> Option<ControlId> {
        self.state.lock().unwrap().controls.get(href).map(|(id, _)| *id)
    }

    pub fn control_count(&self) -> usize {
        self.state.lock().unwrap().controls.len()
    }

    pub fn visual(&self, href: &str) -> Option<ControlVisual> {
        let state = self.state.lock().unwrap();
        let (id, _) = state.controls.get(href)?;
        state.visuals.get(id).copied()
    }

    pub fn activations(&self) -> Vec<String> {
        self.state.lock().unwrap().activations.clone()
    }
}

impl PageObserverPort for FakePage {
    fn observe(&self, callback: MutationCallback) {
        self.state.lock().unwrap().observers.push(callback);
    }

    fn find_candidates(&self) -> Vec<ConversationItem> {
        self.state.lock().unwrap().items.clone()
    }

    fn find_messages(&self) -> Vec<RenderedMessage> {
        let state = self.state.lock().unwrap();
        state
            .open
            .as_ref()
            .and_then(|href| state.transcripts.get(href))
            .cloned()
            .unwrap_or_default()
    }

    fn activate(&self, item: &ConversationItem) {
        let mut state = self.state.lock().unwrap();
        state.open = Some(item.href.clone());
        state.activations.push(item.href.clone());
    }

    fn has_control(&self, item: &ConversationItem) -> bool {
        self.state.lock().unwrap().controls.contains_key(&item.href)
    }

    fn attach_control(&self, item: &ConversationItem, control_id: ControlId, on_click: ClickHandler) {
        self.state
            .lock()
            .unwrap()
            .controls
            .insert(item.href.clone(), (control_id, on_click));
    }

    fn render_control(&self, control_id: ControlId, visual: ControlVisual) {
        self.state.lock().unwrap().visuals.insert(control_id, visual);
    }

    fn current_url(&self) -> String {
        let state = self.state.lock().unwrap();
        match &state.open {
            Some(href) => format!("https://gemini.google.com{href}"),
            None => "https://gemini.google.com/app".to_string(),
        }
    }

    fn item_url(&self, item: &ConversationItem) -> String {
        format!("https://gemini.google.com{}", item.href)
    }

    fn page_title(&self) -> String {
        "Gemini".to_string()
    }
}

pub fn two_messages() -> Vec<RenderedMessage> {
    vec![
        RenderedMessage::new("user-query", "  what is a subquery \n"),
        RenderedMessage::new("model-response", "A **subquery** is a nested query."),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListCollections,
    ListChats(String),
    SaveChat(SaveRequest),
    AiSearch(SearchQuery),
    ChatStatus(String),
}

/// Backend double returning canned responses and recording every call.
pub struct ScriptedApi {
    calls: Mutex<Vec<ApiCall>>,
    collections: Mutex<Result<Vec<String>, RequestError>>,
    chats: Mutex<HashMap<String, Vec<ChatSummary>>>,
    save: Mutex<Result<SaveAck, RequestError>>,
    search: Mutex<Result<SearchResult, RequestError>>,
    stored: Mutex<HashSet<String>>,
    status_error: Mutex<Option<RequestError>>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            collections: Mutex::new(Ok(Vec::new())),
            chats: Mutex::new(HashMap::new()),
            save: Mutex::new(Ok(SaveAck {
                status: Some("success".into()),
                message: None,
                database_id: Some(1),
            })),
            search: Mutex::new(Ok(SearchResult {
                answer: String::new(),
                sources: Vec::new(),
            })),
            stored: Mutex::new(HashSet::new()),
            status_error: Mutex::new(None),
        })
    }

    pub fn set_collections(&self, result: Result<Vec<String>, RequestError>) {
        *self.collections.lock().unwrap() = result;
    }

    pub fn set_chats(&self, collection: &str, chats: Vec<ChatSummary>) {
        self.chats
            .lock()
            .unwrap()
            .insert(collection.to_string(), chats);
    }

    pub fn set_save(&self, result: Result<SaveAck, RequestError>) {
        *self.save.lock().unwrap() = result;
    }

    pub fn set_search(&self, result: Result<SearchResult, RequestError>) {
        *self.search.lock().unwrap() = result;
    }

    /// Makes `chat_status` report `url` as already stored.
    pub fn mark_stored(&self, url: &str) {
        self.stored.lock().unwrap().insert(url.to_string());
    }

    pub fn fail_status_lookups(&self, err: RequestError) {
        *self.status_error.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn save_requests(&self) -> Vec<SaveRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::SaveChat(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl ApiClient for ScriptedApi {
    async fn list_collections(&self) -> Result<Vec<String>, RequestError> {
        self.record(ApiCall::ListCollections);
        self.collections.lock().unwrap().clone()
    }

    async fn list_chats(&self, collection: &str) -> Result<Vec<ChatSummary>, RequestError> {
        self.record(ApiCall::ListChats(collection.to_string()));
        Ok(self
            .chats
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_chat(&self, request: &SaveRequest) -> Result<SaveAck, RequestError> {
        self.record(ApiCall::SaveChat(request.clone()));
        self.save.lock().unwrap().clone()
    }

    async fn ai_search(&self, query: &SearchQuery) -> Result<SearchResult, RequestError> {
        self.record(ApiCall::AiSearch(query.clone()));
        self.search.lock().unwrap().clone()
    }

    async fn chat_status(&self, url: &str) -> Result<ChatStatus, RequestError> {
        self.record(ApiCall::ChatStatus(url.to_string()));
        if let Some(err) = self.status_error.lock().unwrap().clone() {
            return Err(err);
        }
        let exists = self.stored.lock().unwrap().contains(url);
        Ok(ChatStatus {
            exists,
            id: exists.then_some(1),
            title: None,
        })
    }
}

/// Prompter answering every question with the same canned reply.
pub struct ScriptedPrompter {
    answer: Option<String>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn answering(answer: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.map(ToOwned::to_owned),
            asked: Mutex::new(Vec::new()),
        })
    }

    /// Defaults offered so far, one per prompt.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, _message: &str, default: &str) -> Option<String> {
        self.asked.lock().unwrap().push(default.to_string());
        self.answer.clone()
    }
}

#[derive(Default)]
pub struct RecordingRenderer {
    views: Mutex<Vec<PopupViewModel>>,
}

impl RecordingRenderer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn last(&self) -> Option<PopupViewModel> {
        self.views.lock().unwrap().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.views.lock().unwrap().len()
    }
}

impl PopupRenderer for RecordingRenderer {
    fn render(&self, view: &PopupViewModel) {
        self.views.lock().unwrap().push(view.clone());
    }
}
