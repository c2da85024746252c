use crate::markdown::render_bold_spans;
use crate::view_model::{AnswerView, LinkView, PopupBody, PopupViewModel};
use crate::{ChatSummary, RequestError, RequestFailure, SearchQuery, SearchResult};

pub const LOADING_COLLECTIONS: &str = "Loading collections...";
pub const LOADING_CHATS: &str = "Loading chats...";
pub const SEARCHING: &str = "Searching your saved chats...";
pub const NO_COLLECTIONS: &str = "No collections yet. Save a chat to get started.";
pub const NO_CHATS: &str = "No chats in this collection.";

/// Which panel the popup currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PopupView {
    #[default]
    Collections,
    Chats {
        collection: String,
    },
    Search {
        query: SearchQuery,
    },
}

/// Load status of one panel's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Panel::Loading
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PopupState {
    view: PopupView,
    active_collection: Option<String>,
    search_input: String,
    collections: Panel<Vec<String>>,
    chats: Panel<Vec<ChatSummary>>,
    search: Panel<SearchResult>,
    dirty: bool,
}

impl PopupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_view(&self) -> &PopupView {
        &self.view
    }

    pub fn active_collection(&self) -> Option<&str> {
        self.active_collection.as_deref()
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn view(&self) -> PopupViewModel {
        let body = match &self.view {
            PopupView::Collections => match &self.collections {
                Panel::Loading => PopupBody::Loading(LOADING_COLLECTIONS.to_string()),
                Panel::Failed(message) => PopupBody::Error(message.clone()),
                Panel::Ready(names) if names.is_empty() => {
                    PopupBody::Empty(NO_COLLECTIONS.to_string())
                }
                Panel::Ready(names) => PopupBody::Tags(names.clone()),
            },
            PopupView::Chats { .. } => match &self.chats {
                Panel::Loading => PopupBody::Loading(LOADING_CHATS.to_string()),
                Panel::Failed(message) => PopupBody::Error(message.clone()),
                Panel::Ready(chats) if chats.is_empty() => PopupBody::Empty(NO_CHATS.to_string()),
                Panel::Ready(chats) => PopupBody::Links(
                    chats
                        .iter()
                        .map(|chat| LinkView {
                            label: chat.display_title().to_string(),
                            url: chat.url.clone(),
                        })
                        .collect(),
                ),
            },
            PopupView::Search { query } => match &self.search {
                Panel::Loading => PopupBody::Loading(SEARCHING.to_string()),
                Panel::Failed(message) => PopupBody::Error(message.clone()),
                Panel::Ready(result) => PopupBody::Answer(AnswerView {
                    badge: query.collection_filter.clone(),
                    html: render_bold_spans(&result.answer),
                    sources: result
                        .sources
                        .iter()
                        .map(|source| LinkView {
                            label: if source.title.trim().is_empty() {
                                source.url.clone()
                            } else {
                                source.title.clone()
                            },
                            url: source.url.clone(),
                        })
                        .collect(),
                }),
            },
        };

        PopupViewModel {
            header: self.active_collection.clone(),
            show_back: !matches!(self.view, PopupView::Collections),
            search_text: self.search_input.clone(),
            body,
        }
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_collections_load(&mut self) {
        self.collections = Panel::Loading;
        self.mark_dirty();
    }

    pub(crate) fn apply_collections(&mut self, result: Result<Vec<String>, RequestError>) {
        self.collections = match result {
            Ok(names) => Panel::Ready(names),
            Err(err) => Panel::Failed(format!("Could not load collections: {err}")),
        };
        self.mark_dirty();
    }

    pub(crate) fn show_collections(&mut self) {
        self.view = PopupView::Collections;
        self.active_collection = None;
        self.search = Panel::Loading;
        self.mark_dirty();
    }

    pub(crate) fn show_chats(&mut self, collection: String) {
        self.active_collection = Some(collection.clone());
        self.view = PopupView::Chats { collection };
        self.chats = Panel::Loading;
        self.mark_dirty();
    }

    /// Applies a chat listing unless the user has already left that collection.
    pub(crate) fn apply_chats(
        &mut self,
        collection: &str,
        result: Result<Vec<ChatSummary>, RequestError>,
    ) -> bool {
        match &self.view {
            PopupView::Chats { collection: shown } if shown == collection => {}
            _ => return false,
        }
        self.chats = match result {
            Ok(chats) => Panel::Ready(chats),
            Err(err) => Panel::Failed(format!("Could not load chats: {err}")),
        };
        self.mark_dirty();
        true
    }

    pub(crate) fn set_search_input(&mut self, text: String) {
        if self.search_input != text {
            self.search_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn clear_search_input(&mut self) {
        self.set_search_input(String::new());
    }

    pub(crate) fn show_search(&mut self, query: SearchQuery) {
        self.view = PopupView::Search { query };
        self.search = Panel::Loading;
        self.mark_dirty();
    }

    /// Applies a search result unless a different search (or view) replaced it.
    pub(crate) fn apply_search(
        &mut self,
        query: &SearchQuery,
        result: Result<SearchResult, RequestError>,
    ) -> bool {
        match &self.view {
            PopupView::Search { query: shown } if shown == query => {}
            _ => return false,
        }
        self.search = match result {
            Ok(result) => Panel::Ready(result),
            Err(err) => Panel::Failed(match err.kind {
                RequestFailure::HttpStatus(code) => format!("Search failed (status {code})."),
                _ => format!("Search failed: {}", err.message),
            }),
        };
        self.mark_dirty();
        true
    }
}
