//! Chat hub core: pure state machines and view-model helpers for the capture
//! pipeline and the popup.
mod control;
mod effect;
mod error;
mod markdown;
mod msg;
mod save_flow;
mod state;
mod types;
mod update;
mod view_model;

pub use control::{ControlState, ControlVisual};
pub use effect::PopupEffect;
pub use error::{RequestError, RequestFailure, SaveFailure};
pub use markdown::{escape_html, render_bold_spans};
pub use msg::PopupMsg;
pub use save_flow::{SaveEffect, SaveFlow, SaveMsg, SaveStage};
pub use state::{
    Panel, PopupState, PopupView, LOADING_CHATS, LOADING_COLLECTIONS, NO_CHATS, NO_COLLECTIONS,
    SEARCHING,
};
pub use types::{
    ChatStatus, ChatSummary, ChatTranscript, ControlId, ConversationItem, Message, Role, SaveAck, SaveRequest,
    SearchQuery, SearchResult, SourceLink, DEFAULT_COLLECTION, MIN_QUERY_CHARS, UNTITLED_CHAT,
};
pub use update::update;
pub use view_model::{AnswerView, LinkView, PopupBody, PopupViewModel};
