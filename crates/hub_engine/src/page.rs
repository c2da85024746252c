use std::sync::Arc;

use hub_core::{ControlId, ControlVisual, ConversationItem};

/// Called after every structural change of the observed page.
pub type MutationCallback = Arc<dyn Fn() + Send + Sync>;
/// Called when the user clicks an injected control.
pub type ClickHandler = Arc<dyn Fn() + Send + Sync>;

/// One rendered message element, before role classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Structural tag of the element, e.g. `user-query`.
    pub tag: String,
    pub text: String,
    pub html: String,
}

impl RenderedMessage {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            tag: tag.into(),
            html: text.clone(),
            text,
        }
    }
}

/// The externally mutated host page.
///
/// Everything the capture pipeline reads from or writes to the page goes
/// through this port, so the pipeline runs against [`crate::DocumentPage`] or
/// a test fake alike.
pub trait PageObserverPort: Send + Sync {
    /// Subscribes to structural-change notifications.
    fn observe(&self, callback: MutationCallback);

    /// Conversation list entries currently rendered.
    fn find_candidates(&self) -> Vec<ConversationItem>;

    /// Message elements of the currently open conversation, in document order.
    fn find_messages(&self) -> Vec<RenderedMessage>;

    /// Opens the conversation, as following its link would.
    fn activate(&self, item: &ConversationItem);

    /// Marker check: whether a control is already attached to `item`.
    fn has_control(&self, item: &ConversationItem) -> bool;

    fn attach_control(&self, item: &ConversationItem, control_id: ControlId, on_click: ClickHandler);

    /// Re-renders a control. Unknown ids are ignored.
    fn render_control(&self, control_id: ControlId, visual: ControlVisual);

    fn current_url(&self) -> String;

    /// Absolute URL the item's link leads to.
    fn item_url(&self, item: &ConversationItem) -> String;

    fn page_title(&self) -> String;
}
