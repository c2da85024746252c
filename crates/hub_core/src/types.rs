use serde::{Deserialize, Deserializer, Serialize};

/// Collection suggested when the user is asked where to file a chat.
pub const DEFAULT_COLLECTION: &str = "Uncategorized";
/// Label used wherever a chat has no usable title.
pub const UNTITLED_CHAT: &str = "Untitled Chat";
/// Shortest query (in characters, after trimming) that is sent to the backend.
pub const MIN_QUERY_CHARS: usize = 3;

/// Handle of an injected save control, unique within one page session.
pub type ControlId = u64;

/// One entry of the host page's conversation list.
///
/// The host page offers no stable id, so identity is the rendered link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationItem {
    pub href: String,
    pub label: String,
}

impl ConversationItem {
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
        }
    }

    /// Title reported to the backend as `sidebarTitle`.
    pub fn sidebar_title(&self) -> String {
        let label = self.label.trim();
        if label.is_empty() {
            UNTITLED_CHAT.to_string()
        } else {
            label.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ordered, role-tagged transcript of one conversation. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTranscript {
    pub title: String,
    pub url: String,
    pub messages: Vec<Message>,
}

impl ChatTranscript {
    /// Builds a transcript, or `None` when there is nothing to capture.
    pub fn new(title: impl Into<String>, url: impl Into<String>, messages: Vec<Message>) -> Option<Self> {
        if messages.is_empty() {
            return None;
        }
        Some(Self {
            title: title.into(),
            url: url.into(),
            messages,
        })
    }
}

/// Body of `POST /api/save_chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    #[serde(flatten)]
    pub transcript: ChatTranscript,
    pub collection: String,
    #[serde(rename = "sidebarTitle")]
    pub sidebar_title: String,
}

/// Acknowledgement returned by `save_chat`. All fields are optional because
/// any JSON object counts as success.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaveAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub database_id: Option<i64>,
}

impl SaveAck {
    /// The backend deduplicates by URL and answers `status: "info"` for repeats.
    pub fn already_saved(&self) -> bool {
        self.status.as_deref() == Some("info")
    }
}

/// Answer of `GET /api/chat_status`: whether the backend already holds a URL.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatStatus {
    pub exists: bool,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

impl ChatSummary {
    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            UNTITLED_CHAT
        } else {
            title
        }
    }
}

/// Body of `POST /api/ai_search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub collection_filter: Option<String>,
}

impl SearchQuery {
    /// Returns `None` when the trimmed query is shorter than [`MIN_QUERY_CHARS`].
    pub fn new(query: &str, collection_filter: Option<String>) -> Option<Self> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return None;
        }
        Some(Self {
            query: query.to_string(),
            collection_filter,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub answer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<SourceLink>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
