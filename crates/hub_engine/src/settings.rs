use std::time::Duration;

use hub_core::DEFAULT_COLLECTION;

/// Local backend every request goes to unless overridden in code.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    /// `None` leaves requests unbounded, matching the extension's fetch calls.
    pub request_timeout: Option<Duration>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    /// Quiet period after the last page mutation before a rescan.
    pub debounce_quiet: Duration,
    /// Time the activated conversation gets to render before scraping.
    pub settle_delay: Duration,
    /// Suggestion offered by the collection prompt.
    pub default_collection: String,
    /// Ask the backend whether each newly injected item is already stored.
    pub check_saved_on_inject: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            debounce_quiet: Duration::from_millis(500),
            settle_delay: Duration::from_millis(1000),
            default_collection: DEFAULT_COLLECTION.to_string(),
            check_saved_on_inject: true,
        }
    }
}

/// CSS selectors describing the host page's structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelectors {
    pub conversation_item: String,
    pub item_label: String,
    pub item_link: String,
    pub message: String,
    pub page_title: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            conversation_item: r#"[data-test-id="conversation"]"#.to_string(),
            item_label: ".conversation-title".to_string(),
            item_link: "a[href]".to_string(),
            message: "user-query, model-response".to_string(),
            page_title: "title".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentFormat {
    /// Rendered text, like the page's `innerText`.
    #[default]
    PlainText,
    /// Inner HTML converted to markdown.
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSettings {
    pub user_tags: Vec<String>,
    pub model_tags: Vec<String>,
    pub format: ContentFormat,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            user_tags: vec!["user-query".to_string()],
            model_tags: vec!["model-response".to_string()],
            format: ContentFormat::PlainText,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubSettings {
    pub api: ApiSettings,
    pub capture: CaptureSettings,
    pub selectors: PageSelectors,
    pub scrape: ScrapeSettings,
}
