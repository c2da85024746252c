use hub_core::{ChatTranscript, Message, Role, UNTITLED_CHAT};
use hub_logging::hub_debug;

use crate::page::{PageObserverPort, RenderedMessage};
use crate::settings::{ContentFormat, ScrapeSettings};

/// Extracts the transcript of the currently rendered conversation.
#[derive(Debug, Clone, Default)]
pub struct TranscriptScraper {
    settings: ScrapeSettings,
}

impl TranscriptScraper {
    pub fn new(settings: ScrapeSettings) -> Self {
        Self { settings }
    }

    /// Returns `None` when the page shows no classifiable, non-empty message.
    /// Reads only what is already rendered; never waits.
    pub fn scrape_current(&self, page: &dyn PageObserverPort) -> Option<ChatTranscript> {
        let rendered = page.find_messages();
        let total = rendered.len();
        let messages: Vec<Message> = rendered
            .iter()
            .filter_map(|element| self.to_message(element))
            .collect();
        hub_debug!(
            "Scraped {} of {} message elements",
            messages.len(),
            total
        );

        let title = page.page_title();
        let title = match title.trim() {
            "" => UNTITLED_CHAT.to_string(),
            trimmed => trimmed.to_string(),
        };
        ChatTranscript::new(title, page.current_url(), messages)
    }

    fn classify(&self, tag: &str) -> Option<Role> {
        let matches = |tags: &[String]| tags.iter().any(|t| t.eq_ignore_ascii_case(tag));
        if matches(&self.settings.user_tags) {
            Some(Role::User)
        } else if matches(&self.settings.model_tags) {
            Some(Role::Model)
        } else {
            None
        }
    }

    fn to_message(&self, element: &RenderedMessage) -> Option<Message> {
        let role = self.classify(&element.tag)?;
        let content = match self.settings.format {
            ContentFormat::PlainText => element.text.trim().to_string(),
            ContentFormat::Markdown => html2md::parse_html(&element.html).trim().to_string(),
        };
        if content.is_empty() {
            return None;
        }
        Some(Message::new(role, content))
    }
}
