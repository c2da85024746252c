use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use hub_core::{ControlId, ControlVisual, ConversationItem};
use hub_logging::{hub_debug, hub_warn};
use scraper::{Html, Selector};
use url::Url;

use crate::lock;
use crate::page::{ClickHandler, MutationCallback, PageObserverPort, RenderedMessage};
use crate::settings::PageSelectors;
use crate::text::inner_text;

/// Invoked with the resolved URL when a conversation is activated.
pub type NavigationHandler = Arc<dyn Fn(&str) + Send + Sync>;

struct AttachedControl {
    id: ControlId,
    on_click: ClickHandler,
    visual: Option<ControlVisual>,
}

#[derive(Default)]
struct PageModel {
    url: String,
    html: String,
    observers: Vec<MutationCallback>,
    // Keyed by item href; presence is the injection marker.
    controls: HashMap<String, AttachedControl>,
    navigation: Option<NavigationHandler>,
}

/// Page backed by an HTML snapshot that the host replaces as the real page
/// re-renders.
///
/// Snapshots are parsed on demand so the page stays `Send + Sync`.
pub struct DocumentPage {
    selectors: PageSelectors,
    model: Mutex<PageModel>,
}

impl DocumentPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>, selectors: PageSelectors) -> Self {
        Self {
            selectors,
            model: Mutex::new(PageModel {
                url: url.into(),
                html: html.into(),
                ..PageModel::default()
            }),
        }
    }

    /// Replaces the rendered document and notifies observers.
    pub fn set_html(&self, html: impl Into<String>) {
        let observers = {
            let mut model = lock(&self.model);
            model.html = html.into();
            model.observers.clone()
        };
        for observer in observers {
            observer();
        }
    }

    pub fn set_url(&self, url: impl Into<String>) {
        lock(&self.model).url = url.into();
    }

    pub fn on_navigate(&self, handler: NavigationHandler) {
        lock(&self.model).navigation = Some(handler);
    }

    /// Delivers a user click to the control; returns `false` for unknown ids.
    pub fn click(&self, control_id: ControlId) -> bool {
        let handler = lock(&self.model)
            .controls
            .values()
            .find(|control| control.id == control_id)
            .map(|control| Arc::clone(&control.on_click));
        match handler {
            Some(on_click) => {
                on_click();
                true
            }
            None => false,
        }
    }

    pub fn control_for(&self, item: &ConversationItem) -> Option<ControlId> {
        lock(&self.model).controls.get(&item.href).map(|control| control.id)
    }

    pub fn control_visual(&self, control_id: ControlId) -> Option<ControlVisual> {
        lock(&self.model)
            .controls
            .values()
            .find(|control| control.id == control_id)
            .and_then(|control| control.visual)
    }

    pub fn control_count(&self) -> usize {
        lock(&self.model).controls.len()
    }

    fn snapshot(&self) -> String {
        lock(&self.model).html.clone()
    }

    fn selector(&self, raw: &str) -> Option<Selector> {
        match Selector::parse(raw) {
            Ok(selector) => Some(selector),
            Err(err) => {
                hub_warn!("Invalid page selector {:?}: {:?}", raw, err);
                None
            }
        }
    }
}

impl PageObserverPort for DocumentPage {
    fn observe(&self, callback: MutationCallback) {
        lock(&self.model).observers.push(callback);
    }

    fn find_candidates(&self) -> Vec<ConversationItem> {
        let (Some(item_sel), Some(label_sel), Some(link_sel)) = (
            self.selector(&self.selectors.conversation_item),
            self.selector(&self.selectors.item_label),
            self.selector(&self.selectors.item_link),
        ) else {
            return Vec::new();
        };

        let doc = Html::parse_document(&self.snapshot());
        let mut items = Vec::new();
        for element in doc.select(&item_sel) {
            let href = element
                .value()
                .attr("href")
                .or_else(|| {
                    element
                        .select(&link_sel)
                        .next()
                        .and_then(|link| link.value().attr("href"))
                })
                .map(str::trim)
                .filter(|href| !href.is_empty());
            let Some(href) = href else {
                hub_debug!("Skipping conversation item without a link");
                continue;
            };
            let label = element
                .select(&label_sel)
                .next()
                .map(inner_text)
                .unwrap_or_else(|| inner_text(element));
            items.push(ConversationItem::new(href, label));
        }
        items
    }

    fn find_messages(&self) -> Vec<RenderedMessage> {
        let Some(message_sel) = self.selector(&self.selectors.message) else {
            return Vec::new();
        };
        let doc = Html::parse_document(&self.snapshot());
        let messages = doc
            .select(&message_sel)
            .map(|element| RenderedMessage {
                tag: element.value().name().to_ascii_lowercase(),
                text: inner_text(element),
                html: element.inner_html(),
            })
            .collect();
        messages
    }

    fn activate(&self, item: &ConversationItem) {
        let (target, navigation) = {
            let mut model = lock(&self.model);
            let target = resolve_href(&model.url, &item.href);
            model.url = target.clone();
            (target, model.navigation.clone())
        };
        hub_debug!("Activating conversation {}", target);
        if let Some(navigate) = navigation {
            navigate(&target);
        }
    }

    fn has_control(&self, item: &ConversationItem) -> bool {
        lock(&self.model).controls.contains_key(&item.href)
    }

    fn attach_control(&self, item: &ConversationItem, control_id: ControlId, on_click: ClickHandler) {
        lock(&self.model)
            .controls
            .entry(item.href.clone())
            .or_insert(AttachedControl {
                id: control_id,
                on_click,
                visual: None,
            });
    }

    fn render_control(&self, control_id: ControlId, visual: ControlVisual) {
        let mut model = lock(&self.model);
        // The control may be gone if the host re-rendered; nothing to draw then.
        if let Some(control) = model.controls.values_mut().find(|c| c.id == control_id) {
            control.visual = Some(visual);
        }
    }

    fn current_url(&self) -> String {
        lock(&self.model).url.clone()
    }

    fn item_url(&self, item: &ConversationItem) -> String {
        resolve_href(&lock(&self.model).url, &item.href)
    }

    fn page_title(&self) -> String {
        let Some(title_sel) = self.selector(&self.selectors.page_title) else {
            return String::new();
        };
        let doc = Html::parse_document(&self.snapshot());
        let title = doc
            .select(&title_sel)
            .next()
            .map(|title| title.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        title
    }
}

fn resolve_href(current: &str, href: &str) -> String {
    if let Ok(url) = Url::parse(href) {
        return url.into();
    }
    Url::parse(current)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}
