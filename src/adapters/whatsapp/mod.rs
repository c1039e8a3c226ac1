//! WhatsApp Web adapter

#[cfg(test)]
pub(crate) mod fixtures;
pub mod metadata;

use super::{ContextOptions, MountPositionHint, SiteAdapter};
use crate::dom::{Document, Element};
use crate::models::{Attachment, AuthorKind, Message, MessageContext, PlatformId, SELF_NAME};
use crate::timers::Scheduler;
use crate::utils::contact_key;
use crate::watcher::{ConversationSnapshot, ConversationWatcher, PollingWatcher, DEFAULT_POLL_INTERVAL_MS};
use metadata::parse_pre_plain;
use std::rc::Rc;

pub const HOST: &str = "web.whatsapp.com";

const MAIN_PANEL: &str = "#main";
const MESSAGE_LIST: &str = "div[data-scrolltracepolicy=\"wa.web.conversation.messages\"]";
const BUBBLES: &str = "div[role=\"row\"] div.message-in, div[role=\"row\"] div.message-out";
const OUTGOING_CLASS: &str = "message-out";
const COPYABLE: &str = "div.copyable-text";
const PRE_PLAIN_ATTR: &str = "data-pre-plain-text";
const TEXT_NODE: &str = "span._ao3e.selectable-text.copyable-text > span";
const TEXT_NODE_FALLBACK: &str = "span.selectable-text";
const IMAGE: &str = "img";
const COMPOSER: &str = "footer div[contenteditable=\"true\"][data-tab]";
const HEADER: &str = "header";
const TITLE_CANDIDATES: &str = "span";

/// Author name for incoming messages when neither the sender nor the
/// conversation title is known.
const FALLBACK_AUTHOR: &str = "Them";

pub const MAX_TITLE_CHARS: usize = 100;

/// Header strings that describe UI state rather than a conversation.
const TITLE_NOISE_EXACT: &[&str] = &["online", "typing…", "typing...", "whatsapp"];
const TITLE_NOISE_CONTAINS: &[&str] = &[
    "click here for",
    "tap here for",
    "last seen",
    "is typing",
    "loading",
    "end-to-end encrypted",
];

/// True when `candidate` can be used as a conversation title.
pub fn is_plausible_title(candidate: &str) -> bool {
    let len = candidate.chars().count();
    if len == 0 || len > MAX_TITLE_CHARS {
        return false;
    }
    let lower = candidate.to_lowercase();
    !TITLE_NOISE_EXACT.contains(&lower.as_str())
        && !TITLE_NOISE_CONTAINS.iter().any(|noise| lower.contains(noise))
}

fn title_in_panel<E: Element>(main: &E) -> Option<String> {
    let header = main.query_selector(HEADER)?;
    header
        .query_selector_all(TITLE_CANDIDATES)
        .into_iter()
        .map(|span| span.text_content().trim().to_string())
        .find(|text| is_plausible_title(text))
}

fn conversation_title<D: Document>(document: &D) -> Option<String> {
    title_in_panel(&document.query_selector(MAIN_PANEL)?)
}

fn conversation_key<D: Document>(document: &D) -> String {
    if document.query_selector(MAIN_PANEL).is_none() {
        return String::new();
    }
    contact_key(PlatformId::Whatsapp, conversation_title(document).as_deref())
}

/// Closest `data-id` between the bubble and its row.
fn message_id<E: Element>(bubble: &E) -> Option<String> {
    let mut current = Some(bubble.clone());
    while let Some(node) = current {
        if let Some(id) = node.attribute("data-id") {
            return Some(id);
        }
        if node.attribute("role").as_deref() == Some("row") {
            return None;
        }
        current = node.parent();
    }
    None
}

fn read_bubble<E: Element>(bubble: &E, title: Option<&str>) -> Message {
    let outgoing = bubble.has_class(OUTGOING_CLASS);
    let raw_pre = bubble
        .query_selector(COPYABLE)
        .and_then(|c| c.attribute(PRE_PLAIN_ATTR));
    let meta = parse_pre_plain(raw_pre.as_deref());

    let text = bubble
        .query_selector(TEXT_NODE)
        .or_else(|| bubble.query_selector(TEXT_NODE_FALLBACK))
        .map(|node| node.text_content().trim().to_string())
        .unwrap_or_default();

    let (kind, author) = if outgoing {
        (AuthorKind::SelfAuthor, SELF_NAME.to_string())
    } else {
        let author = meta
            .sender
            .clone()
            .or_else(|| title.filter(|t| !t.is_empty()).map(str::to_string))
            .unwrap_or_else(|| FALLBACK_AUTHOR.to_string());
        (AuthorKind::Other, author)
    };

    let attachments = bubble
        .query_selector(IMAGE)
        .and_then(|img| {
            let src = img.attribute("src")?;
            Some(Attachment::image(src).with_alt_text(img.attribute("alt").unwrap_or_default()))
        })
        .into_iter()
        .collect();

    let mut message = Message::new(kind, text)
        .with_author(author)
        .with_timestamp(meta.timestamp)
        .with_attachments(attachments)
        .with_raw(serde_json::json!({ "pre": raw_pre }));
    message.id = message_id(bubble);
    message
}

pub struct WhatsAppAdapter<D: Document> {
    document: D,
    watcher: PollingWatcher,
}

impl<D: Document + Clone + 'static> WhatsAppAdapter<D> {
    pub fn new(document: D, scheduler: Rc<dyn Scheduler>) -> Self {
        Self::with_poll_interval(document, scheduler, DEFAULT_POLL_INTERVAL_MS)
    }

    pub fn with_poll_interval(document: D, scheduler: Rc<dyn Scheduler>, interval_ms: u32) -> Self {
        let probe_document = document.clone();
        let probe = Rc::new(move || ConversationSnapshot {
            contact_key: conversation_key(&probe_document),
            title: conversation_title(&probe_document),
        });
        Self {
            document,
            watcher: PollingWatcher::new(scheduler, interval_ms, probe),
        }
    }
}

impl<D: Document> SiteAdapter<D> for WhatsAppAdapter<D> {
    fn id(&self) -> PlatformId {
        PlatformId::Whatsapp
    }

    fn matches(&self, url: &str) -> bool {
        url.contains(HOST)
    }

    fn composer(&self) -> Option<D::Element> {
        self.document.query_selector(MAIN_PANEL)?.query_selector(COMPOSER)
    }

    fn contact_key(&self) -> String {
        conversation_key(&self.document)
    }

    fn conversation_title(&self) -> Option<String> {
        conversation_title(&self.document)
    }

    fn context(&self, options: ContextOptions) -> Option<MessageContext> {
        let main = self.document.query_selector(MAIN_PANEL)?;
        let list = main.query_selector(MESSAGE_LIST)?;

        let bubbles = list.query_selector_all(BUBBLES);
        let skip = bubbles.len().saturating_sub(options.limit);
        let title = title_in_panel(&main);

        let messages = bubbles[skip..]
            .iter()
            .map(|bubble| read_bubble(bubble, title.as_deref()))
            .collect();
        Some(MessageContext::from_messages(messages))
    }

    /// The composer is content-editable; the widget goes on its wrapper so
    /// it never becomes part of the draft.
    fn mount_position_hint(&self, composer: &D::Element) -> Option<MountPositionHint<D::Element>> {
        let wrapper = composer.parent()?;
        let style_overrides = [
            ("position", "absolute"),
            ("right", "8px"),
            ("top", "50%"),
            ("transform", "translateY(-50%)"),
            ("z-index", "9999"),
            ("pointer-events", "auto"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Some(MountPositionHint {
            mount_target: wrapper,
            style_overrides,
        })
    }

    fn conversation_watcher(&self) -> Option<&dyn ConversationWatcher> {
        Some(&self.watcher)
    }
}
