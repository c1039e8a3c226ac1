//! Site adapters
//!
//! An adapter normalizes one messaging site's DOM into the shared
//! conversation model and tells the mount controller where its composer is.
//! Each platform is an independent implementation of [`SiteAdapter`];
//! [`AdapterRegistry`] picks one by URL at startup.

pub mod whatsapp;

use crate::dom::Document;
use crate::models::{MessageContext, PlatformId};
use crate::watcher::ConversationWatcher;
use std::rc::Rc;

pub use whatsapp::WhatsAppAdapter;

/// Messages included in a context when the caller does not say otherwise.
pub const DEFAULT_CONTEXT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    /// Keep only the most recent `limit` messages.
    pub limit: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_CONTEXT_LIMIT,
        }
    }
}

impl ContextOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }
}

/// Where and how to attach the injected widget when the composer itself is
/// the wrong parent.
#[derive(Debug, Clone, PartialEq)]
pub struct MountPositionHint<E> {
    pub mount_target: E,
    /// Inline styles for the widget container, replacing the defaults.
    pub style_overrides: Vec<(String, String)>,
}

pub trait SiteAdapter<D: Document> {
    fn id(&self) -> PlatformId;

    /// Cheap URL test. Must not touch the DOM.
    fn matches(&self, url: &str) -> bool;

    /// The writable input region, queried live on every call.
    fn composer(&self) -> Option<D::Element>;

    /// `platform|title` key of the open conversation, or an empty string
    /// when no conversation is open.
    fn contact_key(&self) -> String;

    fn conversation_title(&self) -> Option<String>;

    /// `None` while the conversation container is not in the page yet.
    fn context(&self, options: ContextOptions) -> Option<MessageContext>;

    /// Optional: a different attachment point than the composer.
    fn mount_position_hint(&self, _composer: &D::Element) -> Option<MountPositionHint<D::Element>> {
        None
    }

    /// Optional: conversation switch detection.
    fn conversation_watcher(&self) -> Option<&dyn ConversationWatcher> {
        None
    }
}

/// Ordered adapter list; the first match wins.
pub struct AdapterRegistry<D: Document> {
    adapters: Vec<Rc<dyn SiteAdapter<D>>>,
}

impl<D: Document> AdapterRegistry<D> {
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Append an adapter. Duplicates are not filtered; register each
    /// platform once at startup.
    pub fn register(&mut self, adapter: Rc<dyn SiteAdapter<D>>) {
        self.adapters.push(adapter);
    }

    pub fn detect(&self, url: &str) -> Option<Rc<dyn SiteAdapter<D>>> {
        self.adapters.iter().find(|a| a.matches(url)).cloned()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl<D: Document> Default for AdapterRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}
