//! Composer I/O
//!
//! Reads the user's draft and page selection, and writes generated replies
//! back into whatever composer the page currently shows.

use crate::adapters::SiteAdapter;
use crate::dom::{Document, Element};
use crate::models::UiState;
use crate::utils::{splice_utf16, utf16_len};

/// Tags accepted as a composer when they hold focus.
const EDITABLE_TAGS: &[&str] = &["TEXTAREA", "INPUT", "DIV"];
const PLAIN_INPUT_FALLBACKS: &[&str] = &["textarea", "input[type=\"text\"]"];
const EDITABLE_FALLBACK: &str = "[contenteditable=\"true\"]";

pub struct ComposerIo<'a, D: Document> {
    document: &'a D,
    adapter: Option<&'a dyn SiteAdapter<D>>,
}

impl<'a, D: Document> ComposerIo<'a, D> {
    pub fn new(document: &'a D, adapter: Option<&'a dyn SiteAdapter<D>>) -> Self {
        Self { document, adapter }
    }

    /// The adapter's composer, or the generic fallback chain when the
    /// adapter has none (or there is no adapter).
    pub fn composer(&self) -> Option<D::Element> {
        self.adapter
            .and_then(|adapter| adapter.composer())
            .or_else(|| generic_composer(self.document))
    }

    pub fn read_draft_and_selection(&self) -> UiState {
        let current_draft = self.composer().and_then(|composer| match composer.value() {
            Some(value) => Some(value).filter(|v| !v.is_empty()),
            None if composer.is_content_editable() => {
                Some(composer.text_content().trim().to_string()).filter(|t| !t.is_empty())
            }
            None => None,
        });

        let selection_text = self
            .document
            .selection_text()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        UiState {
            current_draft,
            selection_text,
        }
    }

    /// Insert `text` at the caret. Returns `false` when there is nowhere to
    /// write.
    pub fn insert_text(&self, text: &str) -> bool {
        let Some(composer) = self.composer() else {
            log::debug!("no composer to insert into");
            return false;
        };

        if let Some(value) = composer.value() {
            let end_of_value = utf16_len(&value);
            let (start, end) = composer
                .selection_range()
                .unwrap_or((end_of_value, end_of_value));
            composer.set_value(&splice_utf16(&value, start, end, text));
            composer.dispatch_input_event();
            return true;
        }

        if composer.is_content_editable() {
            composer.focus();
            let inserted = self.document.insert_text_command(text);
            if !inserted {
                log::warn!("page rejected insertText into the composer");
            }
            return inserted;
        }

        false
    }
}

/// Focused editable element, then the first plain input, then the first
/// content-editable region.
pub fn generic_composer<D: Document>(document: &D) -> Option<D::Element> {
    let focused = document.active_element().filter(|active| {
        active.is_content_editable() || EDITABLE_TAGS.contains(&active.tag_name().to_uppercase().as_str())
    });
    if focused.is_some() {
        return focused;
    }

    PLAIN_INPUT_FALLBACKS
        .iter()
        .find_map(|selector| document.query_selector(selector))
        .or_else(|| document.query_selector(EDITABLE_FALLBACK))
}
