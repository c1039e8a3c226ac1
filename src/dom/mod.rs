//! Host page abstraction
//!
//! Adapters, the mount controller and composer I/O only talk to the page
//! through these traits. `web` implements them over `web-sys`; `memory` is
//! a self-contained document used by tests and offline tooling.

pub mod memory;
pub mod selector;

use std::fmt::Debug;

/// A live element handle. Equality is node identity.
pub trait Element: Clone + PartialEq + Debug {
    /// First descendant matching `selector`, in document order.
    fn query_selector(&self, selector: &str) -> Option<Self>;
    /// All descendants matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Self>;

    fn tag_name(&self) -> String;
    fn text_content(&self) -> String;
    fn attribute(&self, name: &str) -> Option<String>;
    fn has_class(&self, class: &str) -> bool;
    fn set_class_name(&self, class: &str);

    fn parent(&self) -> Option<Self>;
    /// True when `other` is this element or one of its descendants.
    fn contains(&self, other: &Self) -> bool;
    fn append_child(&self, child: &Self);
    /// Detach from the parent. No-op when already detached.
    fn remove(&self);

    fn set_style(&self, property: &str, value: &str);
    /// Computed CSS `position`.
    fn computed_position(&self) -> String;

    /// Current value for plain-value inputs (`<input>`, `<textarea>`),
    /// `None` for everything else.
    fn value(&self) -> Option<String>;
    fn set_value(&self, value: &str);
    /// Selection range in UTF-16 code units, when the element exposes one.
    fn selection_range(&self) -> Option<(usize, usize)>;
    fn is_content_editable(&self) -> bool;
    fn focus(&self);
    /// Fire a bubbling `input` event so the page's own bindings see a change.
    fn dispatch_input_event(&self);
}

pub trait Document {
    type Element: Element;

    fn query_selector(&self, selector: &str) -> Option<Self::Element>;
    fn create_element(&self, tag: &str) -> Option<Self::Element>;
    fn active_element(&self) -> Option<Self::Element>;
    /// Current page text selection, untrimmed. `None` when nothing is selected.
    fn selection_text(&self) -> Option<String>;
    fn location(&self) -> String;
    /// Rich-text insertion into the focused editable region
    /// (`document.execCommand("insertText")`). Returns whether the page
    /// accepted the command.
    fn insert_text_command(&self, text: &str) -> bool;
}
