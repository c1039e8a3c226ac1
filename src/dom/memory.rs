//! In-memory document
//!
//! A small mutable element tree implementing [`Document`] and [`Element`]
//! with the selector subset from [`super::selector`]. Elements are shared
//! handles: cloning a `MemoryElement` yields another handle to the same node.

use super::selector::{SelectorList, Subject};
use super::{Document, Element};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Default)]
struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<MemoryElement>,
    parent: Weak<RefCell<NodeData>>,
    style: BTreeMap<String, String>,
    value: Option<String>,
    selection: Option<(usize, usize)>,
    input_events: usize,
    focused: bool,
}

#[derive(Clone)]
pub struct MemoryElement(Rc<RefCell<NodeData>>);

impl MemoryElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        })))
    }

    /// A `<textarea>` carrying a plain value.
    pub fn textarea(value: &str) -> Self {
        Self::new("textarea").with_value(value)
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_class(self, class: &str) -> Self {
        let merged = match self.attribute("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.with_attr("class", &merged)
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.0.borrow_mut().text = text.to_string();
        self
    }

    pub fn with_value(self, value: &str) -> Self {
        self.0.borrow_mut().value = Some(value.to_string());
        self
    }

    pub fn with_selection(self, start: usize, end: usize) -> Self {
        self.0.borrow_mut().selection = Some((start, end));
        self
    }

    pub fn with_style(self, property: &str, value: &str) -> Self {
        self.set_style(property, value);
        self
    }

    pub fn with_child(self, child: MemoryElement) -> Self {
        self.append_child(&child);
        self
    }

    pub fn with_children(self, children: impl IntoIterator<Item = MemoryElement>) -> Self {
        for child in children {
            self.append_child(&child);
        }
        self
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&self, name: &str) {
        self.0.borrow_mut().attributes.remove(name);
    }

    pub fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    pub fn set_selection(&self, start: usize, end: usize) {
        self.0.borrow_mut().selection = Some((start, end));
    }

    pub fn children(&self) -> Vec<MemoryElement> {
        self.0.borrow().children.clone()
    }

    pub fn clear_children(&self) {
        for child in self.children() {
            child.remove();
        }
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().style.get(property).cloned()
    }

    /// Number of `input` events dispatched on this element.
    pub fn input_events(&self) -> usize {
        self.0.borrow().input_events
    }

    pub fn is_focused(&self) -> bool {
        self.0.borrow().focused
    }

    fn descendants(&self) -> Vec<MemoryElement> {
        let mut out = Vec::new();
        let mut stack: Vec<MemoryElement> = self.children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.children().into_iter().rev());
            out.push(node);
        }
        out
    }

    fn select(&self, selector: &str) -> Vec<MemoryElement> {
        match SelectorList::parse(selector) {
            Ok(list) => self
                .descendants()
                .into_iter()
                .filter(|el| list.matches(el))
                .collect(),
            Err(err) => {
                log::warn!("invalid selector {selector:?}: {err}");
                Vec::new()
            }
        }
    }
}

impl PartialEq for MemoryElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        write!(f, "<{}", node.tag)?;
        for (name, value) in &node.attributes {
            write!(f, " {name}=\"{value}\"")?;
        }
        write!(f, ">")
    }
}

impl Subject for MemoryElement {
    fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn parent_subject(&self) -> Option<Self> {
        self.parent()
    }
}

impl Element for MemoryElement {
    fn query_selector(&self, selector: &str) -> Option<Self> {
        self.select(selector).into_iter().next()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Self> {
        self.select(selector)
    }

    fn tag_name(&self) -> String {
        self.0.borrow().tag.to_ascii_uppercase()
    }

    fn text_content(&self) -> String {
        let node = self.0.borrow();
        let mut text = node.text.clone();
        for child in &node.children {
            text.push_str(&child.text_content());
        }
        text
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attr(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.has_class_name(class)
    }

    fn set_class_name(&self, class: &str) {
        self.set_attribute("class", class);
    }

    fn parent(&self) -> Option<Self> {
        self.0.borrow().parent.upgrade().map(MemoryElement)
    }

    fn contains(&self, other: &Self) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node == *self {
                return true;
            }
            current = node.parent();
        }
        false
    }

    fn append_child(&self, child: &Self) {
        child.remove();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
    }

    fn remove(&self) {
        if let Some(parent) = self.parent() {
            parent.0.borrow_mut().children.retain(|c| c != self);
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    fn set_style(&self, property: &str, value: &str) {
        self.0
            .borrow_mut()
            .style
            .insert(property.to_string(), value.to_string());
    }

    fn computed_position(&self) -> String {
        self.style("position").unwrap_or_else(|| "static".to_string())
    }

    fn value(&self) -> Option<String> {
        self.0.borrow().value.clone()
    }

    fn set_value(&self, value: &str) {
        let mut node = self.0.borrow_mut();
        node.value = Some(value.to_string());
        node.selection = None;
    }

    fn selection_range(&self) -> Option<(usize, usize)> {
        self.0.borrow().selection
    }

    fn is_content_editable(&self) -> bool {
        self.attr("contenteditable").as_deref() == Some("true")
    }

    fn focus(&self) {
        self.0.borrow_mut().focused = true;
    }

    fn dispatch_input_event(&self) {
        self.0.borrow_mut().input_events += 1;
    }
}

#[derive(Default)]
struct DocumentState {
    active: Option<MemoryElement>,
    selection: Option<String>,
    url: String,
    inserted: Vec<String>,
}

/// Document handle; clones share the same tree and state.
#[derive(Clone)]
pub struct MemoryDocument {
    body: MemoryElement,
    state: Rc<RefCell<DocumentState>>,
}

impl MemoryDocument {
    pub fn new(url: &str) -> Self {
        let state = DocumentState {
            url: url.to_string(),
            ..Default::default()
        };
        Self {
            body: MemoryElement::new("body"),
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn body(&self) -> &MemoryElement {
        &self.body
    }

    pub fn set_url(&self, url: &str) {
        self.state.borrow_mut().url = url.to_string();
    }

    pub fn set_active(&self, element: Option<&MemoryElement>) {
        self.state.borrow_mut().active = element.cloned();
    }

    pub fn set_selection_text(&self, text: Option<&str>) {
        self.state.borrow_mut().selection = text.map(str::to_string);
    }

    /// Texts passed to `insert_text_command`, in order.
    pub fn inserted_texts(&self) -> Vec<String> {
        self.state.borrow().inserted.clone()
    }
}

impl Document for MemoryDocument {
    type Element = MemoryElement;

    fn query_selector(&self, selector: &str) -> Option<MemoryElement> {
        self.body.query_selector(selector)
    }

    fn create_element(&self, tag: &str) -> Option<MemoryElement> {
        Some(MemoryElement::new(tag))
    }

    fn active_element(&self) -> Option<MemoryElement> {
        self.state.borrow().active.clone()
    }

    fn selection_text(&self) -> Option<String> {
        self.state.borrow().selection.clone()
    }

    fn location(&self) -> String {
        self.state.borrow().url.clone()
    }

    /// Appends to the focused content-editable element, mirroring a caret
    /// parked at the end of the draft.
    fn insert_text_command(&self, text: &str) -> bool {
        let target = self
            .body
            .descendants()
            .into_iter()
            .find(|el| el.is_focused() && el.is_content_editable());
        let Some(target) = target else {
            return false;
        };
        let current = target.0.borrow().text.clone();
        target.set_text(&format!("{current}{text}"));
        self.state.borrow_mut().inserted.push(text.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> MemoryDocument {
        let doc = MemoryDocument::new("https://example.com/");
        doc.body().append_child(
            &MemoryElement::new("div").with_id("main").with_children([
                MemoryElement::new("header")
                    .with_child(MemoryElement::new("span").with_text("Title")),
                MemoryElement::new("div")
                    .with_attr("role", "row")
                    .with_child(MemoryElement::new("div").with_class("message-in").with_text("a")),
                MemoryElement::new("div")
                    .with_attr("role", "row")
                    .with_child(MemoryElement::new("div").with_class("message-out").with_text("b")),
                MemoryElement::new("footer").with_child(
                    MemoryElement::new("div")
                        .with_attr("contenteditable", "true")
                        .with_attr("data-tab", "10"),
                ),
            ]),
        );
        doc
    }

    #[test]
    fn test_query_in_document_order_across_selector_list() {
        let doc = sample();
        let main = doc.query_selector("#main").unwrap();
        let bubbles = main.query_selector_all(
            "div[role=\"row\"] div.message-out, div[role=\"row\"] div.message-in",
        );
        let texts: Vec<String> = bubbles.iter().map(|b| b.text_content()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_child_combinator() {
        let span = MemoryElement::new("span")
            .with_class("copyable-text")
            .with_child(MemoryElement::new("span").with_text("inner"));
        let root = MemoryElement::new("div").with_child(span);

        assert_eq!(
            root.query_selector("span.copyable-text > span").map(|s| s.text_content()),
            Some("inner".to_string())
        );
        assert!(root.query_selector("div > span > span > span").is_none());
    }

    #[test]
    fn test_attribute_presence_and_value() {
        let doc = sample();
        assert!(doc
            .query_selector("footer div[contenteditable=\"true\"][data-tab]")
            .is_some());
        assert!(doc.query_selector("div[contenteditable=\"false\"]").is_none());
    }

    #[test]
    fn test_append_moves_and_remove_detaches() {
        let a = MemoryElement::new("div");
        let b = MemoryElement::new("div");
        let child = MemoryElement::new("span");

        a.append_child(&child);
        b.append_child(&child);
        assert!(a.children().is_empty());
        assert_eq!(child.parent(), Some(b.clone()));
        assert!(b.contains(&child));

        child.remove();
        assert!(child.parent().is_none());
        assert!(!b.contains(&child));
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let doc = sample();
        let header = doc.query_selector("header").unwrap();
        assert_eq!(header.text_content(), "Title");
        assert_eq!(header.tag_name(), "HEADER");
    }

    #[test]
    fn test_insert_text_command_needs_focused_editable() {
        let doc = sample();
        let editor = doc.query_selector("footer div").unwrap();
        assert!(!doc.insert_text_command("x"));

        editor.focus();
        assert!(doc.insert_text_command("hi"));
        assert_eq!(editor.text_content(), "hi");
        assert_eq!(doc.inserted_texts(), vec!["hi"]);
    }
}
