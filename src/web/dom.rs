//! `Document`/`Element` over web-sys

use crate::dom::{Document, Element};
use wasm_bindgen::JsCast;
use web_sys::{Event, EventInit, HtmlDocument, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

#[derive(Debug, Clone, PartialEq)]
pub struct WebElement(web_sys::Element);

impl WebElement {
    pub fn new(element: web_sys::Element) -> Self {
        Self(element)
    }

    pub fn raw(&self) -> &web_sys::Element {
        &self.0
    }

    fn html(&self) -> Option<&HtmlElement> {
        self.0.dyn_ref::<HtmlElement>()
    }
}

impl Element for WebElement {
    fn query_selector(&self, selector: &str) -> Option<Self> {
        self.0.query_selector(selector).ok().flatten().map(WebElement)
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Self> {
        let Ok(list) = self.0.query_selector_all(selector) else {
            log::debug!("invalid selector {selector}");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(WebElement)
            .collect()
    }

    fn tag_name(&self) -> String {
        self.0.tag_name()
    }

    fn text_content(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn set_class_name(&self, class: &str) {
        self.0.set_class_name(class);
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent_element().map(WebElement)
    }

    fn contains(&self, other: &Self) -> bool {
        self.0.contains(Some(&other.0))
    }

    fn append_child(&self, child: &Self) {
        if let Err(e) = self.0.append_child(&child.0) {
            log::warn!("appendChild failed: {e:?}");
        }
    }

    fn remove(&self) {
        self.0.remove();
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Some(html) = self.html() {
            let _ = html.style().set_property(property, value);
        }
    }

    fn computed_position(&self) -> String {
        web_sys::window()
            .and_then(|window| window.get_computed_style(&self.0).ok().flatten())
            .and_then(|style| style.get_property_value("position").ok())
            .unwrap_or_else(|| "static".to_string())
    }

    fn value(&self) -> Option<String> {
        if let Some(textarea) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            return Some(textarea.value());
        }
        self.0.dyn_ref::<HtmlInputElement>().map(HtmlInputElement::value)
    }

    fn set_value(&self, value: &str) {
        if let Some(textarea) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            textarea.set_value(value);
        } else if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        }
    }

    fn selection_range(&self) -> Option<(usize, usize)> {
        let (start, end) = if let Some(textarea) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            (textarea.selection_start().ok()??, textarea.selection_end().ok()??)
        } else {
            let input = self.0.dyn_ref::<HtmlInputElement>()?;
            (input.selection_start().ok()??, input.selection_end().ok()??)
        };
        Some((start as usize, end as usize))
    }

    fn is_content_editable(&self) -> bool {
        self.html().map(HtmlElement::is_content_editable).unwrap_or(false)
    }

    fn focus(&self) {
        if let Some(html) = self.html() {
            let _ = html.focus();
        }
    }

    fn dispatch_input_event(&self) {
        let init = EventInit::new();
        init.set_bubbles(true);
        match Event::new_with_event_init_dict("input", &init) {
            Ok(event) => {
                let _ = self.0.dispatch_event(&event);
            }
            Err(e) => log::warn!("could not create input event: {e:?}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebDocument(web_sys::Document);

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self(document)
    }

    pub fn raw(&self) -> &web_sys::Document {
        &self.0
    }
}

impl Document for WebDocument {
    type Element = WebElement;

    fn query_selector(&self, selector: &str) -> Option<WebElement> {
        self.0.query_selector(selector).ok().flatten().map(WebElement)
    }

    fn create_element(&self, tag: &str) -> Option<WebElement> {
        self.0.create_element(tag).ok().map(WebElement)
    }

    fn active_element(&self) -> Option<WebElement> {
        self.0.active_element().map(WebElement)
    }

    fn selection_text(&self) -> Option<String> {
        let selection = web_sys::window()?.get_selection().ok()??;
        let text = String::from(selection.to_string());
        Some(text).filter(|t| !t.is_empty())
    }

    fn location(&self) -> String {
        self.0
            .location()
            .and_then(|location| location.href().ok())
            .unwrap_or_default()
    }

    fn insert_text_command(&self, text: &str) -> bool {
        let Some(html) = self.0.dyn_ref::<HtmlDocument>() else {
            return false;
        };
        html.exec_command_with_show_ui_and_value("insertText", false, text)
            .unwrap_or(false)
    }
}
