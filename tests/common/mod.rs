//! Shared WhatsApp Web page builders

#![allow(dead_code)]

use replais::dom::memory::{MemoryDocument, MemoryElement};
use replais::dom::Element;

pub const WHATSAPP_URL: &str = "https://web.whatsapp.com/";

/// A message row. `sender` is rendered into `data-pre-plain-text` with a
/// fixed timestamp.
pub fn row(outgoing: bool, sender: Option<&str>, text: &str) -> MemoryElement {
    let mut copyable = MemoryElement::new("div").with_class("copyable-text");
    if let Some(sender) = sender {
        copyable = copyable.with_attr("data-pre-plain-text", &format!("[10:42, 3/11/2025] {sender}: "));
    }
    MemoryElement::new("div").with_attr("role", "row").with_child(
        MemoryElement::new("div")
            .with_class(if outgoing { "message-out focusable-list-item" } else { "message-in focusable-list-item" })
            .with_child(copyable.with_child(
                MemoryElement::new("span")
                    .with_class("_ao3e selectable-text copyable-text")
                    .with_child(MemoryElement::new("span").with_text(text)),
            )),
    )
}

pub fn incoming(sender: &str, text: &str) -> MemoryElement {
    row(false, Some(sender), text)
}

pub fn outgoing(text: &str) -> MemoryElement {
    row(true, Some("Me"), text)
}

/// `#main` with a header, the message list and the footer composer.
pub fn conversation(title: &str, rows: Vec<MemoryElement>) -> MemoryElement {
    MemoryElement::new("div").with_id("main").with_children([
        MemoryElement::new("header").with_children([
            MemoryElement::new("div").with_child(MemoryElement::new("span").with_text(title)),
            MemoryElement::new("div").with_child(MemoryElement::new("span").with_text("click here for contact info")),
        ]),
        MemoryElement::new("div")
            .with_attr("data-scrolltracepolicy", "wa.web.conversation.messages")
            .with_children(rows),
        MemoryElement::new("footer").with_child(
            MemoryElement::new("div").with_class("lexical-wrapper").with_child(
                MemoryElement::new("div")
                    .with_attr("contenteditable", "true")
                    .with_attr("role", "textbox")
                    .with_attr("data-tab", "10"),
            ),
        ),
    ])
}

/// WhatsApp Web with the chat list sidebar and `conversation` open.
pub fn whatsapp_page(conversation: MemoryElement) -> MemoryDocument {
    let doc = MemoryDocument::new(WHATSAPP_URL);
    doc.body().append_child(
        &MemoryElement::new("div").with_id("app").with_children([
            MemoryElement::new("div").with_id("side").with_children([
                MemoryElement::new("header").with_child(MemoryElement::new("span").with_text("Chats")),
                MemoryElement::new("div")
                    .with_attr("contenteditable", "true")
                    .with_attr("data-tab", "3"),
            ]),
            conversation,
        ]),
    );
    doc
}

/// Swap the open conversation for another one.
pub fn switch_conversation(doc: &MemoryDocument, next: MemoryElement) {
    let app = doc.body().query_selector("#app").expect("app root");
    if let Some(current) = app.query_selector("#main") {
        current.remove();
    }
    app.append_child(&next);
}
