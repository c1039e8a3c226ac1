//! WhatsApp Web page builders for tests

use super::PRE_PLAIN_ATTR;
use crate::dom::memory::{MemoryDocument, MemoryElement};
use crate::dom::Element;

/// One message row; `pre` is the bubble's `data-pre-plain-text`.
pub fn bubble(outgoing: bool, pre: Option<&str>, text: &str) -> MemoryElement {
    let mut copyable = MemoryElement::new("div").with_class("copyable-text");
    if let Some(pre) = pre {
        copyable = copyable.with_attr(PRE_PLAIN_ATTR, pre);
    }
    let copyable = copyable.with_child(
        MemoryElement::new("span")
            .with_class("_ao3e selectable-text copyable-text")
            .with_child(MemoryElement::new("span").with_text(text)),
    );
    MemoryElement::new("div").with_attr("role", "row").with_child(
        MemoryElement::new("div")
            .with_class(if outgoing { "message-out" } else { "message-in" })
            .with_child(copyable),
    )
}

/// The `#main` conversation panel: header, message list and composer.
pub fn panel(title: &str, rows: Vec<MemoryElement>) -> MemoryElement {
    MemoryElement::new("div").with_id("main").with_children([
        MemoryElement::new("header").with_child(MemoryElement::new("span").with_text(title)),
        MemoryElement::new("div")
            .with_attr("data-scrolltracepolicy", "wa.web.conversation.messages")
            .with_children(rows),
        MemoryElement::new("footer").with_child(
            MemoryElement::new("div").with_class("wrapper").with_child(
                MemoryElement::new("div")
                    .with_attr("contenteditable", "true")
                    .with_attr("data-tab", "10"),
            ),
        ),
    ])
}

pub fn page(title: &str, rows: Vec<MemoryElement>) -> MemoryDocument {
    let doc = MemoryDocument::new("https://web.whatsapp.com/");
    doc.body().append_child(&panel(title, rows));
    doc
}
