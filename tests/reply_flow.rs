//! End-to-end reply flow: context in, generated text out into the composer

mod common;

use common::{conversation, incoming, outgoing, whatsapp_page};
use futures::executor::block_on;
use pretty_assertions::assert_eq;
use replais::dom::memory::{MemoryDocument, MemoryElement};
use replais::dom::{Document, Element};
use replais::reply::MOCK_REPLY_TEXT;
use replais::script::default_registry;
use replais::timers::manual::ManualScheduler;
use replais::timers::Scheduler;
use replais::{
    ComposerIo, HostMessage, MemorySettingsStore, MetaResponse, MockReplyGenerator, PlatformId,
    ReplaisConfig, ReplaisError, ReplyAssistant, ReplyOverrides,
};
use serde_json::json;
use std::rc::Rc;

fn assistant(doc: &MemoryDocument, store: Rc<MemorySettingsStore>) -> ReplyAssistant<MemoryDocument> {
    let scheduler: Rc<dyn Scheduler> = Rc::new(ManualScheduler::new());
    let config = ReplaisConfig::default();
    let registry = default_registry(doc, &scheduler, &config);
    ReplyAssistant::new(
        doc.clone(),
        Rc::new(registry),
        store,
        Rc::new(MockReplyGenerator::new()),
        scheduler,
        config,
    )
}

fn chat() -> MemoryDocument {
    whatsapp_page(conversation(
        "Shivam Zomato",
        vec![incoming("Shivam Zomato", "your order is delayed"), outgoing("how long?")],
    ))
}

#[test]
fn test_suggest_writes_reply_into_composer() {
    let doc = chat();
    let store = Rc::new(MemorySettingsStore::new());
    let a = assistant(&doc, store.clone());

    let response = block_on(a.suggest(ReplyOverrides::default())).unwrap();
    assert_eq!(response.reply_text, MOCK_REPLY_TEXT);
    assert_eq!(doc.inserted_texts(), vec![MOCK_REPLY_TEXT.to_string()]);

    let composer = doc.query_selector("#main footer div[contenteditable=\"true\"]").unwrap();
    assert_eq!(composer.text_content(), MOCK_REPLY_TEXT);
    assert!(composer.is_focused());

    let saved = store.snapshot().unwrap();
    let contact = &saved.contacts["whatsapp|shivam zomato"];
    assert_eq!(contact.display_name, "Shivam Zomato");
    assert_eq!(contact.platform, PlatformId::Whatsapp);
}

#[test]
fn test_get_meta_reports_open_conversation() {
    let doc = chat();
    let a = assistant(&doc, Rc::new(MemorySettingsStore::new()));

    assert_eq!(HostMessage::parse(&json!({ "type": "GET_META" })), Some(HostMessage::GetMeta));
    let meta = serde_json::to_value(a.metadata()).unwrap();
    assert_eq!(
        meta,
        json!({
            "ok": true,
            "platform": "whatsapp",
            "conversationTitle": "Shivam Zomato",
            "contactKey": "whatsapp|shivam zomato",
        })
    );
}

#[test]
fn test_get_meta_off_platform() {
    let doc = MemoryDocument::new("https://example.com/inbox");
    let a = assistant(&doc, Rc::new(MemorySettingsStore::new()));

    assert_eq!(a.metadata(), MetaResponse::missing());
    assert_eq!(
        serde_json::to_value(a.metadata()).unwrap(),
        json!({ "ok": false, "message": "No platform or conversation title found" })
    );
}

#[test]
fn test_unknown_host_messages_are_ignored() {
    assert_eq!(HostMessage::parse(&json!({ "type": "PING" })), None);
    assert_eq!(HostMessage::parse(&json!("SUGGEST_REPLY")), None);
    assert_eq!(
        HostMessage::parse(&json!({ "type": "SUGGEST_REPLY" })),
        Some(HostMessage::SuggestReply)
    );
}

#[test]
fn test_suggest_off_platform_fails() {
    let doc = MemoryDocument::new("https://example.com/inbox");
    let a = assistant(&doc, Rc::new(MemorySettingsStore::new()));

    let err = block_on(a.suggest(ReplyOverrides::default())).unwrap_err();
    assert!(matches!(err, ReplaisError::NoAdapter(_)));
}

#[test]
fn test_insert_into_plain_textarea_at_caret() {
    let doc = MemoryDocument::new("https://example.com/compose");
    let textarea = MemoryElement::textarea("Hello ").with_selection(6, 6);
    doc.body().append_child(&textarea);

    let io = ComposerIo::new(&doc, None);
    assert!(io.insert_text("hi there"));

    assert_eq!(textarea.value().as_deref(), Some("Hello hi there"));
    assert_eq!(textarea.input_events(), 1);
    assert!(doc.inserted_texts().is_empty());
}

#[test]
fn test_insert_replaces_selected_range() {
    let doc = MemoryDocument::new("https://example.com/compose");
    let textarea = MemoryElement::textarea("Hello world").with_selection(6, 11);
    doc.body().append_child(&textarea);
    doc.set_active(Some(&textarea));

    assert!(ComposerIo::new(&doc, None).insert_text("there"));
    assert_eq!(textarea.value().as_deref(), Some("Hello there"));
}

#[test]
fn test_insert_without_any_composer() {
    let doc = MemoryDocument::new("https://example.com/");
    assert!(!ComposerIo::new(&doc, None).insert_text("hi"));
}
