//! `chrome.runtime.onMessage` listener

use super::dom::WebDocument;
use crate::assistant::ReplyAssistant;
use crate::messaging::HostMessage;
use js_sys::{Function, Reflect};
use serde::Serialize;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

fn decode(message: JsValue) -> Option<HostMessage> {
    let value: serde_json::Value = serde_wasm_bindgen::from_value(message).ok()?;
    HostMessage::parse(&value)
}

fn respond_with_meta(assistant: &ReplyAssistant<WebDocument>, send_response: &Function) {
    let meta = assistant.metadata();
    match meta.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
        Ok(value) => {
            if let Err(e) = send_response.call1(&JsValue::UNDEFINED, &value) {
                log::error!("failed to send metadata response: {e:?}");
            }
        }
        Err(e) => log::error!("failed to serialize metadata: {e}"),
    }
}

/// Register the host message handler for the page's lifetime.
pub fn install(assistant: Rc<ReplyAssistant<WebDocument>>) -> Result<(), JsValue> {
    let callback = Closure::wrap(Box::new(
        move |message: JsValue, _sender: JsValue, send_response: Function| -> JsValue {
            match decode(message) {
                Some(HostMessage::SuggestReply) => {
                    let assistant = assistant.clone();
                    spawn_local(async move { assistant.suggest_from_host().await });
                }
                Some(HostMessage::GetMeta) => respond_with_meta(&assistant, &send_response),
                None => {}
            }
            // Every response is sent synchronously.
            JsValue::FALSE
        },
    ) as Box<dyn FnMut(JsValue, JsValue, Function) -> JsValue>);

    let on_message = ["chrome", "runtime", "onMessage"]
        .iter()
        .try_fold(JsValue::from(js_sys::global()), |target, key| {
            Reflect::get(&target, &(*key).into())
        })?;
    if on_message.is_undefined() {
        return Err(JsValue::from_str("chrome.runtime.onMessage is not available"));
    }
    let add_listener: Function = Reflect::get(&on_message, &"addListener".into())?.dyn_into()?;
    add_listener.call1(&on_message, callback.as_ref())?;

    callback.forget();
    Ok(())
}
