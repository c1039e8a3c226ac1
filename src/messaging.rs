//! Host-runtime message contracts
//!
//! The extension's background page and popup talk to the content script
//! with two messages: `{ "type": "SUGGEST_REPLY" }` (no payload, no answer)
//! and `{ "type": "GET_META" }`, answered with a [`MetaResponse`].

use crate::models::PlatformId;
use serde::{Deserialize, Serialize};

pub const MISSING_META_MESSAGE: &str = "No platform or conversation title found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostMessage {
    SuggestReply,
    GetMeta,
}

impl HostMessage {
    /// Decode an inbound runtime message. Anything that is not one of the
    /// two known messages is ignored.
    pub fn parse(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MetaResponse {
    pub fn found(platform: PlatformId, conversation_title: String, contact_key: String) -> Self {
        Self {
            ok: true,
            platform: Some(platform),
            conversation_title: Some(conversation_title),
            contact_key: Some(contact_key).filter(|k| !k.is_empty()),
            message: None,
        }
    }

    pub fn missing() -> Self {
        Self {
            ok: false,
            platform: None,
            conversation_title: None,
            contact_key: None,
            message: Some(MISSING_META_MESSAGE.to_string()),
        }
    }
}
