//! Reply-generation request and response shapes

use super::context::MessageContext;
use super::platform::PlatformId;
use super::settings::ContactConfig;
use serde::{Deserialize, Serialize};

/// What the user wants for this contact right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub contact_key: String,
    pub platform: PlatformId,
    pub conversation_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    pub contact_instructions: String,
    /// Applies to this reply only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_instructions: Option<String>,
}

/// Composer state at the moment of the request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_draft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub context: MessageContext,
    pub user_context: UserContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_state: Option<UiState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub reply_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_contact_config: Option<ContactConfig>,
}
