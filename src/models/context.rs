//! Normalized conversation model produced by every site adapter

use serde::{Deserialize, Serialize};

/// Display name used for the local user.
pub const SELF_NAME: &str = "You";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorKind {
    #[serde(rename = "self")]
    SelfAuthor,
    Other,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub kind: AuthorKind,
}

impl Participant {
    pub fn new(name: impl Into<String>, kind: AuthorKind) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
        }
    }
}

/// Best-effort attachment description. `kind` is open-ended
/// (`image`, `file`, `audio`, `video`, `link`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

impl Attachment {
    pub fn image(url: impl Into<String>) -> Self {
        let url = url.into();
        let mime_type = url.starts_with("data:image").then(|| "image/*".to_string());
        Self {
            kind: "image".to_string(),
            mime_type,
            url: Some(url),
            file_name: None,
            alt_text: None,
        }
    }

    pub fn with_alt_text(mut self, alt: impl Into<String>) -> Self {
        let alt = alt.into();
        self.alt_text = if alt.is_empty() { None } else { Some(alt) };
        self
    }
}

/// A single message. `raw` keeps the unparsed platform fragment for
/// debugging only; reply generation must not depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub author_kind: AuthorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl Message {
    pub fn new(author_kind: AuthorKind, text: impl Into<String>) -> Self {
        Self {
            id: None,
            author_kind,
            author_name: None,
            text: text.into(),
            timestamp: None,
            attachments: None,
            raw: None,
        }
    }

    pub fn with_author(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: Option<String>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = if attachments.is_empty() {
            None
        } else {
            Some(attachments)
        };
        self
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMeta {
    pub is_group: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Conversation snapshot handed to reply generation. Messages are ordered
/// oldest to newest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    pub participants: Vec<Participant>,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ContextMeta>,
}

impl MessageContext {
    /// Build a context whose participants are derived from `messages`.
    ///
    /// Participants are keyed by first-seen author name and tagged with the
    /// kind of that first message. A `You`/self participant is appended when
    /// none was observed so consumers always see one.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        let participants = derive_participants(&messages);
        let is_group = participants.len() > 2;

        Self {
            conversation_id: None,
            participants,
            messages,
            meta: Some(ContextMeta {
                is_group,
                extra: serde_json::Map::new(),
            }),
        }
    }

    pub fn is_group(&self) -> bool {
        self.meta.as_ref().map(|m| m.is_group).unwrap_or(false)
    }

    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }
}

fn derive_participants(messages: &[Message]) -> Vec<Participant> {
    let mut participants: Vec<Participant> = Vec::new();

    for message in messages {
        let Some(name) = message.author_name.as_deref() else {
            continue;
        };
        if !participants.iter().any(|p| p.name == name) {
            participants.push(Participant::new(name, message.author_kind));
        }
    }

    if !participants.iter().any(|p| p.name == SELF_NAME) {
        participants.push(Participant::new(SELF_NAME, AuthorKind::SelfAuthor));
    }

    participants
}
