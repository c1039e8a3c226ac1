//! Persisted per-contact configuration

use super::platform::PlatformId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage record name. Bump the version suffix on incompatible changes.
pub const SETTINGS_KEY: &str = "replais:userSettings:v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactConfig {
    pub contact_key: String,
    pub platform: PlatformId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl ContactConfig {
    /// Shell config for a contact that has never been saved.
    pub fn new(contact_key: impl Into<String>, platform: PlatformId, display_name: impl Into<String>) -> Self {
        Self {
            contact_key: contact_key.into(),
            platform,
            display_name: display_name.into(),
            persona_id: None,
            tone: None,
            instructions: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub platform: PlatformId,
    #[serde(default)]
    pub contacts: HashMap<String, ContactConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_instructions: Option<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            platform: PlatformId::Whatsapp,
            contacts: HashMap::new(),
            global_instructions: Some(String::new()),
        }
    }
}

impl UserSettings {
    /// Stored config for `contact_key`, or a fresh shell named after the
    /// conversation title.
    pub fn contact_or_default(
        &self,
        platform: PlatformId,
        contact_key: &str,
        title: Option<&str>,
    ) -> ContactConfig {
        self.contacts
            .get(contact_key)
            .cloned()
            .unwrap_or_else(|| ContactConfig::new(contact_key, platform, title.unwrap_or("Unknown")))
    }

    pub fn upsert_contact(&mut self, config: ContactConfig) {
        self.contacts.insert(config.contact_key.clone(), config);
    }
}
