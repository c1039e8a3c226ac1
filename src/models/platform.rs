//! Platform identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Messaging platforms an adapter can be written for.
///
/// Only WhatsApp ships an adapter today; the other identifiers exist so that
/// stored contact configs and request payloads can already name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    Whatsapp,
    Gmail,
    Slack,
    Linkedin,
    Generic,
    Unknown,
}

impl PlatformId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformId::Whatsapp => "whatsapp",
            PlatformId::Gmail => "gmail",
            PlatformId::Slack => "slack",
            PlatformId::Linkedin => "linkedin",
            PlatformId::Generic => "generic",
            PlatformId::Unknown => "unknown",
        }
    }
}

impl Default for PlatformId {
    fn default() -> Self {
        PlatformId::Unknown
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
