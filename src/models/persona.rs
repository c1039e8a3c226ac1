//! Built-in personas and tones

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_PERSONA: &str = "default";
pub const DEFAULT_TONE: &str = "casual";

/// Tones offered by the widget. Tones are free-form strings on the wire.
pub const KNOWN_TONES: &[&str] = &["neutral", "casual", "formal", "apology", "flirty"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaConfig {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl PersonaConfig {
    fn builtin(id: &str, label: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: Some(description.to_string()),
            icon: None,
        }
    }
}

lazy_static! {
    pub static ref SYSTEM_PERSONAS: Vec<PersonaConfig> = vec![
        PersonaConfig::builtin("default", "Default", "Your normal voice, relaxed and natural."),
        PersonaConfig::builtin("buddy", "Buddy", "Chill, friendly, a bit playful."),
        PersonaConfig::builtin("ceo", "CEO", "Confident, concise, professional."),
        PersonaConfig::builtin("playboy", "Playboy", "Sexy, charismatic, flirty."),
        PersonaConfig::builtin("brother", "Brother", "Brotherly, supportive, a bit playful."),
    ];
    static ref PERSONAS_BY_ID: HashMap<&'static str, &'static PersonaConfig> = SYSTEM_PERSONAS
        .iter()
        .map(|p| (p.id.as_str(), p))
        .collect();
}

pub fn persona(id: &str) -> Option<&'static PersonaConfig> {
    PERSONAS_BY_ID.get(id).copied()
}

pub fn is_known_tone(tone: &str) -> bool {
    KNOWN_TONES.contains(&tone)
}
