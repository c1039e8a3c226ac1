//! Helper utility functions

use crate::models::PlatformId;

/// Title used when a conversation has no readable name.
pub const UNKNOWN_TITLE: &str = "unknown";

/// Derive the persistence key for a conversation: `platform|title`,
/// trimmed and lower-cased, with a missing or blank title mapped to
/// `unknown`.
///
/// Two conversations with the same visible title share a key.
pub fn contact_key(platform: PlatformId, title: Option<&str>) -> String {
    let title = title.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(UNKNOWN_TITLE);
    format!("{}|{}", platform, title.to_lowercase())
}

/// Display name recovered from a contact key, as used for contacts that
/// were never saved.
pub fn display_name_from_key(key: &str) -> Option<&str> {
    key.split_once('|').map(|(_, title)| title)
}

/// Byte index of the UTF-16 offset `offset` in `s`, clamped to the end.
///
/// DOM selection offsets count UTF-16 code units.
pub fn utf16_to_byte_index(s: &str, offset: usize) -> usize {
    let mut units = 0;
    for (idx, ch) in s.char_indices() {
        if units >= offset {
            return idx;
        }
        units += ch.len_utf16();
    }
    s.len()
}

pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Replace the UTF-16 range `start..end` of `value` with `text`.
/// Out-of-range or inverted offsets are clamped.
pub fn splice_utf16(value: &str, start: usize, end: usize, text: &str) -> String {
    let start_byte = utf16_to_byte_index(value, start);
    let end_byte = utf16_to_byte_index(value, end.max(start));
    let mut out = String::with_capacity(value.len() + text.len());
    out.push_str(&value[..start_byte]);
    out.push_str(text);
    out.push_str(&value[end_byte..]);
    out
}
