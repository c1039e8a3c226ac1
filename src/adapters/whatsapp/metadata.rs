//! Parser for WhatsApp's `data-pre-plain-text` bubble attribute
//!
//! Input format: `"[<timestamp>] <sender>: "`, e.g.
//! `"[11:11 pm, 3/11/2025] Abhay: "`. Anything else parses to
//! `PrePlainMeta::default()` (both fields unset).

use lazy_static::lazy_static;
use regex::Regex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrePlainMeta {
    pub timestamp: Option<String>,
    pub sender: Option<String>,
}

lazy_static! {
    // [timestamp] sender:
    static ref PRE_PLAIN_PATTERN: Regex = Regex::new(r"^\[(.*?)\]\s*(.*?):\s*$").unwrap();
}

pub fn parse_pre_plain(pre: Option<&str>) -> PrePlainMeta {
    let Some(caps) = pre.and_then(|p| PRE_PLAIN_PATTERN.captures(p)) else {
        return PrePlainMeta::default();
    };

    let non_empty = |idx: usize| {
        caps.get(idx)
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty())
    };

    PrePlainMeta {
        timestamp: non_empty(1),
        sender: non_empty(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parses_timestamp_and_sender() {
        let meta = parse_pre_plain(Some("[11:11 pm, 3/11/2025] Abhay: "));
        assert_eq!(meta.timestamp.as_deref(), Some("11:11 pm, 3/11/2025"));
        assert_eq!(meta.sender.as_deref(), Some("Abhay"));
    }

    #[test]
    fn test_sender_may_contain_colons_and_spaces() {
        let meta = parse_pre_plain(Some("[09:02, 01/02/2024] +91 98765 43210: "));
        assert_eq!(meta.sender.as_deref(), Some("+91 98765 43210"));

        let meta = parse_pre_plain(Some("[10:00] Team: Ops: "));
        assert_eq!(meta.sender.as_deref(), Some("Team: Ops"));
    }

    #[test_case(None ; "missing attribute")]
    #[test_case(Some("") ; "empty attribute")]
    #[test_case(Some("Abhay: hi") ; "no timestamp bracket")]
    #[test_case(Some("[10:00] Abhay") ; "no trailing colon")]
    #[test_case(Some("[10:00 Abhay: ") ; "unclosed bracket")]
    fn test_parse_miss_leaves_fields_unset(input: Option<&str>) {
        assert_eq!(parse_pre_plain(input), PrePlainMeta::default());
    }

    #[test]
    fn test_empty_sender_is_unset() {
        let meta = parse_pre_plain(Some("[10:00] : "));
        assert_eq!(meta.timestamp.as_deref(), Some("10:00"));
        assert_eq!(meta.sender, None);
    }
}
