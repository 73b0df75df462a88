//! Format version extraction from raw document text
//!
//! Documents are often mid-edit and not valid JSON, so the declared version
//! is found with a text match instead of a parse. Both the string form
//! (`"format_version": "1.21.60"`) and the legacy integer form
//! (`"format_version": 2`) are recognised; the first declaration wins.

use regex::Regex;
use std::sync::OnceLock;

use crate::version::FormatVersion;

/// Finds the `format_version` declared in a document
#[derive(Debug, Clone)]
pub struct FormatVersionExtractor {
    pattern: Regex,
}

impl Default for FormatVersionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatVersionExtractor {
    pub fn new() -> Self {
        Self::for_field("format_version")
    }

    /// Extractor for a differently named version field
    pub fn for_field(field: &str) -> Self {
        let pattern = format!(
            r#""{}"\s*:\s*(?:"([^"\r\n]*)"|(\d+))"#,
            regex::escape(field)
        );
        Self {
            pattern: Regex::new(&pattern).unwrap(),
        }
    }

    /// The declared version, or `None` when absent or empty
    pub fn extract(&self, text: &str) -> Option<FormatVersion> {
        let captures = self.pattern.captures(text)?;
        if let Some(quoted) = captures.get(1) {
            let raw = quoted.as_str().trim();
            return (!raw.is_empty()).then(|| FormatVersion::parse(raw));
        }
        let number = captures.get(2)?.as_str();
        Some(match number.parse::<u64>() {
            Ok(n) => FormatVersion::from_number(n),
            Err(_) => FormatVersion::parse(number),
        })
    }
}

/// Extract `format_version` with the default extractor
pub fn extract_format_version(text: &str) -> Option<FormatVersion> {
    static EXTRACTOR: OnceLock<FormatVersionExtractor> = OnceLock::new();
    EXTRACTOR.get_or_init(FormatVersionExtractor::new).extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_version() {
        let text = r#"{
            "format_version": "1.21.60",
            "minecraft:entity": {}
        }"#;
        let version = extract_format_version(text).unwrap();
        assert_eq!(version.as_str(), "1.21.60");
        assert!(!version.is_bare());
    }

    #[test]
    fn test_integer_version() {
        let version = extract_format_version(r#"{"format_version": 2, "header": {}}"#).unwrap();
        assert!(version.is_bare());
        assert_eq!(version, FormatVersion::parse("2"));
    }

    #[test]
    fn test_missing_or_empty_version() {
        assert_eq!(extract_format_version(r#"{"header": {}}"#), None);
        assert_eq!(extract_format_version(r#"{"format_version": ""}"#), None);
        assert_eq!(extract_format_version(""), None);
    }

    #[test]
    fn test_incomplete_document() {
        let version = extract_format_version(r#"{ "format_version" :"1.20.""#).unwrap();
        assert_eq!(version, FormatVersion::parse("1.20"));
    }

    #[test]
    fn test_first_declaration_wins() {
        let text = r#"{"format_version": "1.10.0", "nested": {"format_version": "1.20.0"}}"#;
        assert_eq!(extract_format_version(text).unwrap().as_str(), "1.10.0");
    }

    #[test]
    fn test_oversized_integer_version() {
        let version = extract_format_version(r#"{"format_version": 99999999999999999999}"#).unwrap();
        assert_eq!(version.components(), &[u64::MAX]);
        assert!(version > FormatVersion::from(3));
    }

    #[test]
    fn test_custom_field() {
        let extractor = FormatVersionExtractor::for_field("min_engine_version");
        let version = extractor.extract(r#"{"min_engine_version": "1.19.0"}"#).unwrap();
        assert_eq!(version.as_str(), "1.19.0");
    }
}
