//! Format version comparison
//!
//! Content files declare a `format_version` such as `"1.21.60"`; older
//! manifests use a bare integer (`2`). Versions compare component-wise with
//! missing trailing components treated as `0`, so `"1.21"` equals `"1.21.0"`.
//!
//! Parsing is permissive: a component that is not a non-negative integer
//! counts as `0`, and one too large for `u64` saturates at `u64::MAX`.
//! Partially typed versions in an editor therefore still order sensibly
//! instead of failing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{Result, SchemaError};

/// A declared format version
#[derive(Debug, Clone)]
pub struct FormatVersion {
    /// Text as written in the source document
    raw: String,
    /// Numeric components, malformed ones already mapped to 0
    components: Vec<u64>,
    /// Declared as a bare JSON integer rather than a string
    bare: bool,
}

impl FormatVersion {
    /// Parse a dotted version, treating malformed components as `0`
    pub fn parse(version_str: &str) -> Self {
        let raw = version_str.trim().to_string();
        let components = raw.split('.').map(parse_component).collect();
        Self {
            raw,
            components,
            bare: false,
        }
    }

    /// Parse a dotted version, rejecting empty or non-numeric components
    pub fn parse_strict(version_str: &str) -> Result<Self> {
        let trimmed = version_str.trim();
        let well_formed = !trimmed.is_empty()
            && trimmed
                .split('.')
                .all(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()) && c.parse::<u64>().is_ok());

        if !well_formed {
            return Err(SchemaError::InvalidVersion(version_str.to_string()));
        }
        Ok(Self::parse(trimmed))
    }

    /// Create a single-component version from a bare integer
    pub fn from_number(number: u64) -> Self {
        Self {
            raw: number.to_string(),
            components: vec![number],
            bare: true,
        }
    }

    /// The version text as declared
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric components (malformed ones are `0`)
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Whether this version was declared as a bare integer
    pub fn is_bare(&self) -> bool {
        self.bare
    }

    /// Components with trailing zeros dropped; equal versions share this form
    fn significant(&self) -> &[u64] {
        let len = self
            .components
            .iter()
            .rposition(|&c| c != 0)
            .map_or(0, |i| i + 1);
        &self.components[..len]
    }
}

/// Non-numeric components count as zero; digit runs too large for `u64`
/// saturate so they still order above smaller components
fn parse_component(component: &str) -> u64 {
    let component = component.trim();
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    component.parse().unwrap_or(u64::MAX)
}

/// Compare two versions component by component
pub fn compare(a: &FormatVersion, b: &FormatVersion) -> Ordering {
    let len = a.components.len().max(b.components.len());
    for i in 0..len {
        let left = a.components.get(i).copied().unwrap_or(0);
        let right = b.components.get(i).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Compare two version strings, returning `-1`, `0` or `1`
pub fn compare_str(a: &str, b: &str) -> i32 {
    match compare(&FormatVersion::parse(a), &FormatVersion::parse(b)) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for FormatVersion {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for FormatVersion {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<u64> for FormatVersion {
    fn from(number: u64) -> Self {
        Self::from_number(number)
    }
}

impl PartialEq for FormatVersion {
    fn eq(&self, other: &Self) -> bool {
        compare(self, other) == Ordering::Equal
    }
}

impl Eq for FormatVersion {}

impl Hash for FormatVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl PartialOrd for FormatVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FormatVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVersion {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for FormatVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match RawVersion::deserialize(deserializer)? {
            RawVersion::Number(n) => Self::from_number(n),
            RawVersion::Text(s) => Self::parse(&s),
        })
    }
}

impl Serialize for FormatVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match (self.bare, self.components.as_slice()) {
            (true, [n]) => serializer.serialize_u64(*n),
            _ => serializer.serialize_str(&self.raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_padding_equivalence() {
        assert_eq!(compare_str("1.21", "1.21.0"), 0);
        assert_eq!(FormatVersion::parse("1.21"), FormatVersion::parse("1.21.0.0"));
    }

    #[test]
    fn test_component_ordering() {
        assert_eq!(compare_str("1.22.0", "1.21.99"), 1);
        assert_eq!(compare_str("1.21.99", "1.22.0"), -1);
        assert_eq!(compare_str("1.10", "1.9"), 1);
    }

    #[test]
    fn test_malformed_components_are_zero() {
        assert_eq!(FormatVersion::parse("1.x.3").components(), &[1, 0, 3]);
        assert_eq!(compare_str("1.beta", "1.0"), 0);
        assert_eq!(compare_str("", "0"), 0);
        assert_eq!(compare_str("1.21.", "1.21"), 0);
        assert_eq!(compare_str("1.+5", "1.0"), 0);
    }

    #[test]
    fn test_oversized_component_orders_high() {
        assert_eq!(compare_str("1.99999999999999999999", "1.1"), 1);
        assert_eq!(compare_str("1.1", "1.99999999999999999999"), -1);
        assert_eq!(FormatVersion::parse("1.99999999999999999999").components(), &[1, u64::MAX]);
    }

    #[test]
    fn test_strict_parsing() {
        assert!(FormatVersion::parse_strict("1.21.60").is_ok());
        assert!(FormatVersion::parse_strict(" 2 ").is_ok());
        assert!(matches!(
            FormatVersion::parse_strict("1.x"),
            Err(SchemaError::InvalidVersion(_))
        ));
        assert!(FormatVersion::parse_strict("").is_err());
        assert!(FormatVersion::parse_strict("1..2").is_err());
    }

    #[test]
    fn test_bare_integer_versions() {
        let v: FormatVersion = serde_json::from_str("2").unwrap();
        assert!(v.is_bare());
        assert_eq!(v, FormatVersion::parse("2.0"));
        assert_eq!(serde_json::to_string(&v).unwrap(), "2");

        let s: FormatVersion = serde_json::from_str("\"1.20.10\"").unwrap();
        assert!(!s.is_bare());
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"1.20.10\"");
    }

    #[test]
    fn test_hash_matches_equality() {
        let mut set = HashSet::new();
        set.insert(FormatVersion::parse("1.21"));
        assert!(set.contains(&FormatVersion::parse("1.21.0")));
        assert!(!set.contains(&FormatVersion::parse("1.21.1")));
    }

    #[test]
    fn test_display_keeps_declared_text() {
        assert_eq!(FormatVersion::parse(" 1.20.0 ").to_string(), "1.20.0");
        assert_eq!(FormatVersion::from(3).to_string(), "3");
    }
}
