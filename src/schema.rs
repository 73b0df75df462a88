//! Schema types and structures

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::SchemaPath;
use crate::version::FormatVersion;

/// What a modification does at its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationAction {
    /// Create or overwrite the target
    Add,
    /// Same as `Add`
    Modify,
    /// Delete the target if present
    Remove,
}

impl ModificationAction {
    /// Whether this action writes a value
    pub fn is_write(&self) -> bool {
        matches!(self, ModificationAction::Add | ModificationAction::Modify)
    }
}

/// A single edit applied to a schema document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaModification {
    /// Location of the edit
    pub target: SchemaPath,
    /// Kind of edit
    pub action: ModificationAction,
    /// Value written by `add`/`modify`; a missing value writes `null`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl SchemaModification {
    /// Create an `add` modification
    pub fn add(target: SchemaPath, value: Value) -> Self {
        Self {
            target,
            action: ModificationAction::Add,
            value: Some(value),
        }
    }

    /// Create a `modify` modification
    pub fn modify(target: SchemaPath, value: Value) -> Self {
        Self {
            target,
            action: ModificationAction::Modify,
            value: Some(value),
        }
    }

    /// Create a `remove` modification
    pub fn remove(target: SchemaPath) -> Self {
        Self {
            target,
            action: ModificationAction::Remove,
            value: None,
        }
    }
}

/// Modifications that apply from `version` onwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionChangeSet {
    /// Minimum format version this change-set applies to
    pub version: FormatVersion,
    /// Edits, applied in order
    #[serde(default)]
    pub changes: Vec<SchemaModification>,
}

impl VersionChangeSet {
    pub fn new(version: impl Into<FormatVersion>, changes: Vec<SchemaModification>) -> Self {
        Self {
            version: version.into(),
            changes,
        }
    }
}

/// A content file type: which files it covers and how its schema evolves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaTypeEntry {
    /// Display name (e.g., "entity", "manifest")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Glob patterns of files using this schema
    pub file_match: Vec<String>,
    /// Schema before any version-gated change
    #[serde(alias = "schema")]
    pub base_schema: Value,
    /// Version-gated change-sets, in declaration order
    #[serde(default)]
    pub versioned_changes: Vec<VersionChangeSet>,
}

impl SchemaTypeEntry {
    /// Create a new entry with no versioned changes
    pub fn new(file_match: Vec<String>, base_schema: Value) -> Self {
        Self {
            name: None,
            file_match,
            base_schema,
            versioned_changes: Vec::new(),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a change-set
    pub fn with_changes(mut self, change_set: VersionChangeSet) -> Self {
        self.versioned_changes.push(change_set);
        self
    }

    /// Name used in logs and CLI output
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.file_match.join(", "),
        }
    }

    /// Highest version any change-set is gated on
    pub fn latest_version(&self) -> Option<&FormatVersion> {
        self.versioned_changes.iter().map(|cs| &cs.version).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_from_json() {
        let entry: SchemaTypeEntry = serde_json::from_value(json!({
            "name": "entity",
            "fileMatch": ["**/entities/**/*.json"],
            "baseSchema": {"type": "object"},
            "versionedChanges": [
                {
                    "version": "1.20.0",
                    "changes": [
                        {"action": "add", "target": ["properties", "x"], "value": {"type": "string"}},
                        {"action": "remove", "target": "properties.old"}
                    ]
                },
                {"version": 2, "changes": []}
            ]
        }))
        .unwrap();

        assert_eq!(entry.label(), "entity");
        assert_eq!(entry.versioned_changes.len(), 2);
        let first = &entry.versioned_changes[0];
        assert_eq!(first.changes[0].action, ModificationAction::Add);
        assert_eq!(first.changes[1].action, ModificationAction::Remove);
        assert_eq!(first.changes[1].value, None);
        assert_eq!(first.changes[1].target.to_string(), "properties.old");
        assert_eq!(entry.latest_version(), Some(&FormatVersion::from(2)));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result: std::result::Result<SchemaModification, _> =
            serde_json::from_value(json!({"action": "rename", "target": ["a"]}));
        assert!(result.is_err());
    }

    #[test]
    fn test_label_falls_back_to_patterns() {
        let entry = SchemaTypeEntry::new(vec!["a/*.json".into(), "b/*.json".into()], json!({}));
        assert_eq!(entry.label(), "a/*.json, b/*.json");
        assert_eq!(entry.latest_version(), None);
    }
}
