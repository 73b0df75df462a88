//! Installed schema associations
//!
//! Tracks which resolved schema is currently installed for each set of file
//! patterns. Re-resolving after every open or save usually yields the same
//! schema, so installs compare checksums and skip identical content. When a
//! document cannot be resolved the previous association stays in place.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::checksum::Checksum;
use crate::error::Result;
use crate::registry::SchemaRegistry;
use crate::version::FormatVersion;

/// A schema installed for a set of file patterns
#[derive(Debug, Clone, Serialize)]
pub struct SchemaAssociation {
    /// Patterns the schema applies to
    pub file_match: Vec<String>,
    /// Version the schema was resolved for
    pub version: Option<FormatVersion>,
    /// Resolved schema
    pub schema: Value,
    /// Checksum of `schema`
    pub checksum: Checksum,
    /// When this schema was installed
    pub installed_at: DateTime<Utc>,
}

/// Outcome of an install
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationUpdate {
    /// New or changed schema installed
    Installed,
    /// Identical schema already installed
    Unchanged,
}

/// Schemas currently installed, keyed by file patterns
#[derive(Debug, Default)]
pub struct SchemaAssociations {
    associations: BTreeMap<Vec<String>, SchemaAssociation>,
}

impl SchemaAssociations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `schema` for `file_match` unless identical content is present.
    /// An identical schema still records the newly declared `version`.
    pub fn install(
        &mut self,
        file_match: &[String],
        version: Option<FormatVersion>,
        schema: Value,
    ) -> AssociationUpdate {
        let checksum = Checksum::from_json(&schema);
        if let Some(existing) = self.associations.get_mut(file_match) {
            if existing.checksum == checksum {
                debug!(patterns = ?file_match, checksum = %checksum.short(), "schema unchanged");
                existing.version = version;
                return AssociationUpdate::Unchanged;
            }
        }

        debug!(
            patterns = ?file_match,
            version = ?version.as_ref().map(|v| v.as_str()),
            checksum = %checksum.short(),
            "installing schema"
        );
        self.associations.insert(
            file_match.to_vec(),
            SchemaAssociation {
                file_match: file_match.to_vec(),
                version,
                schema,
                checksum,
                installed_at: Utc::now(),
            },
        );
        AssociationUpdate::Installed
    }

    /// Resolve a document against `registry` and install the result.
    /// On failure the error is logged and existing associations are kept.
    pub fn sync_document(
        &mut self,
        registry: &SchemaRegistry,
        path: impl AsRef<Path>,
        text: &str,
    ) -> Result<AssociationUpdate> {
        let path = path.as_ref();
        match registry.resolve_document(path, text) {
            Ok(resolved) => Ok(self.install(&resolved.entry.file_match, resolved.version, resolved.schema)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "keeping previous schema association");
                Err(e)
            }
        }
    }

    /// Association installed for exactly these patterns
    pub fn get(&self, file_match: &[String]) -> Option<&SchemaAssociation> {
        self.associations.get(file_match)
    }

    /// Association that applies to `path` under `registry`
    pub fn for_document(&self, registry: &SchemaRegistry, path: impl AsRef<Path>) -> Option<&SchemaAssociation> {
        registry
            .find(path)
            .and_then(|entry| self.associations.get(&entry.file_match))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaAssociation> {
        self.associations.values()
    }

    pub fn len(&self) -> usize {
        self.associations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }

    /// Drop the association for these patterns
    pub fn remove(&mut self, file_match: &[String]) -> Option<SchemaAssociation> {
        self.associations.remove(file_match)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::path::SchemaPath;
    use crate::schema::{SchemaModification, SchemaTypeEntry, VersionChangeSet};
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        let entry = SchemaTypeEntry::new(vec!["**/items/*.json".into()], json!({"type": "object"}))
            .with_changes(VersionChangeSet::new(
                "1.20",
                vec![SchemaModification::add(SchemaPath::parse_dotted("required"), json!(["components"]))],
            ));
        SchemaRegistry::new(vec![entry]).unwrap()
    }

    #[test]
    fn test_install_skips_identical_schema() {
        let mut associations = SchemaAssociations::new();
        let patterns = vec!["*.json".to_string()];
        assert_eq!(associations.install(&patterns, None, json!({"a": 1})), AssociationUpdate::Installed);
        assert_eq!(associations.install(&patterns, None, json!({"a": 1})), AssociationUpdate::Unchanged);
        assert_eq!(associations.install(&patterns, None, json!({"a": 2})), AssociationUpdate::Installed);
        assert_eq!(associations.len(), 1);
        assert_eq!(associations.get(&patterns).unwrap().schema, json!({"a": 2}));
    }

    #[test]
    fn test_sync_document_tracks_version_changes() {
        let registry = registry();
        let mut associations = SchemaAssociations::new();
        let path = "/bp/items/apple.json";

        let update = associations.sync_document(&registry, path, r#"{"format_version": "1.16.0"}"#).unwrap();
        assert_eq!(update, AssociationUpdate::Installed);
        assert_eq!(associations.for_document(&registry, path).unwrap().schema, json!({"type": "object"}));

        let update = associations.sync_document(&registry, path, r#"{"format_version": "1.16.100"}"#).unwrap();
        assert_eq!(update, AssociationUpdate::Unchanged);
        let unchanged = associations.for_document(&registry, path).unwrap();
        assert_eq!(unchanged.version.as_ref().map(|v| v.as_str()), Some("1.16.100"));

        let update = associations.sync_document(&registry, path, r#"{"format_version": "1.20.10"}"#).unwrap();
        assert_eq!(update, AssociationUpdate::Installed);
        let installed = associations.for_document(&registry, path).unwrap();
        assert_eq!(installed.schema, json!({"type": "object", "required": ["components"]}));
        assert_eq!(installed.version, Some(FormatVersion::parse("1.20.10")));
    }

    #[test]
    fn test_failed_sync_keeps_previous() {
        let registry = registry();
        let mut associations = SchemaAssociations::new();
        associations
            .sync_document(&registry, "/bp/items/apple.json", "{}")
            .unwrap();

        let result = associations.sync_document(&registry, "/bp/blocks/dirt.json", "{}");
        assert!(matches!(result, Err(SchemaError::NoMatchingEntry { .. })));
        assert_eq!(associations.len(), 1);
        assert!(associations.iter().all(|a| a.schema == json!({"type": "object"})));
    }
}
