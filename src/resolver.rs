//! Versioned schema resolution
//!
//! Produces the schema that applies to a document declaring a given format
//! version: clone the base schema, keep the change-sets gated at or below
//! that version, order them by version (declaration order breaks ties) and
//! apply every modification in sequence. Later modifications may target
//! nodes created by earlier ones.
//!
//! The base schema is never mutated, and the same inputs always give the
//! same output.

use serde_json::Value;
use tracing::{debug, trace};

use crate::path;
use crate::schema::{SchemaModification, SchemaTypeEntry, VersionChangeSet};
use crate::version::{compare, FormatVersion};

/// Resolve `base` for `target`, applying every change-set gated at or below it.
/// Without a target version, or without change-sets, a copy of `base` is
/// returned unchanged.
pub fn resolve(
    base: &Value,
    target: Option<&FormatVersion>,
    change_sets: &[VersionChangeSet],
) -> Value {
    let mut result = base.clone();

    let Some(target) = target else {
        return result;
    };
    if change_sets.is_empty() {
        return result;
    }

    let mut applicable: Vec<&VersionChangeSet> = change_sets
        .iter()
        .filter(|cs| compare(target, &cs.version).is_ge())
        .collect();
    // Vec::sort_by is stable: equal versions keep declaration order
    applicable.sort_by(|a, b| compare(&a.version, &b.version));

    debug!(
        version = %target,
        applicable = applicable.len(),
        total = change_sets.len(),
        "resolving schema"
    );

    for change_set in applicable {
        trace!(version = %change_set.version, changes = change_set.changes.len(), "applying change-set");
        for modification in &change_set.changes {
            apply(&mut result, modification);
        }
    }

    result
}

/// Apply one modification in place
pub fn apply(schema: &mut Value, modification: &SchemaModification) {
    if modification.action.is_write() {
        let value = modification.value.clone().unwrap_or(Value::Null);
        path::set(schema, &modification.target, value);
    } else {
        path::remove(schema, &modification.target);
    }
}

/// Resolves schemas for one registry entry
#[derive(Debug, Clone, Copy)]
pub struct SchemaResolver<'a> {
    entry: &'a SchemaTypeEntry,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(entry: &'a SchemaTypeEntry) -> Self {
        Self { entry }
    }

    pub fn entry(&self) -> &'a SchemaTypeEntry {
        self.entry
    }

    /// Schema for a document declaring `version`
    pub fn resolve(&self, version: Option<&FormatVersion>) -> Value {
        resolve(&self.entry.base_schema, version, &self.entry.versioned_changes)
    }

    /// Schema with every change-set applied
    pub fn resolve_latest(&self) -> Value {
        self.resolve(self.entry.latest_version())
    }
}
