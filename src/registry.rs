//! Schema type registry
//!
//! An ordered, read-only table mapping file glob patterns to a base schema
//! and its version-gated change-sets. The registry is built once and passed
//! to whoever resolves schemas; lookups return the first matching entry.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{Result, SchemaError};
use crate::extract::extract_format_version;
use crate::resolver::SchemaResolver;
use crate::schema::SchemaTypeEntry;
use crate::version::FormatVersion;

/// Registry files hold either one entry or a list of entries
#[derive(Deserialize)]
#[serde(untagged)]
enum RegistryFile {
    Many(Vec<SchemaTypeEntry>),
    One(Box<SchemaTypeEntry>),
}

/// A schema resolved for a specific document
#[derive(Debug, Clone)]
pub struct ResolvedDocument<'a> {
    /// Entry the document matched
    pub entry: &'a SchemaTypeEntry,
    /// Version declared by the document, if any
    pub version: Option<FormatVersion>,
    /// Schema for that version
    pub schema: Value,
}

/// The file type registry
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    /// Entries in lookup order
    entries: Vec<SchemaTypeEntry>,
    /// Compiled `file_match` patterns, parallel to `entries`
    patterns: Vec<Vec<Pattern>>,
    /// Base directory for matching relative paths
    root: Option<PathBuf>,
}

impl SchemaRegistry {
    /// Build a registry, compiling every entry's file patterns
    pub fn new(entries: Vec<SchemaTypeEntry>) -> Result<Self> {
        let patterns = entries
            .iter()
            .map(|entry| {
                entry
                    .file_match
                    .iter()
                    .map(|p| Pattern::new(p))
                    .collect::<std::result::Result<Vec<_>, _>>()
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            entries,
            patterns,
            root: None,
        })
    }

    /// Match paths relative to `root` in addition to the full path
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Load entries from a JSON file holding one entry or a list
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let entries = read_entries(path.as_ref())?;
        Self::new(entries)
    }

    /// Load entries from every `*.json` file under `dir`, in path order
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(SchemaError::NotFound(dir.display().to_string()));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| SchemaError::Io(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            trace!(path = %path.display(), "loading registry file");
            entries.extend(read_entries(path)?);
        }

        debug!(dir = %dir.display(), entries = entries.len(), "loaded schema registry");
        Self::new(entries)
    }

    /// Load from a file or a directory
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_file(path)
        }
    }

    pub fn entries(&self) -> &[SchemaTypeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by display name
    pub fn get(&self, name: &str) -> Option<&SchemaTypeEntry> {
        self.entries.iter().find(|e| e.name.as_deref() == Some(name))
    }

    /// First entry whose patterns match `path`
    pub fn find(&self, path: impl AsRef<Path>) -> Option<&SchemaTypeEntry> {
        let candidates = self.candidates(path.as_ref());
        self.entries
            .iter()
            .zip(&self.patterns)
            .find(|(_, patterns)| {
                patterns
                    .iter()
                    .any(|p| candidates.iter().any(|c| p.matches(c)))
            })
            .map(|(entry, _)| entry)
    }

    /// Resolve the schema for a document from its path and current text
    pub fn resolve_document(&self, path: impl AsRef<Path>, text: &str) -> Result<ResolvedDocument<'_>> {
        let path = path.as_ref();
        let entry = self.find(path).ok_or_else(|| SchemaError::NoMatchingEntry {
            path: path.display().to_string(),
        })?;

        let version = extract_format_version(text);
        debug!(
            path = %path.display(),
            entry = %entry.label(),
            version = ?version.as_ref().map(|v| v.as_str()),
            "resolving document schema"
        );

        let schema = SchemaResolver::new(entry).resolve(version.as_ref());
        Ok(ResolvedDocument {
            entry,
            version,
            schema,
        })
    }

    /// Paths to test against patterns, with `/` separators
    fn candidates(&self, path: &Path) -> Vec<String> {
        let mut candidates = vec![normalize(path)];
        if let Some(relative) = self.root.as_ref().and_then(|root| path.strip_prefix(root).ok()) {
            candidates.push(normalize(relative));
        }
        candidates
    }
}

fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn read_entries(path: &Path) -> Result<Vec<SchemaTypeEntry>> {
    let content = fs::read_to_string(path)?;
    let file: RegistryFile = serde_json::from_str(&content).map_err(|e| {
        SchemaError::InvalidFormat(format!("{}: {}", path.display(), e))
    })?;
    Ok(match file {
        RegistryFile::Many(entries) => entries,
        RegistryFile::One(entry) => vec![*entry],
    })
}
