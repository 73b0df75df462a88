//! Content Schemas
//!
//! JSON Schemas for game content definition files, adapted to the
//! `format_version` each document declares.
//!
//! ## Features
//!
//! - **Version-Gated Changes**: A base schema plus change-sets that apply from a minimum version
//! - **Deterministic Resolution**: Same inputs always produce the same schema
//! - **Permissive Versions**: Partially typed or malformed versions never fail resolution
//! - **File Matching**: Glob patterns select the schema type for a document
//! - **Change Detection**: Checksums skip reinstalling identical schemas
//!
//! ## Architecture
//!
//! ```text
//! document text ──► extract ──► FormatVersion ─┐
//! document path ──► registry ─► SchemaTypeEntry ┴─► resolver ─► schema ─► associations
//!                                                    │
//!                                      version::compare + path::{set, remove}
//! ```

pub mod association;
pub mod checksum;
pub mod config;
pub mod diff;
pub mod error;
pub mod extract;
pub mod path;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod validate;
pub mod version;

pub use association::{AssociationUpdate, SchemaAssociation, SchemaAssociations};
pub use checksum::Checksum;
pub use config::SchemaConfig;
pub use diff::SchemaDiff;
pub use error::{Result, SchemaError};
pub use extract::{extract_format_version, FormatVersionExtractor};
pub use path::{PathSegment, SchemaPath};
pub use registry::{ResolvedDocument, SchemaRegistry};
pub use resolver::{resolve, SchemaResolver};
pub use schema::{ModificationAction, SchemaModification, SchemaTypeEntry, VersionChangeSet};
pub use validate::validate_document;
pub use version::FormatVersion;
