//! Document validation against resolved schemas

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::error::{Result, SchemaError};

/// Validate `document` against `schema`.
///
/// A schema that does not compile is reported as `InvalidFormat`; a document
/// that does not conform is reported as `Validation` with one message per
/// error, prefixed by its instance path.
pub fn validate_document(schema: &Value, document: &Value) -> Result<()> {
    let compiled = JSONSchema::compile(schema)
        .map_err(|e| SchemaError::InvalidFormat(format!("schema does not compile: {}", e)))?;

    let messages: Vec<String> = match compiled.validate(document) {
        Ok(()) => return Ok(()),
        Err(errors) => errors
            .map(|e| {
                let location = e.instance_path.to_string();
                if location.is_empty() {
                    format!("/: {}", e)
                } else {
                    format!("{}: {}", location, e)
                }
            })
            .collect(),
    };
    Err(SchemaError::Validation(messages))
}
