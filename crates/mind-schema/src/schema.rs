//! # Schema Document
//!
//! Loads the thought-entry schema from disk. The schema is YAML and is
//! parsed by the same loader selected for front matter, so a fallback run
//! still understands a block-style `required` list.

use std::path::Path;

use serde_json::Value;

use crate::error::SchemaError;
use crate::yaml::{empty_mapping, or_empty_mapping, YamlLoader};

/// Conventional location of the schema, relative to the repository root.
pub const SCHEMA_RELATIVE_PATH: &str = "MIND_CI_Validation/schema/thought_entry.schema.yml";

/// A loaded schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    value: Value,
}

impl SchemaDocument {
    /// The permissive schema `{}` used when no schema file exists.
    pub fn empty() -> Self {
        Self {
            value: empty_mapping(),
        }
    }

    /// Load the schema at `path` with `loader`.
    ///
    /// Returns `Ok(None)` when the file does not exist. An empty file, or
    /// one holding only an empty or false value, loads as the permissive
    /// schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Io`] if the file exists but cannot be read,
    /// or the loader's error if it cannot be parsed.
    pub fn load(path: &Path, loader: &dyn YamlLoader) -> Result<Option<Self>, SchemaError> {
        if !path.exists() {
            return Ok(None);
        }

        let text = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
        let value = or_empty_mapping(loader.load(&text)?);

        tracing::debug!(path = %path.display(), loader = loader.name(), "loaded schema");
        Ok(Some(Self { value }))
    }

    /// The schema as a JSON value.
    pub fn as_value(&self) -> &Value {
        &self.value
    }
}

impl Default for SchemaDocument {
    fn default() -> Self {
        Self::empty()
    }
}
