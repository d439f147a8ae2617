//! # Error Types
//!
//! Operational errors for the schema layer. These abort a run; a document
//! that merely fails validation is not an error here but a
//! [`ValidationFailure`](crate::validate::ValidationFailure) value.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading documents.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A file could not be read.
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Text could not be parsed as YAML by the full parser.
    #[error("invalid YAML: {0}")]
    Yaml(String),

    /// The parsed YAML tree has no JSON equivalent.
    #[error("YAML-to-JSON conversion failed: {0}")]
    Conversion(String),
}

impl SchemaError {
    /// Wrap an IO error with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
