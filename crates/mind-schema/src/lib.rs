//! # mind-schema — Thought Entry Schema Validation
//!
//! Checks that markdown thought entries carry YAML front matter conforming
//! to the thought-entry schema.
//!
//! ## Pipeline
//!
//! 1. [`frontmatter`] isolates the text between `---` delimiter lines.
//! 2. A [`YamlLoader`] parses that text into a `serde_json::Value`.
//! 3. An [`InstanceValidator`] checks the value against the schema.
//!
//! ## Degraded Operation
//!
//! The full backends (`serde_yaml`, `jsonschema`) sit behind the
//! `full-yaml` and `full-validation` features. Without them, or when the
//! caller narrows [`Capabilities`], a naive subset parser and a
//! required-keys check stand in. Selection happens once, in
//! [`Toolchain`], which reports every fallback it engaged.
//!
//! ## Crate Policy
//!
//! - A non-conforming entry is a [`ValidationFailure`] value, never an
//!   error. [`SchemaError`] is reserved for conditions that abort a run.
//! - No `.unwrap()` outside tests.

pub mod capability;
pub mod error;
pub mod frontmatter;
pub mod naive_yaml;
pub mod schema;
pub mod validate;
pub mod yaml;

pub use capability::{Capabilities, Degradation, Toolchain};
pub use error::SchemaError;
pub use frontmatter::{extract_front_matter, read_front_matter};
pub use naive_yaml::NaiveYamlLoader;
pub use schema::{SchemaDocument, SCHEMA_RELATIVE_PATH};
pub use validate::{InstanceValidator, RequiredKeysValidator, ValidationFailure, Violation};
pub use yaml::YamlLoader;

#[cfg(feature = "full-validation")]
pub use validate::JsonSchemaValidator;
#[cfg(feature = "full-yaml")]
pub use yaml::SerdeYamlLoader;
