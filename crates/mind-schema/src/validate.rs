//! # Instance Validation
//!
//! Checks a parsed front-matter record against the thought-entry schema.
//! A non-conforming record is reported as a [`ValidationFailure`] value;
//! the caller decides how to surface it. A schema the full validator
//! cannot compile does not abort the run either: every record checked
//! against it fails with the compile error.
//!
//! Two validators implement [`InstanceValidator`]:
//!
//! - [`JsonSchemaValidator`] compiles the schema with the `jsonschema` crate
//!   and honours the full constraint vocabulary (types, enums, patterns,
//!   nested schemas). Only compiled with the `full-validation` feature.
//! - [`RequiredKeysValidator`] checks only that every key in the schema's
//!   `required` list is present, ignoring all other keywords.

use std::fmt;

use serde_json::Value;

/// A record that did not conform to the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    message: String,
    violations: Vec<Violation>,
}

impl ValidationFailure {
    /// Failure carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            violations: Vec::new(),
        }
    }

    /// Failure built from structured violations.
    ///
    /// The message is that of the first violation; the rest stay available
    /// through [`violations`](Self::violations).
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        let message = violations
            .first()
            .map(|v| v.message.clone())
            .unwrap_or_default();
        Self {
            message,
            violations,
        }
    }

    /// Human-readable description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured violations, empty for the required-keys check.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationFailure {}

/// A single schema violation with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that rejected it.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Validate a parsed front-matter record.
pub trait InstanceValidator: fmt::Debug {
    /// Short backend name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Return `Ok(())` when `instance` conforms to the schema.
    fn validate(&self, instance: &Value) -> Result<(), ValidationFailure>;
}

/// Fallback validator: every `required` key must be present.
#[derive(Debug, Clone, Default)]
pub struct RequiredKeysValidator {
    required: Vec<Value>,
}

impl RequiredKeysValidator {
    /// Collect the `required` list of `schema`.
    ///
    /// A non-object schema, or a missing or non-list `required`, yields no
    /// requirements.
    pub fn new(schema: &Value) -> Self {
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Self { required }
    }

    /// Keys the instance must carry, in schema order.
    pub fn required(&self) -> &[Value] {
        &self.required
    }
}

/// Render a `required` entry the way it appears in a failure message.
fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn has_key(instance: &Value, key: &Value) -> bool {
    match instance {
        Value::Object(map) => map.contains_key(&key_label(key)),
        _ => false,
    }
}

impl InstanceValidator for RequiredKeysValidator {
    fn name(&self) -> &'static str {
        "required-keys"
    }

    fn validate(&self, instance: &Value) -> Result<(), ValidationFailure> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|key| !has_key(instance, key))
            .map(key_label)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure::new(format!(
                "missing: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Retriever that never leaves the process.
///
/// Thought-entry schemas are self-contained; any external `$ref` resolves
/// to the permissive schema `{}` so validation never touches the network.
#[cfg(feature = "full-validation")]
struct OfflineRetriever;

#[cfg(feature = "full-validation")]
impl jsonschema::Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &jsonschema::Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        tracing::warn!(uri = uri.as_str(), "unresolved $ref; treating as permissive");
        Ok(serde_json::json!({}))
    }
}

/// Full JSON Schema validator backed by the `jsonschema` crate.
///
/// The schema is compiled once at construction; the draft is detected from
/// `$schema` and defaults to the crate's latest supported draft. A schema
/// that does not compile is kept as its error message, which every
/// subsequent validation reports.
#[cfg(feature = "full-validation")]
pub struct JsonSchemaValidator {
    compiled: Result<jsonschema::Validator, String>,
}

#[cfg(feature = "full-validation")]
impl fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaValidator").finish_non_exhaustive()
    }
}

#[cfg(feature = "full-validation")]
impl JsonSchemaValidator {
    /// Compile `schema`.
    pub fn new(schema: &Value) -> Self {
        let compiled = jsonschema::options()
            .with_retriever(OfflineRetriever)
            .build(schema)
            .map_err(|e| e.to_string());
        if let Err(reason) = &compiled {
            tracing::warn!(%reason, "schema does not compile; every entry will fail");
        }
        Self { compiled }
    }

    /// Why the schema failed to compile, if it did.
    pub fn compile_error(&self) -> Option<&str> {
        self.compiled.as_ref().err().map(String::as_str)
    }
}

#[cfg(feature = "full-validation")]
impl InstanceValidator for JsonSchemaValidator {
    fn name(&self) -> &'static str {
        "jsonschema"
    }

    fn validate(&self, instance: &Value) -> Result<(), ValidationFailure> {
        let compiled = self
            .compiled
            .as_ref()
            .map_err(|reason| ValidationFailure::new(reason.clone()))?;

        let violations: Vec<Violation> = compiled
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure::from_violations(violations))
        }
    }
}
