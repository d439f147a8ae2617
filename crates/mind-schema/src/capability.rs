//! # Capability Negotiation
//!
//! Decides once per run which YAML loader and which validator to use.
//! Full backends are available when their cargo features are compiled in
//! (`full-yaml`, `full-validation`); callers may narrow the selection
//! further, e.g. to reproduce a minimal CI environment.
//!
//! The chosen pair lives in a [`Toolchain`] that is threaded through the
//! run. Every fallback engaged is recorded as a [`Degradation`] so the
//! caller can announce it exactly once.

use std::fmt;

use serde_json::Value;

use crate::naive_yaml::NaiveYamlLoader;
use crate::validate::{InstanceValidator, RequiredKeysValidator};
use crate::yaml::YamlLoader;

/// Which full-featured backends may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Parse YAML with `serde_yaml`.
    pub full_yaml: bool,
    /// Validate with the `jsonschema` crate.
    pub full_validation: bool,
}

impl Capabilities {
    /// Capabilities compiled into this build.
    pub fn detect() -> Self {
        Self {
            full_yaml: cfg!(feature = "full-yaml"),
            full_validation: cfg!(feature = "full-validation"),
        }
    }

    /// Fallback-only capabilities.
    pub fn minimal() -> Self {
        Self {
            full_yaml: false,
            full_validation: false,
        }
    }

    /// Disable the full YAML parser.
    pub fn without_full_yaml(mut self) -> Self {
        self.full_yaml = false;
        self
    }

    /// Disable the full schema validator.
    pub fn without_full_validation(mut self) -> Self {
        self.full_validation = false;
        self
    }
}

/// A fallback engaged during selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    /// YAML is parsed by the naive subset parser.
    NaiveYaml,
    /// Validation only checks required keys.
    RequiredKeysOnly,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NaiveYaml => f.write_str("full YAML parser unavailable; using naive parser."),
            Self::RequiredKeysOnly => f.write_str(
                "JSON Schema validator unavailable; falling back to required check.",
            ),
        }
    }
}

/// Select the YAML loader for `caps`.
///
/// Returns the degradation when the naive parser is chosen.
pub fn select_loader(caps: Capabilities) -> (Box<dyn YamlLoader>, Option<Degradation>) {
    #[cfg(feature = "full-yaml")]
    {
        if caps.full_yaml {
            return (Box::new(crate::yaml::SerdeYamlLoader), None);
        }
    }
    #[cfg(not(feature = "full-yaml"))]
    let _ = caps;

    (Box::new(NaiveYamlLoader), Some(Degradation::NaiveYaml))
}

/// Build the validator for `caps` against `schema`.
///
/// A schema the full validator cannot compile still yields a validator;
/// it rejects every instance with the compile error.
pub fn select_validator(
    caps: Capabilities,
    schema: &Value,
) -> (Box<dyn InstanceValidator>, Option<Degradation>) {
    #[cfg(feature = "full-validation")]
    {
        if caps.full_validation {
            let validator = crate::validate::JsonSchemaValidator::new(schema);
            return (Box::new(validator), None);
        }
    }
    #[cfg(not(feature = "full-validation"))]
    let _ = caps;

    (
        Box::new(RequiredKeysValidator::new(schema)),
        Some(Degradation::RequiredKeysOnly),
    )
}

/// The loader and validator selected for a run.
#[derive(Debug)]
pub struct Toolchain {
    loader: Box<dyn YamlLoader>,
    validator: Box<dyn InstanceValidator>,
    degradations: Vec<Degradation>,
}

impl Toolchain {
    /// Pair an already selected loader with a validator built for `schema`.
    ///
    /// `loader_degradation` is the value returned by [`select_loader`];
    /// degradations are kept in loader, validator order.
    pub fn assemble(
        caps: Capabilities,
        loader: Box<dyn YamlLoader>,
        loader_degradation: Option<Degradation>,
        schema: &Value,
    ) -> Self {
        let (validator, validator_degradation) = select_validator(caps, schema);
        let degradations = loader_degradation
            .into_iter()
            .chain(validator_degradation)
            .collect();

        tracing::debug!(
            loader = loader.name(),
            validator = validator.name(),
            "selected validation backends"
        );

        Self {
            loader,
            validator,
            degradations,
        }
    }

    /// Select both backends for `caps` in one step.
    pub fn select(caps: Capabilities, schema: &Value) -> Self {
        let (loader, degradation) = select_loader(caps);
        Self::assemble(caps, loader, degradation, schema)
    }

    /// The selected YAML loader.
    pub fn loader(&self) -> &dyn YamlLoader {
        self.loader.as_ref()
    }

    /// The selected validator.
    pub fn validator(&self) -> &dyn InstanceValidator {
        self.validator.as_ref()
    }

    /// Fallbacks engaged, in loader then validator order.
    pub fn degradations(&self) -> &[Degradation] {
        &self.degradations
    }
}
