//! # YAML Loading
//!
//! Parses front matter and schema documents into `serde_json::Value` so
//! both validator backends operate on one value model.
//!
//! Two loaders implement [`YamlLoader`]:
//!
//! - [`SerdeYamlLoader`] delegates to `serde_yaml` and accepts the full YAML
//!   feature set. Only compiled with the `full-yaml` feature.
//! - [`NaiveYamlLoader`](crate::naive_yaml::NaiveYamlLoader) is a
//!   line-oriented subset parser used when the full parser is unavailable.
//!
//! Empty or whitespace-only text loads as an empty mapping, and so does a
//! document whose value is empty or false: `null`, `false`, zero, `""` or
//! `[]`.

use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Parse YAML text into a JSON value.
pub trait YamlLoader: std::fmt::Debug {
    /// Short backend name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Parse `text`, yielding `{}` for empty documents.
    fn load(&self, text: &str) -> Result<Value, SchemaError>;
}

/// Empty mapping returned for blank or null documents.
pub(crate) fn empty_mapping() -> Value {
    Value::Object(Map::new())
}

/// Replace an empty or false document with `{}`.
///
/// Non-empty scalars and lists pass through so the validator can reject
/// them.
pub(crate) fn or_empty_mapping(value: Value) -> Value {
    let blank = match &value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    };
    if blank {
        empty_mapping()
    } else {
        value
    }
}

/// Full YAML parser backed by `serde_yaml`.
#[cfg(feature = "full-yaml")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SerdeYamlLoader;

#[cfg(feature = "full-yaml")]
impl YamlLoader for SerdeYamlLoader {
    fn name(&self) -> &'static str {
        "serde_yaml"
    }

    fn load(&self, text: &str) -> Result<Value, SchemaError> {
        if text.trim().is_empty() {
            return Ok(empty_mapping());
        }

        let document: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| SchemaError::Yaml(e.to_string()))?;
        let value = to_json(document).map_err(SchemaError::Conversion)?;
        Ok(or_empty_mapping(value))
    }
}

/// Rebuild a YAML node as JSON, dropping tags.
#[cfg(feature = "full-yaml")]
fn to_json(node: serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match node {
        Yaml::Null => Value::Null,
        Yaml::Bool(flag) => Value::Bool(flag),
        Yaml::Number(n) => json_number(&n)?,
        Yaml::String(text) => Value::String(text),
        Yaml::Sequence(items) => {
            Value::Array(items.into_iter().map(to_json).collect::<Result<Vec<_>, _>>()?)
        }
        Yaml::Mapping(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, node)| Ok((mapping_key(key)?, to_json(node)?)))
                .collect::<Result<Map<_, _>, String>>()?,
        ),
        Yaml::Tagged(tagged) => to_json(tagged.value)?,
    })
}

#[cfg(feature = "full-yaml")]
fn json_number(n: &serde_yaml::Number) -> Result<Value, String> {
    if let Some(i) = n.as_i64() {
        return Ok(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Ok(u.into());
    }
    n.as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| format!("YAML number {n} has no JSON equivalent"))
}

/// JSON object keys are strings: scalar keys are rendered, others refused.
#[cfg(feature = "full-yaml")]
fn mapping_key(key: serde_yaml::Value) -> Result<String, String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(text) => Ok(text),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(flag) => Ok(flag.to_string()),
        other => Err(format!("mapping key {other:?} is not a scalar")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values_become_empty_mapping() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([])] {
            assert_eq!(or_empty_mapping(value.clone()), json!({}), "{value}");
        }
    }

    #[test]
    fn truthy_values_pass_through() {
        for value in [json!(true), json!(1), json!("x"), json!(["a"]), json!({}), json!({"k": 0})] {
            assert_eq!(or_empty_mapping(value.clone()), value);
        }
    }
}
