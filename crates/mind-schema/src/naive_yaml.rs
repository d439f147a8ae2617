//! # Naive YAML Subset Parser
//!
//! Fallback loader for environments built without the full YAML parser.
//! Understands exactly the shapes thought entries use:
//!
//! ```yaml
//! title: "A scalar"
//! tags: [inline, list]
//! related:
//!   - block
//!   - list
//! ```
//!
//! Everything else (nested mappings, multi-line scalars, anchors, tags) is
//! silently skipped or flattened. The parser never fails.

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::frontmatter::lines_inclusive;
use crate::yaml::YamlLoader;

/// Line-oriented parser for the flat key/scalar/list subset of YAML.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaiveYamlLoader;

impl YamlLoader for NaiveYamlLoader {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn load(&self, text: &str) -> Result<Value, SchemaError> {
        Ok(Value::Object(parse_flat(text)))
    }
}

/// Strip any run of single or double quotes from both ends.
fn strip_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '\'' || c == '"')
}

/// Parse `text` into a flat mapping of scalars and string lists.
pub fn parse_flat(text: &str) -> Map<String, Value> {
    let mut result = Map::new();
    // Key of the block list currently accepting `- item` lines.
    let mut current_list: Option<String> = None;

    for raw_line in lines_inclusive(text) {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(item) = line.strip_prefix("- ") {
            if let Some(Value::Array(items)) =
                current_list.as_ref().and_then(|key| result.get_mut(key))
            {
                items.push(Value::String(strip_quotes(item.trim()).to_string()));
                continue;
            }
        }
        if line.starts_with('-') || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_string();
        let value = value.trim();

        if value.is_empty() {
            result.insert(key.clone(), Value::Array(Vec::new()));
            current_list = Some(key).filter(|k| !k.is_empty());
        } else if value.starts_with('[') && value.ends_with(']') {
            let items = value[1..value.len() - 1]
                .split(',')
                .filter(|item| !item.trim().is_empty())
                .map(|item| Value::String(strip_quotes(item.trim()).to_string()))
                .collect();
            result.insert(key, Value::Array(items));
            current_list = None;
        } else {
            result.insert(key, Value::String(strip_quotes(value).to_string()));
            current_list = None;
        }
    }

    result
}
