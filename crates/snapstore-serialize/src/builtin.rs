//! Built-in serializers.

use serde_json::{Map, Value};

use snapstore_core::BoxError;

use crate::pipeline::{Serializer, Stage};

/// Compact JSON. Text from an earlier step is emitted as a JSON string.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, input: Stage) -> Result<Stage, BoxError> {
        let text = match input {
            Stage::Value(value) => serde_json::to_string(&value)?,
            Stage::Text(text) => serde_json::to_string(&text)?,
        };
        Ok(Stage::Text(text))
    }
}

/// Two-space indented JSON with object keys sorted at every level.
///
/// This is the default chain: it is stable across runs regardless of the
/// order in which a value's fields were produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyJsonSerializer;

impl Serializer for PrettyJsonSerializer {
    fn name(&self) -> &str {
        "json-pretty"
    }

    fn serialize(&self, input: Stage) -> Result<Stage, BoxError> {
        let text = match input {
            Stage::Value(value) => serde_json::to_string_pretty(&sorted(value))?,
            Stage::Text(text) => serde_json::to_string(&text)?,
        };
        Ok(Stage::Text(text))
    }
}

/// Natural string cast.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSerializer;

impl Serializer for StringSerializer {
    fn name(&self) -> &str {
        "string"
    }

    fn serialize(&self, input: Stage) -> Result<Stage, BoxError> {
        Ok(Stage::Text(input.into_text()))
    }
}

/// Trim surrounding whitespace, casting to text first if needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimSerializer;

impl Serializer for TrimSerializer {
    fn name(&self) -> &str {
        "trim"
    }

    fn serialize(&self, input: Stage) -> Result<Stage, BoxError> {
        Ok(Stage::Text(input.into_text().trim().to_string()))
    }
}

fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = Map::new();
            for (key, value) in entries {
                out.insert(key, sorted(value));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}
