//! Serializer trait and chain.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use snapstore_core::{escape_template, BoxError, Error, Result};

/// Intermediate result flowing through a serializer chain.
///
/// The first serializer receives the raw value; every later one receives
/// whatever its predecessor produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Structured value, not yet turned into text
    Value(Value),
    /// Text produced by a stringifying step
    Text(String),
}

impl Stage {
    /// Cast to text the natural way.
    ///
    /// Strings are taken as-is, every other value becomes compact JSON.
    pub fn into_text(self) -> String {
        match self {
            Stage::Text(text) | Stage::Value(Value::String(text)) => text,
            Stage::Value(value) => value.to_string(),
        }
    }

    /// Borrow the text, if this stage is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Stage::Text(text) => Some(text),
            Stage::Value(_) => None,
        }
    }

    /// Whether this stage is text.
    pub fn is_text(&self) -> bool {
        matches!(self, Stage::Text(_))
    }
}

impl From<String> for Stage {
    fn from(text: String) -> Self {
        Stage::Text(text)
    }
}

impl From<&str> for Stage {
    fn from(text: &str) -> Self {
        Stage::Text(text.to_string())
    }
}

impl From<Value> for Stage {
    fn from(value: Value) -> Self {
        Stage::Value(value)
    }
}

/// One step of a serializer chain.
pub trait Serializer: Send + Sync {
    /// Serializer name for debugging/logging and registry lookup.
    fn name(&self) -> &str;

    /// Transform the previous stage.
    fn serialize(&self, input: Stage) -> std::result::Result<Stage, BoxError>;
}

/// Serializer backed by a closure.
pub struct FnSerializer<F> {
    name: String,
    f: F,
}

impl<F> FnSerializer<F>
where
    F: Fn(Stage) -> std::result::Result<Stage, BoxError> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Serializer for FnSerializer<F>
where
    F: Fn(Stage) -> std::result::Result<Stage, BoxError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn serialize(&self, input: Stage) -> std::result::Result<Stage, BoxError> {
        (self.f)(input)
    }
}

/// Wrap a closure as a shareable serializer.
pub fn serializer_fn<F>(name: impl Into<String>, f: F) -> Arc<dyn Serializer>
where
    F: Fn(Stage) -> std::result::Result<Stage, BoxError> + Send + Sync + 'static,
{
    Arc::new(FnSerializer::new(name, f))
}

/// Ordered sequence of serializers applied as a fold.
///
/// # Example
/// ```
/// use snapstore_serialize::{SerializerChain, Stage};
///
/// let chain = SerializerChain::new()
///     .then("json", |stage| Ok(Stage::Text(stage.into_text())))
///     .then("suffix", |stage| Ok(Stage::Text(stage.into_text() + "!")));
///
/// assert_eq!(chain.serialize(&5).unwrap(), "\n5!\n");
/// ```
#[derive(Clone, Default)]
pub struct SerializerChain {
    serializers: Vec<Arc<dyn Serializer>>,
}

impl SerializerChain {
    /// Create an empty chain (values are cast to text without transform).
    pub fn new() -> Self {
        Self {
            serializers: Vec::new(),
        }
    }

    /// Append a serializer.
    pub fn push(&mut self, serializer: Arc<dyn Serializer>) {
        self.serializers.push(serializer);
    }

    /// Append a serializer, builder style.
    pub fn with(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.push(serializer);
        self
    }

    /// Append a closure, builder style.
    pub fn then<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Stage) -> std::result::Result<Stage, BoxError> + Send + Sync + 'static,
    {
        self.with(serializer_fn(name, f))
    }

    /// Number of serializers.
    pub fn len(&self) -> usize {
        self.serializers.len()
    }

    /// Whether the chain has no serializers.
    pub fn is_empty(&self) -> bool {
        self.serializers.is_empty()
    }

    /// Serializer names, in order.
    pub fn names(&self) -> Vec<&str> {
        self.serializers.iter().map(|s| s.name()).collect()
    }

    /// Serialize any `serde` value into escaped, newline-wrapped snapshot text.
    pub fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let value = serde_json::to_value(value).map_err(|source| Error::ValueConversion {
            type_name: std::any::type_name::<T>(),
            source,
        })?;
        self.serialize_value(value)
    }

    /// Serialize a JSON value into escaped, newline-wrapped snapshot text.
    pub fn serialize_value(&self, value: Value) -> Result<String> {
        let text = self.run(value)?;
        Ok(format!("\n{}\n", escape_template(&text)))
    }

    /// Run the fold and return the raw (unescaped) text.
    pub fn run(&self, input: Value) -> Result<String> {
        if self.serializers.is_empty() {
            return Ok(Stage::Value(input).into_text());
        }

        let mut stage = Stage::Value(input.clone());
        for serializer in &self.serializers {
            trace!("Applying serializer '{}'", serializer.name());
            stage = serializer
                .serialize(stage)
                .map_err(|source| Error::SerializerOutput {
                    input: input.clone(),
                    source: Some(source),
                })?;
        }

        match stage {
            Stage::Text(text) => Ok(text),
            Stage::Value(_) => Err(Error::SerializerOutput {
                input,
                source: None,
            }),
        }
    }
}

impl fmt::Debug for SerializerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
