//! Name-based serializer lookup.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;

use snapstore_core::{Error, Result};

use crate::builtin::{JsonSerializer, PrettyJsonSerializer, StringSerializer, TrimSerializer};
use crate::pipeline::{Serializer, SerializerChain};

lazy_static! {
    static ref BUILTIN: SerializerRegistry = SerializerRegistry::builtin();
}

/// Registry of the built-in serializers.
pub fn builtin_registry() -> &'static SerializerRegistry {
    &BUILTIN
}

/// The chain used when a manager is not given one.
pub fn default_chain() -> SerializerChain {
    SerializerChain::new().with(Arc::new(PrettyJsonSerializer))
}

/// Serializers addressable by name, e.g. from a configuration file.
#[derive(Clone, Default)]
pub struct SerializerRegistry {
    serializers: BTreeMap<String, Arc<dyn Serializer>>,
}

impl SerializerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `json`, `json-pretty`, `string` and `trim`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonSerializer));
        registry.register(Arc::new(PrettyJsonSerializer));
        registry.register(Arc::new(StringSerializer));
        registry.register(Arc::new(TrimSerializer));
        registry
    }

    /// Register a serializer under its own name, replacing any previous one.
    pub fn register(&mut self, serializer: Arc<dyn Serializer>) {
        self.serializers
            .insert(serializer.name().to_string(), serializer);
    }

    /// Look a serializer up by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Serializer>> {
        self.serializers.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.serializers.keys().map(String::as_str).collect()
    }

    /// Build a chain from names.
    ///
    /// `arg_name` is used in the error, e.g. `options.serializers` yields
    /// `options.serializers[1]` when the second name is unknown.
    pub fn chain_from_names<S: AsRef<str>>(
        &self,
        names: &[S],
        arg_name: &str,
    ) -> Result<SerializerChain> {
        let mut chain = SerializerChain::new();
        for (i, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let serializer = self.get(name).ok_or_else(|| {
                Error::invalid_arg_type(
                    format!("{arg_name}[{i}]"),
                    format!("one of the registered serializers ({})", self.names().join(", ")),
                    format!("'{name}'"),
                )
            })?;
            chain.push(serializer);
        }
        Ok(chain)
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Stage;

    #[test]
    fn test_builtin_names() {
        assert_eq!(
            builtin_registry().names(),
            vec!["json", "json-pretty", "string", "trim"]
        );
    }

    #[test]
    fn test_default_chain() {
        let chain = default_chain();
        assert_eq!(chain.names(), vec![snapstore_core::DEFAULT_SERIALIZER]);
        assert!(builtin_registry().get(snapstore_core::DEFAULT_SERIALIZER).is_some());
        assert_eq!(
            chain.serialize(&serde_json::json!({"baz": 2, "bar": 1})).unwrap(),
            "\n{\n  \"bar\": 1,\n  \"baz\": 2\n}\n"
        );
    }

    #[test]
    fn test_chain_from_names() {
        let chain = builtin_registry()
            .chain_from_names(&["string", "trim"], "serializers")
            .unwrap();
        assert_eq!(chain.serialize("  padded  ").unwrap(), "\npadded\n");
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = builtin_registry()
            .chain_from_names(&["json", "yaml"], "options.serializers")
            .unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_ARG_TYPE");
        assert!(err
            .to_string()
            .starts_with("The \"options.serializers[1]\" property must be"));
    }

    #[test]
    fn test_register_custom() {
        let mut registry = SerializerRegistry::builtin();
        registry.register(crate::serializer_fn("upper", |stage: Stage| {
            Ok(Stage::Text(stage.into_text().to_uppercase()))
        }));

        let chain = registry.chain_from_names(&["upper"], "serializers").unwrap();
        assert_eq!(chain.serialize("abc").unwrap(), "\nABC\n");
        assert_eq!(registry.names().len(), 5);
    }
}
