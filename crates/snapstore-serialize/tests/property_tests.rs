//! Property-based tests for the serialization pipeline.

use proptest::prelude::*;
use serde_json::Value;

use snapstore_core::{check_template_body, unescape_template};
use snapstore_serialize::{builtin_registry, default_chain, SerializerChain};

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        ".{0,12}".prop_map(Value::String),
        "[`$\\\\{}]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z`$]{1,4}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Serialized output is always a storable literal body wrapped in newlines.
    #[test]
    fn output_is_storable(value in json_value()) {
        for chain in [default_chain(), SerializerChain::new()] {
            let out = chain.serialize_value(value.clone()).unwrap();
            prop_assert!(out.starts_with('\n'));
            prop_assert!(out.ends_with('\n'));
            prop_assert!(check_template_body(&out).is_ok());
        }
    }

    /// Unescaping the output recovers the text the chain produced.
    #[test]
    fn escaping_is_reversible(value in json_value()) {
        let chain = builtin_registry().chain_from_names(&["json"], "serializers").unwrap();
        let out = chain.serialize_value(value.clone()).unwrap();
        let text = chain.run(value).unwrap();
        prop_assert_eq!(unescape_template(&out), format!("\n{text}\n"));
    }

    /// The default chain does not depend on object key order.
    #[test]
    fn default_chain_is_order_independent(pairs in prop::collection::vec(("[a-z]{1,4}", any::<i32>()), 0..6)) {
        let forward: serde_json::Map<String, Value> =
            pairs.iter().map(|(k, v)| (k.clone(), Value::from(*v))).collect();
        let reverse: serde_json::Map<String, Value> =
            pairs.iter().rev().map(|(k, v)| (k.clone(), Value::from(*v))).collect();

        // Later duplicates win in each map, so compare only when keys are unique
        let mut keys: Vec<&String> = pairs.iter().map(|(k, _)| k).collect();
        keys.sort();
        keys.dedup();
        prop_assume!(keys.len() == pairs.len());

        let chain = default_chain();
        prop_assert_eq!(
            chain.serialize_value(Value::Object(forward)).unwrap(),
            chain.serialize_value(Value::Object(reverse)).unwrap()
        );
    }
}
