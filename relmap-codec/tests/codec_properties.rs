//! Property-based tests for the codecs.
//!
//! These verify the round-trip guarantees array and secret fields rely on:
//! - Any JSON-representable value survives encode → decode
//! - The native codec preserves every value, binary data included
//! - Text-safe encoding is lossless for arbitrary bytes

use proptest::prelude::*;
use relmap_codec::{json, native, text_safe};
use relmap_types::Value;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e12f64..1.0e12f64).prop_map(Value::Float),
        "[ -~]{0,24}".prop_map(Value::Text),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::List),
            prop::collection::btree_map("[a-zA-Z_]{1,12}", inner, 0..8).prop_map(Value::Map),
        ]
    })
}

fn any_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        json_leaf(),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(Value::Bytes),
        any::<f64>()
            .prop_filter("NaN never equals itself", |f| !f.is_nan())
            .prop_map(Value::Float),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6).prop_map(Value::Map),
        ]
    })
}

// =============================================================================
// ROUND-TRIP PROPERTIES
// =============================================================================

proptest! {
    /// decode(encode(v)) == v for every JSON-representable value
    #[test]
    fn json_roundtrip(value in json_value()) {
        let text = json::encode(&value).unwrap();
        prop_assert_eq!(json::decode(&text).unwrap(), value);
    }

    /// JSON output never carries insignificant whitespace outside strings
    #[test]
    fn json_has_no_padding(items in prop::collection::vec(any::<i64>(), 0..16)) {
        let value = Value::List(items.into_iter().map(Value::Int).collect());
        let text = json::encode(&value).unwrap();
        prop_assert!(!text.contains(' '));
    }

    /// The native codec preserves every non-NaN value
    #[test]
    fn native_roundtrip(value in any_value()) {
        let text = native::encode(&value).unwrap();
        prop_assert_eq!(native::decode(&text).unwrap(), value);
    }

    /// Base64 is lossless for arbitrary binary data
    #[test]
    fn text_safe_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let encoded = text_safe::encode(&bytes);
        prop_assert_eq!(text_safe::decode(&encoded).unwrap(), bytes);
    }
}
