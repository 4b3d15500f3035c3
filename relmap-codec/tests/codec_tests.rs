use pretty_assertions::assert_eq;
use relmap_codec::{json, native, random_bytes, text_safe, CodecError, DEFAULT_SECRET_LENGTH};
use relmap_types::{SqlExpression, Value};
use std::collections::BTreeMap;

fn sample_map() -> Value {
    let mut map = BTreeMap::new();
    map.insert("a".to_string(), Value::Int(1));
    map.insert("b".to_string(), Value::List(vec![Value::from("x"), Value::Null]));
    Value::Map(map)
}

// ── json ─────────────────────────────────────────────────────────

#[test]
fn json_is_compact() {
    assert_eq!(json::encode(&sample_map()).unwrap(), r#"{"a":1,"b":["x",null]}"#);
}

#[test]
fn json_list_roundtrip() {
    let v = Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    let text = json::encode(&v).unwrap();
    assert_eq!(text, "[1,2,3]");
    assert_eq!(json::decode(&text).unwrap(), v);
}

#[test]
fn json_rejects_bytes() {
    let err = json::encode(&Value::List(vec![Value::Bytes(vec![1, 2])])).unwrap_err();
    assert!(matches!(err, CodecError::Unrepresentable { format: "json", .. }));
}

#[test]
fn json_rejects_expressions() {
    let err = json::encode(&Value::Expr(SqlExpression::new("NOW()"))).unwrap_err();
    assert!(err.to_string().contains("json"));
}

#[test]
fn json_decode_invalid_text() {
    let err = json::decode("{not json").unwrap_err();
    assert!(matches!(err, CodecError::Json(_)));
}

// ── native ───────────────────────────────────────────────────────

#[test]
fn native_roundtrip_keeps_bytes() {
    let v = Value::List(vec![Value::Bytes(vec![0, 255, 7]), sample_map()]);
    let text = native::encode(&v).unwrap();
    assert_eq!(native::decode(&text).unwrap(), v);
}

#[test]
fn native_output_is_text_safe() {
    let text = native::encode(&sample_map()).unwrap();
    assert!(text.chars().all(|c| c.is_ascii_alphanumeric() || "+/=".contains(c)));
}

#[test]
fn native_decode_rejects_garbage() {
    assert!(matches!(
        native::decode("***").unwrap_err(),
        CodecError::InvalidEncoding(_)
    ));
}

#[test]
fn native_decode_rejects_truncated_payload() {
    let text = native::encode(&Value::from("hello world")).unwrap();
    let bytes = text_safe::decode(&text).unwrap();
    let truncated = text_safe::encode(&bytes[..bytes.len() / 2]);
    assert!(matches!(
        native::decode(&truncated).unwrap_err(),
        CodecError::Native(_)
    ));
}

// ── text_safe ────────────────────────────────────────────────────

#[test]
fn text_safe_known_vector() {
    assert_eq!(text_safe::encode(b"hello"), "aGVsbG8=");
    assert_eq!(text_safe::decode("aGVsbG8=").unwrap(), b"hello");
}

#[test]
fn text_safe_empty() {
    assert_eq!(text_safe::encode(b""), "");
    assert!(text_safe::decode("").unwrap().is_empty());
}

#[test]
fn text_safe_invalid_input() {
    let err = text_safe::decode("not base64!").unwrap_err();
    assert!(err.to_string().contains("invalid base64"));
}

// ── secret ───────────────────────────────────────────────────────

#[test]
fn random_bytes_has_requested_length() {
    assert_eq!(random_bytes(DEFAULT_SECRET_LENGTH).len(), 20);
    assert_eq!(random_bytes(64).len(), 64);
    assert!(random_bytes(0).is_empty());
}

#[test]
fn random_bytes_differ() {
    assert_ne!(random_bytes(32), random_bytes(32));
}
