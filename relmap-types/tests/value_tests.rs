use pretty_assertions::assert_eq;
use relmap_types::{Error, SqlExpression, Value};
use serde_json::json;
use std::collections::BTreeMap;

// ── Accessors ─────────────────────────────────────────────────────

#[test]
fn default_is_null() {
    assert!(Value::default().is_null());
}

#[test]
fn expr_is_detected() {
    let v = Value::from(SqlExpression::new("NOW()"));
    assert!(v.is_expr());
    assert_eq!(v.as_expr().map(SqlExpression::as_str), Some("NOW()"));
}

#[test]
fn containers_are_detected() {
    assert!(Value::empty_list().is_container());
    assert!(Value::Map(BTreeMap::new()).is_container());
    assert!(!Value::from("a").is_container());
}

#[test]
fn as_f64_widens_ints() {
    assert_eq!(Value::Int(3).as_f64(), Some(3.0));
    assert_eq!(Value::Float(1.5).as_f64(), Some(1.5));
    assert_eq!(Value::from("x").as_f64(), None);
}

#[test]
fn as_bytes_covers_text_and_bytes() {
    assert_eq!(Value::from("ab").as_bytes(), Some(&b"ab"[..]));
    assert_eq!(Value::from(vec![1u8, 2]).as_bytes(), Some(&[1u8, 2][..]));
    assert_eq!(Value::Int(1).as_bytes(), None);
}

#[test]
fn option_conversion() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some(4i64)), Value::Int(4));
}

// ── JSON conversion ───────────────────────────────────────────────

#[test]
fn nested_value_to_json() {
    let mut map = BTreeMap::new();
    map.insert("tags".to_string(), Value::List(vec!["a".into(), "b".into()]));
    map.insert("count".to_string(), Value::Int(2));
    map.insert("ratio".to_string(), Value::Float(0.5));
    map.insert("done".to_string(), Value::Bool(false));
    map.insert("note".to_string(), Value::Null);

    let json = Value::Map(map).to_json().unwrap();
    assert_eq!(
        json,
        json!({"tags": ["a", "b"], "count": 2, "ratio": 0.5, "done": false, "note": null})
    );
}

#[test]
fn from_json_keeps_int_and_float_apart() {
    let v = Value::from_json(json!([1, 1.0, -7, 2.5]));
    assert_eq!(
        v,
        Value::List(vec![
            Value::Int(1),
            Value::Float(1.0),
            Value::Int(-7),
            Value::Float(2.5)
        ])
    );
}

#[test]
fn huge_unsigned_becomes_float() {
    let v = Value::from_json(json!(u64::MAX));
    assert!(matches!(v, Value::Float(_)));
}

#[test]
fn bytes_are_not_json() {
    let err = Value::List(vec![Value::Bytes(vec![0xff])]).to_json().unwrap_err();
    assert!(matches!(err, Error::Unrepresentable(_)));
    assert!(err.to_string().contains("bytes"));
}

#[test]
fn expressions_are_not_json() {
    let err = Value::Expr("NOW()".into()).to_json().unwrap_err();
    assert!(err.to_string().contains("expression"));
}

#[test]
fn non_finite_float_is_not_json() {
    assert!(Value::Float(f64::NAN).to_json().is_err());
    assert!(Value::Float(f64::INFINITY).to_json().is_err());
}

#[test]
fn type_names() {
    assert_eq!(Value::Null.type_name(), "null");
    assert_eq!(Value::empty_list().type_name(), "list");
    assert_eq!(Value::Bytes(vec![]).type_name(), "bytes");
}
