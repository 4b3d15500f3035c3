mod common;

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use relmap_data::{AddResult, Identifier, OperationError, OperationResult, PrimaryKey, UpdateResult};
use relmap_db::SqliteConnection;
use relmap_types::Value;

use common::{capture, warnings};

fn failed() -> OperationResult {
    let mut result = OperationResult::new();
    result.add_error("a");
    result.add_error(OperationError::for_field("TITLE", "b"));
    result
}

// ── Unobserved failures ──────────────────────────────────────────

#[test]
fn dropping_unobserved_failure_warns_with_joined_messages() {
    let events = capture(|| {
        let result = failed();
        drop(result);
    });
    let warns = warnings(&events);
    assert_eq!(warns.len(), 1);
    assert_eq!(warns[0].field("messages"), Some("a; b"));
    assert_eq!(warns[0].field("error_count"), Some("2"));
}

#[test]
fn checking_success_suppresses_the_warning() {
    let events = capture(|| {
        let result = failed();
        assert!(!result.is_success());
        assert!(result.is_observed());
    });
    assert!(warnings(&events).is_empty());
}

#[test]
fn reading_errors_suppresses_the_warning() {
    let events = capture(|| {
        let result = failed();
        assert_eq!(result.errors().len(), 2);
        assert_eq!(result.errors()[1].field(), Some("TITLE"));
    });
    assert!(warnings(&events).is_empty());

    let events = capture(|| {
        let result = failed();
        assert_eq!(result.error_messages(), vec!["a".to_string(), "b".to_string()]);
    });
    assert!(warnings(&events).is_empty());
}

#[test]
fn internal_success_check_does_not_count_as_observation() {
    let events = capture(|| {
        let result = failed();
        assert!(!result.is_success_internal());
        assert!(!result.is_observed());
    });
    assert_eq!(warnings(&events).len(), 1);
}

#[test]
fn successful_results_never_warn() {
    let events = capture(|| {
        let mut result = OperationResult::new();
        result.insert_data("TITLE", "hello");
        drop(result);
    });
    assert!(warnings(&events).is_empty());
}

// ── finish ───────────────────────────────────────────────────────

#[test]
fn finish_warns_once_and_returns_errors() {
    let events = capture(|| {
        let errors = failed().finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message(), "a");
    });
    assert_eq!(warnings(&events).len(), 1);
}

#[test]
fn finish_returns_data_on_success() {
    let mut result = OperationResult::new();
    result.insert_data("TITLE", "hello");
    let data = result.finish().unwrap();
    assert_eq!(data.get("TITLE"), Some(&Value::from("hello")));
}

#[test]
fn add_errors_accepts_mixed_sources() {
    let mut result = OperationResult::new();
    result.add_errors(vec!["x", "y"]);
    result.add_error(OperationError::new("z").with_code("Z_CODE"));
    assert_eq!(result.error_messages(), vec!["x", "y", "z"]);
    assert_eq!(result.errors()[2].code(), Some("Z_CODE"));
}

// ── AddResult ────────────────────────────────────────────────────

#[test]
fn add_result_single_id() {
    let mut result = AddResult::new();
    result.set_id(7);
    assert_eq!(result.id(), Some(Identifier::Single(Value::Int(7))));
    assert_eq!(result.primary().get("ID"), Some(&Value::Int(7)));
    assert!(result.is_success());
}

#[test]
fn add_result_composite_id() {
    let mut result = AddResult::new();
    result.set_primary(PrimaryKey::from_iter([("A", 1), ("B", 2)]));
    let mut expected = BTreeMap::new();
    expected.insert("A".to_string(), Value::Int(1));
    expected.insert("B".to_string(), Value::Int(2));
    assert_eq!(result.id(), Some(Identifier::Composite(expected)));
}

#[test]
fn add_result_without_key_has_no_id() {
    let result = AddResult::new();
    assert_eq!(result.id(), None);
    assert!(result.finish().unwrap().is_empty());
}

#[test]
fn add_result_drop_warns_through_base() {
    let events = capture(|| {
        let mut result = AddResult::new();
        result.add_error("duplicate key");
        drop(result);
    });
    let warns = warnings(&events);
    assert_eq!(warns.len(), 1);
    assert_eq!(warns[0].field("messages"), Some("duplicate key"));
}

#[test]
fn add_result_finish_returns_primary() {
    let mut result = AddResult::new();
    result.set_id(42);
    assert_eq!(result.finish().unwrap(), PrimaryKey::id(42));
}

// ── UpdateResult ─────────────────────────────────────────────────

#[test]
fn update_result_reads_affected_rows_from_connection() {
    let conn = SqliteConnection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE t (ID INTEGER PRIMARY KEY, NAME TEXT);
         INSERT INTO t (NAME) VALUES ('a'), ('b'), ('c');",
    )
    .unwrap();
    conn.execute("UPDATE t SET NAME = 'z' WHERE ID >= 2").unwrap();

    let mut result = UpdateResult::new();
    result.set_primary(PrimaryKey::id(2));
    result.set_affected_rows_count(&conn);
    assert_eq!(result.affected_rows_count(), 2);
    assert_eq!(result.id(), Some(Identifier::Single(Value::Int(2))));
    assert_eq!(result.finish().unwrap(), 2);
}

#[test]
fn update_result_failure_finish_returns_errors() {
    let events = capture(|| {
        let mut result = UpdateResult::new();
        result.add_error("stale row");
        assert!(!result.is_success());
        let errors = result.finish().unwrap_err();
        assert_eq!(errors, vec![OperationError::new("stale row")]);
    });
    assert!(warnings(&events).is_empty());
}
