use pretty_assertions::assert_eq;
use relmap_db::{MySqlHelper, SqlHelper, SqliteHelper};

// ── SQLite ───────────────────────────────────────────────────────

#[test]
fn sqlite_quotes_identifiers() {
    assert_eq!(SqliteHelper.quote("ID"), "\"ID\"");
    assert_eq!(SqliteHelper.quote("we\"ird"), "\"we\"\"ird\"");
}

#[test]
fn sqlite_string_literal_doubles_quotes() {
    assert_eq!(SqliteHelper.convert_to_db_string("O'Brien"), "'O''Brien'");
    assert_eq!(SqliteHelper.convert_to_db_string(""), "''");
}

#[test]
fn sqlite_from_db_is_passthrough() {
    assert_eq!(SqliteHelper.convert_from_db_string("a'b"), "a'b");
}

#[test]
fn sqlite_match() {
    assert_eq!(
        SqliteHelper.match_function("\"BODY\"", "'rust'"),
        "\"BODY\" MATCH 'rust'"
    );
}

// ── MySQL ────────────────────────────────────────────────────────

#[test]
fn mysql_quotes_with_backticks() {
    assert_eq!(MySqlHelper.quote("TITLE"), "`TITLE`");
    assert_eq!(MySqlHelper.quote("a`b"), "`a``b`");
}

#[test]
fn mysql_escapes_with_backslashes() {
    assert_eq!(MySqlHelper.convert_to_db_string("it's"), "'it\\'s'");
    assert_eq!(MySqlHelper.escape("a\\b\nc"), "a\\\\b\\nc");
    assert_eq!(MySqlHelper.escape("\0\x1a"), "\\0\\Z");
}

#[test]
fn mysql_match_uses_boolean_mode() {
    assert_eq!(
        MySqlHelper.match_function("`BODY`", "'+rust'"),
        "MATCH (`BODY`) AGAINST ('+rust' IN BOOLEAN MODE)"
    );
}

#[test]
fn dialect_names() {
    assert_eq!(SqliteHelper.dialect_name(), "SQLite");
    assert_eq!(MySqlHelper.dialect_name(), "MySQL");
}

#[test]
fn helpers_are_object_safe() {
    let helpers: Vec<Box<dyn SqlHelper>> = vec![Box::new(SqliteHelper), Box::new(MySqlHelper)];
    let quoted: Vec<String> = helpers.iter().map(|h| h.quote("X")).collect();
    assert_eq!(quoted, vec!["\"X\"".to_string(), "`X`".to_string()]);
}
