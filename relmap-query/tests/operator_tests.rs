use pretty_assertions::assert_eq;
use proptest::prelude::*;
use relmap_db::{Connection, MySqlHelper, SqlHelper, SqliteConnection, SqliteHelper};
use relmap_query::{Operand, Operator, QueryError};
use relmap_types::{SqlExpression, Value};

fn compile(op: Operator, column: &str, operand: Operand) -> String {
    op.compile(&SqliteHelper, column, &operand)
}

// ── Rendering ────────────────────────────────────────────────────

#[test]
fn null_marker_rewrites_equality() {
    assert_eq!(compile(Operator::Eq, "col", Operand::Null), "col IS NULL");
    assert_eq!(compile(Operator::Neq, "col", Operand::Null), "col IS NOT NULL");
    assert_eq!(compile(Operator::Eq, "col", "5".into()), "col = 5");
    assert_eq!(compile(Operator::Neq, "col", "5".into()), "col <> 5");
}

#[test]
fn ordering_is_verbatim() {
    assert_eq!(compile(Operator::Lt, "a", "1".into()), "a < 1");
    assert_eq!(compile(Operator::Lte, "a", "1".into()), "a <= 1");
    assert_eq!(compile(Operator::Gt, "a", "1".into()), "a > 1");
    assert_eq!(compile(Operator::Gte, "a", "1".into()), "a >= 1");
}

#[test]
fn in_joins_with_commas() {
    assert_eq!(
        compile(Operator::In, "col", Operand::list(["1", "2", "3"])),
        "col IN (1, 2, 3)"
    );
    assert_eq!(compile(Operator::In, "col", "7".into()), "col IN (7)");
}

#[test]
fn between_takes_a_pair() {
    assert_eq!(
        compile(Operator::Between, "col", Operand::range("1", "10")),
        "col BETWEEN 1 AND 10"
    );
}

#[test]
fn like_exists_expr() {
    assert_eq!(compile(Operator::Like, "NAME", "'a%'".into()), "NAME LIKE 'a%'");
    assert_eq!(
        compile(Operator::Exists, "ignored", "SELECT 1 FROM t".into()),
        "EXISTS (SELECT 1 FROM t)"
    );
    assert_eq!(compile(Operator::Expr, "A + B > 2", "x".into()), "A + B > 2");
    assert_eq!(compile(Operator::Expr, "A", Operand::Null), "A");
}

#[test]
fn match_delegates_to_dialect() {
    let operand = Operand::sql("'rust'");
    assert_eq!(
        Operator::Match.compile(&SqliteHelper, "BODY", &operand),
        "BODY MATCH 'rust'"
    );
    assert_eq!(
        Operator::Match.compile(&MySqlHelper, "BODY", &operand),
        "MATCH (BODY) AGAINST ('rust' IN BOOLEAN MODE)"
    );
}

// ── Registry ─────────────────────────────────────────────────────

#[test]
fn registry_lists_every_token() {
    let tokens: Vec<&str> = Operator::all().iter().map(|(t, _)| *t).collect();
    assert_eq!(
        tokens,
        vec![
            "=", "<>", "!=", "<", "<=", ">", ">=", "in", "between", "like", "exists", "match",
            "expr"
        ]
    );
    for (token, op) in Operator::all() {
        assert_eq!(token.parse::<Operator>().unwrap(), *op);
    }
}

#[test]
fn parsing_is_case_insensitive_for_words() {
    assert_eq!("IN".parse::<Operator>().unwrap(), Operator::In);
    assert_eq!(" Between ".parse::<Operator>().unwrap(), Operator::Between);
    assert_eq!("!=".parse::<Operator>().unwrap(), Operator::Neq);
    assert_eq!(Operator::Neq.to_string(), "<>");
}

#[test]
fn unknown_token() {
    let err = "~~".parse::<Operator>().unwrap_err();
    assert!(matches!(err, QueryError::UnknownOperator(ref t) if t == "~~"));
}

#[test]
fn operand_shapes() {
    assert!(Operator::Between.accepts(&Operand::range("1", "2")));
    assert!(!Operator::Between.accepts(&Operand::sql("1")));
    assert!(!Operator::Between.accepts(&Operand::list(["1"])));
    assert!(Operator::In.accepts(&Operand::list(["1"])));
    assert!(!Operator::In.accepts(&Operand::list(Vec::<String>::new())));
    assert!(Operator::Eq.accepts(&Operand::Null));
    assert!(!Operator::Lt.accepts(&Operand::Null));
    assert!(Operator::Expr.accepts(&Operand::Null));
}

// ── Operands from values ─────────────────────────────────────────

#[test]
fn operands_from_values() {
    let helper = SqliteHelper;
    assert_eq!(Operand::from_value(&helper, &Value::Null).unwrap(), Operand::Null);
    assert_eq!(
        Operand::from_value(&helper, &Value::Text("O'Hara".into())).unwrap(),
        Operand::sql("'O''Hara'")
    );
    assert_eq!(
        Operand::from_value(&helper, &Value::List(vec![Value::Int(1), Value::Bool(true)]))
            .unwrap(),
        Operand::list(["1", "1"])
    );
    assert_eq!(
        Operand::from_value(&helper, &Value::Expr(SqlExpression::new("NOW()"))).unwrap(),
        Operand::sql("NOW()")
    );
    assert!(matches!(
        Operand::from_value(&helper, &Value::Bytes(vec![1])),
        Err(QueryError::Unrenderable("bytes"))
    ));
}

// ── Execution against SQLite ─────────────────────────────────────

fn count_where(conn: &SqliteConnection, predicate: &str) -> i64 {
    conn.query_scalar(&format!("SELECT COUNT(*) FROM item WHERE {predicate}"))
        .unwrap()
}

#[test]
fn predicates_run_on_sqlite() {
    let conn = SqliteConnection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE item (ID INTEGER PRIMARY KEY, NAME TEXT, PARENT INTEGER);
         INSERT INTO item (ID, NAME, PARENT) VALUES
            (1, 'apple', NULL), (2, 'apricot', 1), (3, 'banana', 1), (4, 'cherry', NULL);",
    )
    .unwrap();
    let helper = conn.sql_helper();
    let column = helper.quote("PARENT");

    let is_null = Operator::Eq.compile(helper, &column, &Operand::Null);
    assert_eq!(count_where(&conn, &is_null), 2);

    let not_null = Operator::Neq.compile(helper, &column, &Operand::Null);
    assert_eq!(count_where(&conn, &not_null), 2);

    let ids = Operand::from_value(helper, &Value::List(vec![Value::Int(1), Value::Int(3)])).unwrap();
    let in_list = Operator::In.compile(helper, "ID", &ids);
    assert_eq!(count_where(&conn, &in_list), 2);

    let between = Operator::Between.compile(helper, "ID", &Operand::range("2", "4"));
    assert_eq!(count_where(&conn, &between), 3);

    let pattern = Operand::from_value(helper, &Value::Text("ap%".into())).unwrap();
    let like = Operator::Like.compile(helper, "NAME", &pattern);
    assert_eq!(count_where(&conn, &like), 2);

    let exists = Operator::Exists.compile(
        helper,
        "",
        &Operand::sql("SELECT 1 FROM item child WHERE child.PARENT = item.ID"),
    );
    assert_eq!(count_where(&conn, &exists), 1);
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn in_lists_every_item_in_order(items in prop::collection::vec(0i64..1000, 1..20)) {
        let rendered: Vec<String> = items.iter().map(|i| i.to_string()).collect();
        let sql = Operator::In.compile(&SqliteHelper, "c", &Operand::list(rendered.clone()));
        prop_assert_eq!(sql, format!("c IN ({})", rendered.join(", ")));
    }

    #[test]
    fn expr_is_identity(column in "[A-Z_]{1,12}") {
        prop_assert_eq!(Operator::Expr.compile(&SqliteHelper, &column, &Operand::Null), column);
    }
}
