//! SQL dialect helpers.

/// Dialect-specific SQL rendering used by fields and operators.
///
/// Implementations must be pure: every method maps its input to SQL text
/// without touching connection state.
pub trait SqlHelper: Send + Sync {
    /// Name of the dialect.
    fn dialect_name(&self) -> &'static str;

    /// Quotes an identifier (table, column or alias).
    fn quote(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }

    /// Escapes a string for use inside a single-quoted literal.
    fn escape(&self, value: &str) -> String {
        value.replace('\'', "''")
    }

    /// Renders a string as a quoted SQL literal.
    fn convert_to_db_string(&self, value: &str) -> String {
        format!("'{}'", self.escape(value))
    }

    /// Normalizes a string read back from the database.
    fn convert_from_db_string(&self, value: &str) -> String {
        value.to_string()
    }

    /// Builds a full-text match predicate.
    fn match_function(&self, column_sql: &str, value_sql: &str) -> String;
}

// ─── SQLite ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteHelper;

impl SqlHelper for SqliteHelper {
    fn dialect_name(&self) -> &'static str {
        "SQLite"
    }

    fn match_function(&self, column_sql: &str, value_sql: &str) -> String {
        format!("{column_sql} MATCH {value_sql}")
    }
}

// ─── MySQL ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlHelper;

impl SqlHelper for MySqlHelper {
    fn dialect_name(&self) -> &'static str {
        "MySQL"
    }

    fn quote(&self, identifier: &str) -> String {
        format!("`{}`", identifier.replace('`', "``"))
    }

    /// Backslash escaping, matching `mysql_real_escape_string`.
    fn escape(&self, value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\0' => escaped.push_str("\\0"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\\' => escaped.push_str("\\\\"),
                '\'' => escaped.push_str("\\'"),
                '"' => escaped.push_str("\\\""),
                '\x1a' => escaped.push_str("\\Z"),
                _ => escaped.push(c),
            }
        }
        escaped
    }

    fn match_function(&self, column_sql: &str, value_sql: &str) -> String {
        format!("MATCH ({column_sql}) AGAINST ({value_sql} IN BOOLEAN MODE)")
    }
}
