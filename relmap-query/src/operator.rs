//! Filter operators.

use std::fmt;
use std::str::FromStr;

use relmap_db::SqlHelper;

use crate::{Operand, QueryError};

/// A comparison operator that compiles to SQL predicate text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Between,
    Like,
    Exists,
    Match,
    /// Returns the column fragment unchanged.
    Expr,
}

const REGISTRY: [(&str, Operator); 13] = [
    ("=", Operator::Eq),
    ("<>", Operator::Neq),
    ("!=", Operator::Neq),
    ("<", Operator::Lt),
    ("<=", Operator::Lte),
    (">", Operator::Gt),
    (">=", Operator::Gte),
    ("in", Operator::In),
    ("between", Operator::Between),
    ("like", Operator::Like),
    ("exists", Operator::Exists),
    ("match", Operator::Match),
    ("expr", Operator::Expr),
];

impl Operator {
    /// Every accepted token with its operator, in registry order.
    pub fn all() -> &'static [(&'static str, Operator)] {
        &REGISTRY
    }

    /// Canonical token.
    pub fn token(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::In => "in",
            Self::Between => "between",
            Self::Like => "like",
            Self::Exists => "exists",
            Self::Match => "match",
            Self::Expr => "expr",
        }
    }

    /// Whether the operand has the shape this operator expects.
    pub fn accepts(self, operand: &Operand) -> bool {
        match (self, operand) {
            (Self::Expr, _) => true,
            (Self::Eq | Self::Neq, Operand::Null | Operand::Sql(_)) => true,
            (Self::In, Operand::Sql(_)) => true,
            (Self::In, Operand::List(items)) => !items.is_empty(),
            (Self::Between, Operand::List(items)) => items.len() == 2,
            (
                Self::Lt | Self::Lte | Self::Gt | Self::Gte | Self::Like | Self::Exists | Self::Match,
                Operand::Sql(_),
            ) => true,
            _ => false,
        }
    }

    /// Builds the predicate for `column` against `operand`.
    ///
    /// Callers check the operand shape with [`accepts`](Self::accepts);
    /// a mismatched shape still renders, with missing parts as `NULL`.
    pub fn compile<H: SqlHelper + ?Sized>(self, helper: &H, column: &str, operand: &Operand) -> String {
        debug_assert!(
            self.accepts(operand),
            "operator `{}` does not accept {:?}",
            self.token(),
            operand
        );
        match self {
            Self::Eq if operand.is_null() => format!("{column} IS NULL"),
            Self::Neq if operand.is_null() => format!("{column} IS NOT NULL"),
            Self::Eq => format!("{column} = {operand}"),
            Self::Neq => format!("{column} <> {operand}"),
            Self::Lt => format!("{column} < {operand}"),
            Self::Lte => format!("{column} <= {operand}"),
            Self::Gt => format!("{column} > {operand}"),
            Self::Gte => format!("{column} >= {operand}"),
            Self::In => format!("{column} IN ({operand})"),
            Self::Between => {
                let items = operand.items();
                let low = items.first().copied().unwrap_or("NULL");
                let high = items.get(1).copied().unwrap_or("NULL");
                format!("{column} BETWEEN {low} AND {high}")
            }
            Self::Like => format!("{column} LIKE {operand}"),
            Self::Exists => format!("EXISTS ({operand})"),
            Self::Match => helper.match_function(column, &operand.to_string()),
            Self::Expr => column.to_string(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        REGISTRY
            .iter()
            .find(|(t, _)| *t == token)
            .map(|&(_, op)| op)
            .ok_or_else(|| QueryError::UnknownOperator(s.trim().to_string()))
    }
}
