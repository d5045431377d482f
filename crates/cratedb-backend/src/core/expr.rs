//! Expression trees for default values and generated columns.
//!
//! The host ORM expresses computed-column expressions through a generic
//! function mechanism; this module is the adapter's equivalent. Rendering
//! produces host-style SQL (`%s` placeholders) plus the bound parameters, so
//! the result flows through the placeholder translator like any other
//! statement. Non-column operands always become bound parameters, never
//! inlined literal text.

use serde::{Deserialize, Serialize};

use crate::core::value::SqlValue;
use crate::dialect::quote_ident;

/// A SQL expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A column reference, rendered as a quoted identifier.
    Column(String),
    /// A constant, rendered as a bound parameter.
    Value(SqlValue),
    /// A scalar function call, e.g. `gen_random_text_uuid()`.
    Func { name: String, args: Vec<Expr> },
    /// A parenthesized binary operation, e.g. `("f1" + "f2")`.
    Binary {
        op: String,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Raw SQL with pre-bound parameters, for expressions the tree cannot
    /// represent.
    Raw { sql: String, params: Vec<SqlValue> },
}

impl Expr {
    /// A column reference.
    pub fn col(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    /// A constant value.
    pub fn value(value: impl Into<SqlValue>) -> Self {
        Expr::Value(value.into())
    }

    /// A scalar function call.
    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Func {
            name: name.into(),
            args,
        }
    }

    /// A binary operation.
    pub fn binary(lhs: Expr, op: impl Into<String>, rhs: Expr) -> Self {
        Expr::Binary {
            op: op.into(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Raw SQL with pre-bound parameters.
    pub fn raw(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Expr::Raw {
            sql: sql.into(),
            params,
        }
    }

    /// Render to host-style SQL text and its bound parameters.
    pub fn as_sql(&self) -> (String, Vec<SqlValue>) {
        let mut params = Vec::new();
        let sql = self.render(&mut params);
        (sql, params)
    }

    fn render(&self, params: &mut Vec<SqlValue>) -> String {
        match self {
            Expr::Column(name) => quote_ident(name),
            Expr::Value(value) => {
                params.push(value.clone());
                "%s".to_string()
            }
            Expr::Func { name, args } => {
                let rendered: Vec<String> = args.iter().map(|a| a.render(params)).collect();
                format!("{}({})", name, rendered.join(", "))
            }
            Expr::Binary { op, lhs, rhs } => {
                let left = lhs.render(params);
                let right = rhs.render(params);
                format!("({left} {op} {right})")
            }
            Expr::Raw { sql, params: p } => {
                params.extend(p.iter().cloned());
                sql.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_renders_quoted() {
        let (sql, params) = Expr::col("f1").as_sql();
        assert_eq!(sql, "\"f1\"");
        assert!(params.is_empty());
    }

    #[test]
    fn test_binary_of_columns() {
        let (sql, params) = Expr::binary(Expr::col("f1"), "/", Expr::col("f2")).as_sql();
        assert_eq!(sql, "(\"f1\" / \"f2\")");
        assert!(params.is_empty());
    }

    #[test]
    fn test_value_becomes_bound_parameter() {
        let (sql, params) = Expr::binary(Expr::col("f1"), "+", Expr::value(1i32)).as_sql();
        assert_eq!(sql, "(\"f1\" + %s)");
        assert_eq!(params, vec![SqlValue::I32(1)]);
    }

    #[test]
    fn test_func_no_args() {
        let (sql, params) = Expr::func("gen_random_text_uuid", vec![]).as_sql();
        assert_eq!(sql, "gen_random_text_uuid()");
        assert!(params.is_empty());
    }

    #[test]
    fn test_raw_carries_params() {
        let expr = Expr::func(
            "date_trunc",
            vec![Expr::value("day"), Expr::col("timestamp")],
        );
        let (sql, params) = expr.as_sql();
        assert_eq!(sql, "date_trunc(%s, \"timestamp\")");
        assert_eq!(params, vec![SqlValue::from("day")]);

        let raw = Expr::raw("now() + %s", vec![SqlValue::I64(3600)]);
        let (sql, params) = raw.as_sql();
        assert_eq!(sql, "now() + %s");
        assert_eq!(params, vec![SqlValue::I64(3600)]);
    }
}
