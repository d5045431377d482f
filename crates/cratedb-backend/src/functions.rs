//! CrateDB scalar function expressions.
//!
//! Building blocks for default-value and generated-column expressions. See
//! <https://cratedb.com/docs/crate/reference/en/latest/general/builtins/scalar-functions.html>.

use crate::core::expr::Expr;

/// `gen_random_text_uuid()` — a database-generated random text uid.
///
/// The usual way to get database-assigned text keys, since CrateDB has no
/// sequences: declare a text column with this as its default.
pub fn gen_random_text_uuid() -> Expr {
    Expr::func("gen_random_text_uuid", Vec::new())
}

/// `now()` — the statement's evaluation timestamp.
pub fn now() -> Expr {
    Expr::func("now", Vec::new())
}

/// `date_trunc(interval, column)` — truncate a timestamp column to the
/// given interval. The interval binds as a parameter.
pub fn date_trunc(interval: &str, column: &str) -> Expr {
    Expr::func(
        "date_trunc",
        vec![Expr::value(interval), Expr::col(column)],
    )
}
