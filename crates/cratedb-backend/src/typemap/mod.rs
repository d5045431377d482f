//! Static mapping from abstract column kinds to CrateDB column types.
//!
//! Array and object kinds are not resolved here: CrateDB's `ARRAY(...)` and
//! `OBJECT(...)` syntax nests arbitrarily, so those recurse through the DDL
//! synthesizer instead ([`crate::ddl::SchemaEditor`]).

use crate::core::schema::ColumnType;

/// Default expression standing in for an identity column. CrateDB has no
/// sequence or identity mechanism, so auto keys are random values in the
/// 32-bit range assigned at insert time, not monotonically increasing.
pub const SERIAL_SQL: &str = "INTEGER DEFAULT CAST((random() * 1.0E9) AS integer)";

/// Map a scalar column kind to CrateDB type syntax.
///
/// Returns `None` for [`ColumnType::Array`] and [`ColumnType::Object`],
/// which the DDL synthesizer renders recursively.
pub fn scalar_type(ty: &ColumnType) -> Option<String> {
    let sql = match ty {
        ColumnType::Auto | ColumnType::BigAuto | ColumnType::SmallAuto => SERIAL_SQL.to_string(),
        ColumnType::Binary => "bytea".to_string(),
        ColumnType::Boolean => "boolean".to_string(),
        ColumnType::Char { max_length } => match max_length {
            Some(n) => format!("varchar({n})"),
            None => "varchar".to_string(),
        },
        ColumnType::Date | ColumnType::DateTime => "timestamp with time zone".to_string(),
        ColumnType::Decimal {
            max_digits,
            decimal_places,
        } => format!("numeric({max_digits}, {decimal_places})"),
        ColumnType::Duration => "interval".to_string(),
        ColumnType::Float => "double precision".to_string(),
        ColumnType::Integer => "integer".to_string(),
        ColumnType::BigInteger => "bigint".to_string(),
        ColumnType::SmallInteger => "smallint".to_string(),
        ColumnType::Ip => "IP".to_string(),
        ColumnType::Inet => "inet".to_string(),
        ColumnType::Text => "text".to_string(),
        ColumnType::Time => "time".to_string(),
        // CrateDB has no uuid type; store the canonical 36-character form.
        ColumnType::Uuid => "varchar(36)".to_string(),
        ColumnType::Array(_) | ColumnType::Object { .. } => return None,
    };
    Some(sql)
}
