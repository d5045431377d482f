//! Core descriptor and value types shared across the adapter.
//!
//! - [`schema`]: table/column descriptors and per-table CrateDB options
//! - [`value`]: SQL value and parameter-set representations
//! - [`expr`]: expression trees for defaults and generated columns

pub mod expr;
pub mod schema;
pub mod value;

pub use expr::Expr;
pub use schema::{
    Column, ColumnType, GeneratedSpec, MetaOption, ObjectPolicy, PartitionBy, Table, TableOptions,
};
pub use value::{Params, SqlValue};
