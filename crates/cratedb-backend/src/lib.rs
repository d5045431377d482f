//! # cratedb-backend
//!
//! ORM backend adapter for CrateDB.
//!
//! CrateDB is a distributed, eventually-consistent analytical database that
//! speaks a Postgres-like dialect but has no transactions, foreign keys,
//! unique constraints, or synchronous read-after-write consistency. This
//! library bridges that gap for a general-purpose ORM:
//!
//! - **Placeholder translation** from the host's `%s` / `%(name)s` styles to
//!   CrateDB's `?` / `:name` styles
//! - **Type mapping** from abstract column kinds to CrateDB column types
//! - **DDL synthesis** with `PARTITIONED BY`, `CLUSTERED BY ... INTO n shards`,
//!   composite primary keys, `GENERATED ALWAYS AS`, nested `OBJECT`/`ARRAY`
//!   types and `INDEX OFF` markers
//! - **Refresh-on-write compensation** for eventual consistency
//! - **Connection/cursor shim** with no-op transaction control
//!
//! ## Example
//!
//! ```rust,ignore
//! use cratedb_backend::{Column, ColumnType, SchemaEditor, Table, TableOptions};
//!
//! let table = Table::new("metrics")
//!     .with_column(Column::new("ts", ColumnType::DateTime))
//!     .with_column(Column::new("value", ColumnType::Float))
//!     .with_options(TableOptions::new().partition_by("ts"));
//!
//! let (sql, params) = SchemaEditor::new().table_sql(&table)?;
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod features;
pub mod functions;
pub mod refresh;
pub mod typemap;

// Re-exports for convenient access
pub use client::{CapturedQuery, ClientConnection, Connection, Cursor, ExecuteResult};
pub use config::{ConnectionParams, ConnectionSettings};
pub use crate::core::expr::Expr;
pub use crate::core::schema::{
    Column, ColumnType, GeneratedSpec, MetaOption, ObjectPolicy, PartitionBy, Table, TableOptions,
};
pub use crate::core::value::{Params, SqlValue};
pub use ddl::SchemaEditor;
pub use error::{BackendError, Result};
pub use features::DatabaseFeatures;
