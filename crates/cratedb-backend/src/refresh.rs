//! Refresh-after-write compensation for eventual consistency.
//!
//! CrateDB gives no read-after-write guarantee: a read immediately
//! following a write may not observe it until the table has been refreshed
//! across the cluster. Tables can opt in to automatic compensation via
//! [`TableOptions::auto_refresh`](crate::core::schema::TableOptions), in
//! which case the cursor issues exactly one `REFRESH TABLE` per logical
//! write (a batched write still refreshes once), trading an extra round
//! trip per write for immediate visibility.
//!
//! A refresh is mandatory after every write whose result will be read in
//! the same logical step. This includes updates: an immediate post-update
//! read can observe stale row duplication until the refresh lands.

use crate::core::schema::Table;

/// The cluster-wide refresh statement for a table.
pub fn refresh_statement(table_name: &str) -> String {
    format!("REFRESH TABLE {table_name}")
}

/// Whether a successful write against the table must be followed by a
/// refresh.
pub fn refresh_after_write(table: &Table) -> bool {
    table.options.auto_refresh
}
