//! Capability flags exposed to the host ORM.

use serde::{Deserialize, Serialize};

/// What CrateDB can and cannot do, as the host ORM's feature-detection
/// machinery expects to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseFeatures {
    /// CrateDB has no transactions.
    pub supports_transactions: bool,
    /// No foreign key enforcement.
    pub supports_foreign_keys: bool,
    /// No unique constraint enforcement.
    pub supports_unique_constraints: bool,
    /// No partial indexes (CREATE INDEX ... WHERE ...).
    pub supports_partial_indexes: bool,
    /// No indexes on expressions.
    pub supports_expression_indexes: bool,
    /// No column/table comments.
    pub supports_comments: bool,
    /// DDL cannot be rolled back (there are no transactions).
    pub can_rollback_ddl: bool,
    /// INSERT ... RETURNING works.
    pub can_return_columns_from_insert: bool,
    /// Reported true so generated columns are usable; the persist flag is
    /// dropped at DDL generation.
    pub supports_virtual_generated_columns: bool,
}

impl Default for DatabaseFeatures {
    fn default() -> Self {
        Self {
            supports_transactions: false,
            supports_foreign_keys: false,
            supports_unique_constraints: false,
            supports_partial_indexes: false,
            supports_expression_indexes: false,
            supports_comments: false,
            can_rollback_ddl: false,
            can_return_columns_from_insert: true,
            supports_virtual_generated_columns: true,
        }
    }
}
