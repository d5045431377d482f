//! Schema DDL synthesizer.
//!
//! Renders `CREATE TABLE` / `ALTER TABLE` fragments for CrateDB from the
//! descriptor types in [`crate::core::schema`], honoring partitioning,
//! clustering, shard, composite-primary-key, generated-column and nested
//! array/object declarations, and suppressing schema operations CrateDB
//! cannot perform.
//!
//! Suppression matters: unique constraints, index DDL and most ALTERs have
//! no CrateDB counterpart, but failing them would block all schema
//! evolution in the host's migration framework. They degrade to a warning
//! (where the caller declared something that will not be honored) and a
//! successful no-op.

use tracing::{debug, warn};

use crate::core::schema::{Column, ColumnType, ConstraintSpec, IndexSpec, MetaOption, Table};
use crate::core::value::SqlValue;
use crate::dialect::quote_ident;
use crate::error::{BackendError, Result};
use crate::typemap;

/// Environment flag suppressing the unique-constraint-dropped warning.
pub const SUPPRESS_UNIQUE_WARNING_ENV: &str = "SUPPRESS_UNIQUE_CONSTRAINT_WARNING";

/// A rendered statement fragment plus its bound parameters.
pub type Statement = (String, Vec<SqlValue>);

/// Generates CrateDB DDL from table and column descriptors.
#[derive(Debug, Clone)]
pub struct SchemaEditor {
    suppress_unique_warning: bool,
}

impl Default for SchemaEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaEditor {
    /// Editor with warning suppression taken from the
    /// `SUPPRESS_UNIQUE_CONSTRAINT_WARNING` environment flag.
    pub fn new() -> Self {
        let suppress = std::env::var(SUPPRESS_UNIQUE_WARNING_ENV)
            .map(|v| v == "true")
            .unwrap_or(false);
        Self {
            suppress_unique_warning: suppress,
        }
    }

    /// Explicitly override the unique-constraint warning suppression.
    pub fn with_unique_warning_suppressed(mut self, suppressed: bool) -> Self {
        self.suppress_unique_warning = suppressed;
        self
    }

    /// Render a column definition (without the column name) and its bound
    /// parameters.
    ///
    /// A `unique` flag is dropped with a warning rather than rendered:
    /// CrateDB has no uniqueness enforcement and the DDL must still
    /// succeed. A generated column's persist request is forced off the same
    /// way.
    pub fn column_sql(&self, table: &Table, column: &Column) -> Result<Statement> {
        if column.unique && !self.suppress_unique_warning {
            warn!(
                "CrateDB does not support unique constraints but `{}.{}` is declared \
                 unique; the constraint is dropped",
                table.name, column.name
            );
        }

        let mut sql = Self::column_type_sql(&column.ty);
        let mut params = Vec::new();

        if let Some(generated) = &column.generated {
            if generated.db_persist {
                warn!(
                    "`{}.{}` requests db_persist=true, but CrateDB cannot store computed \
                     columns physically; the value is recomputed at read time",
                    table.name, column.name
                );
            }
            let (expr_sql, expr_params) = generated.expression.as_sql();
            sql.push_str(&format!(" GENERATED ALWAYS AS ({expr_sql})"));
            params.extend(expr_params);
            return Ok((sql, params));
        }

        if let Some(default) = &column.db_default {
            let (expr_sql, expr_params) = default.as_sql();
            sql.push_str(&format!(" DEFAULT ({expr_sql})"));
            params.extend(expr_params);
        }
        if !column.null {
            sql.push_str(" NOT NULL");
        }
        if column.primary_key && table.primary_key.is_empty() {
            sql.push_str(" PRIMARY KEY");
        }
        if !column.db_index {
            // CrateDB indexes every column unless told otherwise.
            sql.push_str(" INDEX OFF");
        }
        Ok((sql, params))
    }

    /// Render a column type, recursing through arrays and objects.
    fn column_type_sql(ty: &ColumnType) -> String {
        match ty {
            ColumnType::Array(element) => format!("ARRAY({})", Self::column_type_sql(element)),
            ColumnType::Object {
                policy,
                object_schema,
            } => {
                let mut sql = format!("OBJECT({policy})");
                if !object_schema.is_empty() {
                    let fields: Vec<String> = object_schema
                        .iter()
                        .map(|(name, field_ty)| {
                            format!("{} {}", name, Self::column_type_sql(field_ty))
                        })
                        .collect();
                    sql.push_str(&format!(" AS ({})", fields.join(", ")));
                }
                sql
            }
            scalar => match typemap::scalar_type(scalar) {
                Some(sql) => sql,
                // scalar_type is None only for Array/Object, handled above.
                None => unreachable!("scalar kinds always map"),
            },
        }
    }

    /// Render the full `CREATE TABLE` statement and its bound parameters.
    ///
    /// Partition, clustering and shard declarations are validated here,
    /// with errors naming the offending value or column.
    pub fn table_sql(&self, table: &Table) -> Result<Statement> {
        let mut defs = Vec::with_capacity(table.columns.len() + 1);
        let mut params = Vec::new();

        for column in &table.columns {
            let (col_sql, col_params) = self.column_sql(table, column)?;
            defs.push(format!("{} {}", quote_ident(&column.name), col_sql));
            params.extend(col_params);
        }

        if !table.primary_key.is_empty() {
            let key_cols: Vec<String> = table
                .primary_key
                .iter()
                .map(|c| quote_ident(c))
                .collect();
            defs.push(format!("PRIMARY KEY ({})", key_cols.join(", ")));
        }

        let mut sql = format!(
            "CREATE TABLE {} ({})",
            quote_ident(&table.name),
            defs.join(", ")
        );
        self.append_partition_clause(table, &mut sql)?;
        self.append_cluster_clause(table, &mut sql)?;
        Ok((sql, params))
    }

    fn append_partition_clause(&self, table: &Table, sql: &mut String) -> Result<()> {
        let partition = match &table.options.partition_by {
            MetaOption::Omitted => return Ok(()),
            MetaOption::Empty => {
                return Err(BackendError::validation(
                    "partition_by has to be a non-empty sequence, e.g. ['id']",
                ))
            }
            MetaOption::Value(p) => p,
        };
        let columns = partition.columns();
        if columns.is_empty() {
            return Err(BackendError::validation(
                "partition_by has to be a non-empty sequence, e.g. ['id']",
            ));
        }
        for name in &columns {
            if !table.has_column(name) {
                return Err(BackendError::unknown_column(&table.name, name));
            }
        }
        sql.push_str(&format!(" PARTITIONED BY ({})", columns.join(", ")));
        Ok(())
    }

    fn append_cluster_clause(&self, table: &Table, sql: &mut String) -> Result<()> {
        let clustered_by = match &table.options.clustered_by {
            MetaOption::Omitted => None,
            MetaOption::Empty => {
                return Err(BackendError::validation(
                    "clustered_by has to name a column, e.g. 'id'",
                ))
            }
            MetaOption::Value(column) => {
                if !table.has_column(column) {
                    return Err(BackendError::unknown_column(&table.name, column));
                }
                Some(column.as_str())
            }
        };
        let shards = match &table.options.number_of_shards {
            MetaOption::Omitted => None,
            MetaOption::Empty => {
                return Err(BackendError::validation(
                    "number_of_shards has to be a positive integer",
                ))
            }
            MetaOption::Value(n) if *n <= 0 => {
                return Err(BackendError::validation(format!(
                    "number_of_shards has to be a positive integer, got {n}"
                )))
            }
            MetaOption::Value(n) => Some(*n),
        };

        match (clustered_by, shards) {
            (None, None) => {}
            (Some(column), None) => sql.push_str(&format!(" CLUSTERED BY ({column})")),
            (None, Some(n)) => sql.push_str(&format!(" CLUSTERED INTO {n} shards")),
            (Some(column), Some(n)) => {
                sql.push_str(&format!(" CLUSTERED BY ({column}) INTO {n} shards"))
            }
        }
        Ok(())
    }

    /// `ALTER TABLE ... DROP COLUMN` — supported by CrateDB, passed through.
    pub fn drop_column_sql(&self, table: &Table, column: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            quote_ident(&table.name),
            quote_ident(column)
        )
    }

    /// `DROP TABLE` — supported by CrateDB, passed through.
    pub fn drop_table_sql(&self, table: &Table) -> String {
        format!("DROP TABLE {}", quote_ident(&table.name))
    }

    // CrateDB cannot perform the structural ALTERs below. They are accepted
    // and succeed without producing a statement, so the host's migration
    // framework perceives them as completed.

    /// Adding an index is a no-op (every column is indexed by default).
    pub fn add_index(&self, table: &Table, index: &IndexSpec) -> Option<Statement> {
        debug!("skipping ADD INDEX {} on {}", index.name, table.name);
        None
    }

    /// Removing an index is a no-op.
    pub fn remove_index(&self, table: &Table, index: &IndexSpec) -> Option<Statement> {
        debug!("skipping REMOVE INDEX {} on {}", index.name, table.name);
        None
    }

    /// Renaming an index is a no-op.
    pub fn rename_index(
        &self,
        table: &Table,
        old_index: &IndexSpec,
        new_index: &IndexSpec,
    ) -> Option<Statement> {
        debug!(
            "skipping RENAME INDEX {} -> {} on {}",
            old_index.name, new_index.name, table.name
        );
        None
    }

    /// Adding a constraint is a no-op.
    pub fn add_constraint(&self, table: &Table, constraint: &ConstraintSpec) -> Option<Statement> {
        debug!(
            "skipping ADD CONSTRAINT {} on {}",
            constraint.name, table.name
        );
        None
    }

    /// Removing a constraint is a no-op.
    pub fn remove_constraint(
        &self,
        table: &Table,
        constraint: &ConstraintSpec,
    ) -> Option<Statement> {
        debug!(
            "skipping REMOVE CONSTRAINT {} on {}",
            constraint.name, table.name
        );
        None
    }

    /// Changing a column's type after creation is a no-op: the physical
    /// type is immutable once the table exists.
    pub fn alter_column_type(
        &self,
        table: &Table,
        column: &Column,
        _new_type: &ColumnType,
    ) -> Option<Statement> {
        debug!(
            "skipping ALTER COLUMN TYPE for {}.{}",
            table.name, column.name
        );
        None
    }

    /// Adding or dropping NOT NULL after creation is a no-op.
    pub fn alter_column_null(
        &self,
        table: &Table,
        column: &Column,
        _null: bool,
    ) -> Option<Statement> {
        debug!(
            "skipping ALTER COLUMN NULL for {}.{}",
            table.name, column.name
        );
        None
    }

    /// Model-level index statements are never emitted; this stops the host
    /// from issuing CREATE INDEX on initial migration.
    pub fn model_index_sql(&self, _table: &Table) -> Vec<Statement> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expr::Expr;
    use crate::core::schema::{GeneratedSpec, ObjectPolicy, TableOptions};
    use crate::functions;

    fn editor() -> SchemaEditor {
        SchemaEditor::new().with_unique_warning_suppressed(false)
    }

    fn table_with(columns: Vec<Column>) -> Table {
        columns
            .into_iter()
            .fold(Table::new("t"), |t, c| t.with_column(c))
    }

    #[test]
    fn test_column_with_uuid_default() {
        let table = table_with(vec![
            Column::new("f", ColumnType::Text).db_default(functions::gen_random_text_uuid()),
        ]);
        let (sql, params) = editor().column_sql(&table, table.column("f").unwrap()).unwrap();
        assert_eq!(sql, "text DEFAULT (gen_random_text_uuid()) NOT NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn test_array_columns() {
        let table = table_with(vec![
            Column::new("f1", ColumnType::array(ColumnType::Integer)),
            Column::new(
                "f2",
                ColumnType::array(ColumnType::array(ColumnType::varchar(120))),
            ),
            Column::new(
                "f3",
                ColumnType::array(ColumnType::array(ColumnType::object())),
            ),
        ]);
        let e = editor();

        let (sql, _) = e.column_sql(&table, table.column("f1").unwrap()).unwrap();
        assert_eq!(sql, "ARRAY(integer) NOT NULL");

        let (sql, _) = e.column_sql(&table, table.column("f2").unwrap()).unwrap();
        assert_eq!(sql, "ARRAY(ARRAY(varchar(120))) NOT NULL");

        let (sql, _) = e.column_sql(&table, table.column("f3").unwrap()).unwrap();
        assert_eq!(sql, "ARRAY(ARRAY(OBJECT(dynamic))) NOT NULL");
    }

    #[test]
    fn test_generated_column_of_columns() {
        let table = table_with(vec![
            Column::new("f1", ColumnType::Integer),
            Column::new("f2", ColumnType::Integer),
            Column::new("f", ColumnType::Integer).generated(GeneratedSpec::new(Expr::binary(
                Expr::col("f1"),
                "/",
                Expr::col("f2"),
            ))),
        ]);
        let (sql, params) = editor().column_sql(&table, table.column("f").unwrap()).unwrap();
        assert_eq!(sql, "integer GENERATED ALWAYS AS ((\"f1\" / \"f2\"))");
        assert!(params.is_empty());
    }

    #[test]
    fn test_generated_column_persist_request_ignored() {
        // db_persist=true is dropped; the constant operand binds as a
        // parameter instead of being inlined.
        let table = table_with(vec![
            Column::new("f1", ColumnType::Integer),
            Column::new("ff", ColumnType::Integer).generated(
                GeneratedSpec::new(Expr::binary(Expr::col("f1"), "+", Expr::value(1i32)))
                    .with_persist(true),
            ),
        ]);
        let (sql, params) = editor().column_sql(&table, table.column("ff").unwrap()).unwrap();
        assert_eq!(sql, "integer GENERATED ALWAYS AS ((\"f1\" + %s))");
        assert_eq!(params, vec![SqlValue::I32(1)]);
    }

    #[test]
    fn test_generated_column_from_function() {
        let table = table_with(vec![Column::new("f_func", ColumnType::varchar(120))
            .generated(GeneratedSpec::new(functions::gen_random_text_uuid()))]);
        let (sql, params) = editor()
            .column_sql(&table, table.column("f_func").unwrap())
            .unwrap();
        assert_eq!(
            sql,
            "varchar(120) GENERATED ALWAYS AS (gen_random_text_uuid())"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_object_column_policies() {
        let table = table_with(vec![
            Column::new("f", ColumnType::object()),
            Column::new("f1", ColumnType::object_with_policy(ObjectPolicy::Ignored)),
            Column::new(
                "f2",
                ColumnType::object_with_schema(
                    ObjectPolicy::Strict,
                    [
                        ("name", ColumnType::Char { max_length: None }),
                        (
                            "obj",
                            ColumnType::object_with_schema(
                                ObjectPolicy::Strict,
                                [("age", ColumnType::Integer)],
                            ),
                        ),
                    ],
                ),
            ),
        ]);
        let e = editor();

        let (sql, _) = e.column_sql(&table, table.column("f").unwrap()).unwrap();
        assert_eq!(sql, "OBJECT(dynamic) NOT NULL");

        let (sql, _) = e.column_sql(&table, table.column("f1").unwrap()).unwrap();
        assert_eq!(sql, "OBJECT(ignored) NOT NULL");

        let (sql, _) = e.column_sql(&table, table.column("f2").unwrap()).unwrap();
        assert_eq!(
            sql,
            "OBJECT(strict) AS (name varchar, obj OBJECT(strict) AS (age integer)) NOT NULL"
        );
    }

    #[test]
    fn test_unique_column_renders_without_constraint() {
        let table = table_with(vec![Column::new("f", ColumnType::Integer).unique()]);
        let (sql, _) = editor().column_sql(&table, table.column("f").unwrap()).unwrap();
        assert_eq!(sql, "integer NOT NULL");
        assert!(!sql.to_lowercase().contains("unique"));
    }

    #[test]
    fn test_index_off_marker() {
        let table = table_with(vec![Column::new("f", ColumnType::Integer).no_index()]);
        let (sql, _) = editor().column_sql(&table, table.column("f").unwrap()).unwrap();
        assert_eq!(sql, "integer NOT NULL INDEX OFF");
    }

    #[test]
    fn test_nullable_column_has_no_not_null() {
        let table = table_with(vec![Column::new("f", ColumnType::Integer).null()]);
        let (sql, _) = editor().column_sql(&table, table.column("f").unwrap()).unwrap();
        assert_eq!(sql, "integer");
    }

    #[test]
    fn test_auto_primary_key_inline() {
        let table = table_with(vec![Column::new("id", ColumnType::Auto).primary_key()]);
        let (sql, _) = editor().column_sql(&table, table.column("id").unwrap()).unwrap();
        assert_eq!(
            sql,
            "INTEGER DEFAULT CAST((random() * 1.0E9) AS integer) NOT NULL PRIMARY KEY"
        );
    }

    #[test]
    fn test_table_sql_composite_primary_key() {
        let table = Table::new("metrics")
            .with_column(Column::new("timestamp", ColumnType::DateTime))
            .with_column(Column::new("some_value", ColumnType::Integer))
            .with_composite_pk(["timestamp", "some_value"]);
        let (sql, _) = editor().table_sql(&table).unwrap();
        assert!(sql.contains("PRIMARY KEY (\"timestamp\", \"some_value\")"));
        // No inline markers in the composite case.
        assert_eq!(sql.matches("PRIMARY KEY").count(), 1);
    }

    #[test]
    fn test_table_sql_partitioned_by() {
        let table = Table::new("t")
            .with_column(Column::new("a", ColumnType::Integer))
            .with_options(TableOptions::new().partition_by(vec!["a"]));
        let (sql, _) = editor().table_sql(&table).unwrap();
        assert!(sql.contains("PARTITIONED BY (a)"));
    }

    #[test]
    fn test_table_sql_partitioned_by_bare_string() {
        let table = Table::new("t")
            .with_column(Column::new("a", ColumnType::Integer))
            .with_options(TableOptions::new().partition_by("a"));
        let (sql, _) = editor().table_sql(&table).unwrap();
        assert!(sql.contains("PARTITIONED BY (a)"));
    }

    #[test]
    fn test_partition_by_missing_column_names_it() {
        let table = Table::new("t")
            .with_column(Column::new("a", ColumnType::Integer))
            .with_options(TableOptions::new().partition_by("missing"));
        let err = editor().table_sql(&table).unwrap_err();
        match err {
            BackendError::UnknownColumn { table, column } => {
                assert_eq!(table, "t");
                assert_eq!(column, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_partition_by_empty_sequence_fails() {
        let table = Table::new("t")
            .with_column(Column::new("a", ColumnType::Integer))
            .with_options(TableOptions::new().partition_by(Vec::<String>::new()));
        let err = editor().table_sql(&table).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn test_clustering_clause_truth_table() {
        let base = || Table::new("t").with_column(Column::new("a", ColumnType::Integer));
        let e = editor();

        // Neither present: no clause.
        let (sql, _) = e.table_sql(&base()).unwrap();
        assert!(!sql.contains("CLUSTERED"));

        // Clustered-by only.
        let (sql, _) = e
            .table_sql(&base().with_options(TableOptions::new().clustered_by("a")))
            .unwrap();
        assert!(sql.ends_with("CLUSTERED BY (a)"));

        // Shard count only.
        let (sql, _) = e
            .table_sql(&base().with_options(TableOptions::new().number_of_shards(6)))
            .unwrap();
        assert!(sql.ends_with("CLUSTERED INTO 6 shards"));

        // Both.
        let (sql, _) = e
            .table_sql(
                &base().with_options(TableOptions::new().clustered_by("a").number_of_shards(6)),
            )
            .unwrap();
        assert!(sql.ends_with("CLUSTERED BY (a) INTO 6 shards"));
    }

    #[test]
    fn test_clustered_by_missing_column_fails() {
        let table = Table::new("t")
            .with_column(Column::new("a", ColumnType::Integer))
            .with_options(TableOptions::new().clustered_by("nope"));
        let err = editor().table_sql(&table).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_non_positive_shard_count_fails() {
        let table = Table::new("t")
            .with_column(Column::new("a", ColumnType::Integer))
            .with_options(TableOptions::new().number_of_shards(0));
        let err = editor().table_sql(&table).unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_partition_before_cluster_clause() {
        let table = Table::new("t")
            .with_column(Column::new("a", ColumnType::Integer))
            .with_options(
                TableOptions::new()
                    .partition_by("a")
                    .number_of_shards(4),
            );
        let (sql, _) = editor().table_sql(&table).unwrap();
        let partition_pos = sql.find("PARTITIONED BY").unwrap();
        let cluster_pos = sql.find("CLUSTERED").unwrap();
        assert!(partition_pos < cluster_pos);
    }

    #[test]
    fn test_drop_statements_pass_through() {
        let table = Table::new("t").with_column(Column::new("a", ColumnType::Integer));
        let e = editor();
        assert_eq!(
            e.drop_column_sql(&table, "a"),
            "ALTER TABLE \"t\" DROP COLUMN \"a\""
        );
        assert_eq!(e.drop_table_sql(&table), "DROP TABLE \"t\"");
    }

    #[test]
    fn test_unsupported_alters_are_noops() {
        let table = Table::new("t").with_column(Column::new("a", ColumnType::Integer));
        let column = table.column("a").unwrap();
        let index = IndexSpec {
            name: "idx".to_string(),
            columns: vec!["a".to_string()],
        };
        let constraint = ConstraintSpec {
            name: "uniq".to_string(),
        };
        let e = editor();

        assert!(e.add_index(&table, &index).is_none());
        assert!(e.remove_index(&table, &index).is_none());
        assert!(e.rename_index(&table, &index, &index).is_none());
        assert!(e.add_constraint(&table, &constraint).is_none());
        assert!(e.remove_constraint(&table, &constraint).is_none());
        assert!(e
            .alter_column_type(&table, column, &ColumnType::BigInteger)
            .is_none());
        assert!(e.alter_column_null(&table, column, true).is_none());
        assert!(e.model_index_sql(&table).is_empty());
    }

    #[test]
    fn test_table_sql_collects_column_params() {
        let table = Table::new("t")
            .with_column(Column::new("f1", ColumnType::Integer))
            .with_column(Column::new("ff", ColumnType::Integer).generated(GeneratedSpec::new(
                Expr::binary(Expr::col("f1"), "+", Expr::value(1i32)),
            )));
        let (sql, params) = editor().table_sql(&table).unwrap();
        assert!(sql.starts_with("CREATE TABLE \"t\" ("));
        assert_eq!(params, vec![SqlValue::I32(1)]);
    }
}
