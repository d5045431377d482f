//! Connection and cursor shim over the underlying CrateDB client driver.
//!
//! The shim presents the capability surface the host ORM's driver
//! abstraction expects — transaction control, cursors, execute/executemany —
//! while translating placeholders on the way through and treating
//! commit/rollback/savepoint as no-ops (CrateDB has no transactions; the
//! wire always autocommits). All network I/O, blocking, cancellation and
//! timeouts belong to the [`ClientConnection`] implementation, not here.

use std::collections::VecDeque;
use std::iter::Peekable;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::core::schema::Table;
use crate::core::value::{Params, SqlValue};
use crate::dialect;
use crate::error::Result;
use crate::refresh;

/// Result of a single statement execution.
#[derive(Debug, Clone, Default)]
pub struct ExecuteResult {
    /// Result rows, if the statement produced any.
    pub rows: Vec<Vec<SqlValue>>,
    /// Number of rows affected or returned.
    pub rowcount: u64,
}

/// The narrow interface to the underlying CrateDB client driver.
///
/// Statements arrive already in CrateDB placeholder syntax (`?` / `:name`).
/// Implementations wrap their transport errors with
/// [`BackendError::driver`](crate::error::BackendError::driver); the shim
/// adds no retry logic of its own.
#[async_trait]
pub trait ClientConnection: Send + Sync {
    /// Execute a single statement.
    async fn execute(&self, sql: &str, params: Option<&Params>) -> Result<ExecuteResult>;

    /// Execute a statement once per parameter set.
    async fn execute_many(&self, sql: &str, param_sets: &[Params]) -> Result<u64>;

    /// Release the underlying connection.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A statement captured on its way to the database.
#[derive(Debug, Clone)]
pub struct CapturedQuery {
    /// The rendered statement text, after placeholder translation.
    pub stmt: String,
    /// Parameters, rendered for inspection.
    pub params: Option<String>,
    /// Capture timestamp.
    pub time: DateTime<Utc>,
}

impl CapturedQuery {
    /// Whether the captured statement is an INSERT.
    pub fn is_insert(&self) -> bool {
        self.stmt.to_lowercase().contains("insert")
    }
}

/// Connection shim owning the underlying client.
#[derive(Debug)]
pub struct Connection<C: ClientConnection> {
    client: C,
}

impl<C: ClientConnection> Connection<C> {
    /// Wrap an underlying client connection.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Open a cursor. The cursor borrows the connection; its captured-query
    /// log lives and dies with it.
    pub fn cursor(&self) -> Cursor<'_, C> {
        Cursor {
            client: &self.client,
            captured: VecDeque::new(),
        }
    }

    /// CrateDB has no transactions; commit is a no-op.
    pub fn commit(&self) {}

    /// No-op, see [`Connection::commit`].
    pub fn rollback(&self) {}

    /// No-op, see [`Connection::commit`].
    pub fn savepoint(&self, _name: &str) {}

    /// The wire protocol always autocommits.
    pub fn autocommit(&self) -> bool {
        true
    }

    /// Access the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Close the underlying connection.
    pub async fn close(&self) -> Result<()> {
        self.client.close().await
    }
}

/// Cursor shim: translates placeholders, logs and captures every statement,
/// and compensates writes against refresh-policy tables.
#[derive(Debug)]
pub struct Cursor<'a, C: ClientConnection> {
    client: &'a C,
    captured: VecDeque<CapturedQuery>,
}

impl<'a, C: ClientConnection> Cursor<'a, C> {
    /// Execute a statement, translating host-style placeholders first.
    pub async fn execute(
        &mut self,
        sql: &str,
        params: Option<Params>,
    ) -> Result<ExecuteResult> {
        let Some(params) = params else {
            self.capture(sql.to_string(), None);
            return self.client.execute(sql, None).await;
        };

        let names = params.names();
        let sql = dialect::convert_query(sql, names.as_deref())?;
        info!("sent query: {sql}, {params}");
        self.capture(sql.clone(), Some(params.to_string()));
        self.client.execute(&sql, Some(&params)).await
    }

    /// Execute a statement once per parameter set.
    ///
    /// The sequence may be one-shot; the first set is peeked (not consumed)
    /// to pick the translation mode, then the full sequence is replayed
    /// unchanged to the underlying executor.
    pub async fn execute_many<I>(&mut self, sql: &str, param_sets: I) -> Result<u64>
    where
        I: IntoIterator<Item = Params>,
    {
        let mut peekable: Peekable<_> = param_sets.into_iter().peekable();
        let names = peekable.peek().and_then(Params::names);
        let sql = dialect::convert_query(sql, names.as_deref())?;
        info!("sent query: {sql}");
        let sets: Vec<Params> = peekable.collect();
        self.capture(sql.clone(), Some(format!("<{} parameter sets>", sets.len())));
        self.client.execute_many(&sql, &sets).await
    }

    /// Execute a row-level write. If the table opted in to the refresh
    /// policy, exactly one `REFRESH TABLE` follows the successful write
    /// before control returns.
    pub async fn execute_write(
        &mut self,
        table: &Table,
        sql: &str,
        params: Option<Params>,
    ) -> Result<ExecuteResult> {
        let result = self.execute(sql, params).await?;
        self.maybe_refresh(table).await?;
        Ok(result)
    }

    /// Execute a batched row-level write. The batch counts as one logical
    /// write: at most one refresh is issued, never one per row.
    pub async fn execute_many_write<I>(
        &mut self,
        table: &Table,
        sql: &str,
        param_sets: I,
    ) -> Result<u64>
    where
        I: IntoIterator<Item = Params>,
    {
        let count = self.execute_many(sql, param_sets).await?;
        self.maybe_refresh(table).await?;
        Ok(count)
    }

    /// Force a table's latest writes to become visible to subsequent reads.
    /// Callable at any time, independent of the automatic policy.
    pub async fn refresh_table(&mut self, table_name: &str) -> Result<ExecuteResult> {
        let stmt = refresh::refresh_statement(table_name);
        self.capture(stmt.clone(), None);
        self.client.execute(&stmt, None).await
    }

    async fn maybe_refresh(&mut self, table: &Table) -> Result<()> {
        if refresh::refresh_after_write(table) {
            self.refresh_table(&table.name).await?;
        }
        Ok(())
    }

    fn capture(&mut self, stmt: String, params: Option<String>) {
        self.captured.push_back(CapturedQuery {
            stmt,
            params,
            time: Utc::now(),
        });
    }

    /// All statements captured on this cursor, oldest first.
    pub fn captured(&self) -> impl Iterator<Item = &CapturedQuery> {
        self.captured.iter()
    }

    /// The first captured statement.
    pub fn first_query(&self) -> Option<&CapturedQuery> {
        self.captured.front()
    }

    /// The most recently captured statement.
    pub fn latest_query(&self) -> Option<&CapturedQuery> {
        self.captured.back()
    }

    /// The captured statement at the given index.
    pub fn query_at(&self, index: usize) -> Option<&CapturedQuery> {
        self.captured.get(index)
    }
}
