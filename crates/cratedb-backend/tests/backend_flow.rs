//! End-to-end flow: DDL synthesis, placeholder translation, execution
//! through the cursor shim, and refresh-on-write compensation, observed
//! through a recording client.

use std::sync::Mutex;

use async_trait::async_trait;
use cratedb_backend::{
    ClientConnection, Column, ColumnType, Connection, ExecuteResult, Params, Result, SchemaEditor,
    Table, TableOptions,
};

#[derive(Debug, Default)]
struct RecordingClient {
    statements: Mutex<Vec<String>>,
}

impl RecordingClient {
    fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClientConnection for RecordingClient {
    async fn execute(&self, sql: &str, _params: Option<&Params>) -> Result<ExecuteResult> {
        self.statements.lock().unwrap().push(sql.to_string());
        Ok(ExecuteResult::default())
    }

    async fn execute_many(&self, sql: &str, param_sets: &[Params]) -> Result<u64> {
        self.statements.lock().unwrap().push(sql.to_string());
        Ok(param_sets.len() as u64)
    }
}

fn metrics_table() -> Table {
    Table::new("app_metrics")
        .with_column(Column::new("ts", ColumnType::DateTime))
        .with_column(Column::new("value", ColumnType::Float))
        .with_column(Column::new("tags", ColumnType::object()).null())
        .with_composite_pk(["ts", "value"])
        .with_options(
            TableOptions::new()
                .auto_refresh()
                .partition_by("ts")
                .number_of_shards(4),
        )
}

#[tokio::test]
async fn create_table_then_write_then_refresh() {
    let table = metrics_table();
    let editor = SchemaEditor::new().with_unique_warning_suppressed(true);

    let (create_sql, params) = editor.table_sql(&table).unwrap();
    assert!(create_sql.starts_with("CREATE TABLE \"app_metrics\" ("));
    assert!(create_sql.contains("PRIMARY KEY (\"ts\", \"value\")"));
    assert!(create_sql.contains("PARTITIONED BY (ts)"));
    assert!(create_sql.ends_with("CLUSTERED INTO 4 shards"));
    assert!(params.is_empty());

    let connection = Connection::new(RecordingClient::default());
    let mut cursor = connection.cursor();

    // DDL goes through the same cursor as everything else.
    cursor.execute(&create_sql, None).await.unwrap();

    // A policy-covered write is followed by exactly one refresh.
    cursor
        .execute_write(
            &table,
            "INSERT INTO app_metrics (ts, value) VALUES (%s, %s)",
            Some(Params::positional([1_700_000_000i64, 42i64])),
        )
        .await
        .unwrap();

    let sent = connection.client().statements();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[1], "INSERT INTO app_metrics (ts, value) VALUES (?, ?)");
    assert_eq!(sent[2], "REFRESH TABLE app_metrics");
}

// An immediate post-update read can observe stale row duplication unless
// the table is refreshed first; with the policy enabled the cursor does it
// before control returns.
#[tokio::test]
async fn update_under_policy_refreshes_before_subsequent_read() {
    let table = metrics_table();
    let connection = Connection::new(RecordingClient::default());
    let mut cursor = connection.cursor();

    cursor
        .execute_write(
            &table,
            "UPDATE app_metrics SET value = %s WHERE ts = %s",
            Some(Params::positional([43i64, 1_700_000_000i64])),
        )
        .await
        .unwrap();
    cursor
        .execute("SELECT COUNT(*) FROM app_metrics", None)
        .await
        .unwrap();

    let sent = connection.client().statements();
    assert_eq!(
        sent,
        vec![
            "UPDATE app_metrics SET value = ? WHERE ts = ?",
            "REFRESH TABLE app_metrics",
            "SELECT COUNT(*) FROM app_metrics",
        ]
    );
}

#[tokio::test]
async fn batch_insert_named_style_refreshes_once() {
    let table = metrics_table();
    let connection = Connection::new(RecordingClient::default());
    let mut cursor = connection.cursor();

    let sets = (0i64..50).map(|i| Params::named([("ts", i), ("value", i * 2)]));
    let count = cursor
        .execute_many_write(
            &table,
            "INSERT INTO app_metrics (ts, value) VALUES (%(ts)s, %(value)s)",
            sets,
        )
        .await
        .unwrap();
    assert_eq!(count, 50);

    let sent = connection.client().statements();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[0],
        "INSERT INTO app_metrics (ts, value) VALUES (:ts, :value)"
    );
    assert_eq!(sent[1], "REFRESH TABLE app_metrics");
}

#[tokio::test]
async fn captured_log_tracks_the_whole_flow() {
    let table = metrics_table();
    let connection = Connection::new(RecordingClient::default());
    let mut cursor = connection.cursor();

    cursor
        .execute_write(
            &table,
            "INSERT INTO app_metrics (ts, value) VALUES (%s, %s)",
            Some(Params::positional([1i64, 2i64])),
        )
        .await
        .unwrap();

    assert!(cursor.first_query().unwrap().is_insert());
    assert_eq!(
        cursor.first_query().unwrap().params.as_deref(),
        Some("(1, 2)")
    );
    assert_eq!(
        cursor.latest_query().unwrap().stmt,
        "REFRESH TABLE app_metrics"
    );
    assert!(cursor.first_query().unwrap().time <= cursor.latest_query().unwrap().time);
}
