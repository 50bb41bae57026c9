//! Embedded backend: a local SQLite file.
//!
//! rusqlite is blocking, so each operation runs on the blocking pool with a
//! connection that lives only for that call.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{bounded, BackendKind, ContentStore};
use crate::error::{NerveError, Result};
use crate::types::{validate_content, Entry, Partition};

pub struct SqliteStore {
    path: PathBuf,
    timeout: Duration,
}

impl SqliteStore {
    pub fn new(path: impl AsRef<Path>, timeout: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection, run `f`, close the connection.
    async fn with_connection<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        let busy = busy_timeout(self.timeout);
        let task = tokio::task::spawn_blocking(move || -> Result<T> {
            let conn = Connection::open(&path)?;
            // Writers queue on the file lock instead of failing immediately,
            // but give up well before the caller stops waiting.
            conn.busy_timeout(busy)?;
            let out = f(&conn);
            if let Err((_, e)) = conn.close() {
                tracing::debug!(error = %e, "sqlite close failed");
            }
            Ok(out?)
        });

        bounded(self.timeout, op, async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(NerveError::store(format!("{op} task failed: {e}"))),
            }
        })
        .await
    }
}

/// Lock wait inside the blocking task. The task is not cancelled when
/// `op_timeout` fires, so contention has to fail here first or a write
/// could land after the caller already reported failure.
fn busy_timeout(op_timeout: Duration) -> Duration {
    op_timeout / 2
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        content: row.get(1)?,
    })
}

fn schema_sql() -> String {
    Partition::all()
        .iter()
        .map(|p| {
            format!(
                "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY, content TEXT NOT NULL);",
                p.table()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl ContentStore for SqliteStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    async fn ensure_schema(&self) -> Result<()> {
        let sql = schema_sql();
        self.with_connection("ensure_schema", move |conn| conn.execute_batch(&sql))
            .await
    }

    async fn get_random(&self, partition: Partition) -> Result<Option<Entry>> {
        let sql = format!(
            "SELECT id, content FROM {} ORDER BY RANDOM() LIMIT 1",
            partition.table()
        );
        self.with_connection("get_random", move |conn| {
            conn.query_row(&sql, [], entry_from_row).optional()
        })
        .await
    }

    async fn append(&self, partition: Partition, content: &str) -> Result<i64> {
        let content = validate_content(content)?;
        let sql = format!("INSERT INTO {} (content) VALUES (?1)", partition.table());
        self.with_connection("append", move |conn| {
            conn.execute(&sql, params![content])?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    async fn list_all(&self, partition: Partition) -> Result<Vec<Entry>> {
        let sql = format!("SELECT id, content FROM {} ORDER BY id", partition.table());
        self.with_connection("list_all", move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let entries: rusqlite::Result<Vec<Entry>> =
                stmt.query_map([], entry_from_row)?.collect();
            entries
        })
        .await
    }

    async fn clear_all(&self, partition: Partition) -> Result<u64> {
        let sql = format!("DELETE FROM {}", partition.table());
        self.with_connection("clear_all", move |conn| {
            conn.execute(&sql, []).map(|n| n as u64)
        })
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
