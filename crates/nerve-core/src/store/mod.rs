//! Key-partitioned content store.
//!
//! Two interchangeable backends sit behind [`ContentStore`]: an embedded
//! SQLite file and a networked Postgres database. [`open`] picks one once,
//! from configuration, and callers never learn which.
//!
//! Every operation opens its own connection, runs a single statement and
//! releases the connection before returning. Nothing is pooled or shared
//! across calls, and every call is bounded by the configured timeout.

pub mod postgres;
pub mod sqlite;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::StoreConfig;
use crate::error::{NerveError, Result};
use crate::types::{Entry, Partition};

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

// ---------------------------------------------------------------------------
// BackendKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    Postgres,
}

impl BackendKind {
    /// Networked backend only for an explicit Postgres URL.
    pub fn select(database_url: Option<&str>) -> Self {
        match database_url.map(str::trim) {
            Some(url) if is_postgres_url(url) => BackendKind::Postgres,
            _ => BackendKind::Sqlite,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Sqlite => "sqlite",
            BackendKind::Postgres => "postgres",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_postgres_url(url: &str) -> bool {
    url.starts_with("postgres://") || url.starts_with("postgresql://")
}

// ---------------------------------------------------------------------------
// ContentStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ContentStore: Send + Sync {
    fn backend(&self) -> BackendKind;

    /// Create both partitions if absent. Never touches existing rows.
    async fn ensure_schema(&self) -> Result<()>;

    /// A uniformly random entry, or `None` when the partition is empty.
    async fn get_random(&self, partition: Partition) -> Result<Option<Entry>>;

    /// Persist trimmed `content` and return the new id.
    ///
    /// Blank or over-long content is `InvalidContent`. Duplicates are allowed.
    async fn append(&self, partition: Partition, content: &str) -> Result<i64>;

    /// Every entry in the partition. Callers must not rely on the order.
    async fn list_all(&self, partition: Partition) -> Result<Vec<Entry>>;

    /// Delete every entry in the partition, returning how many were removed.
    async fn clear_all(&self, partition: Partition) -> Result<u64>;
}

/// Build the store selected by `config`.
pub fn open(config: &StoreConfig) -> Arc<dyn ContentStore> {
    let url = config
        .database_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    match (BackendKind::select(url), url) {
        (BackendKind::Postgres, Some(url)) => {
            tracing::info!(backend = "postgres", "using networked content store");
            Arc::new(PostgresStore::new(url, config.op_timeout))
        }
        (_, other) => {
            if other.is_some() {
                tracing::warn!("DATABASE_URL is not a postgres URL; using the embedded store");
            }
            tracing::info!(
                backend = "sqlite",
                path = %config.sqlite_path.display(),
                "using embedded content store"
            );
            Arc::new(SqliteStore::new(&config.sqlite_path, config.op_timeout))
        }
    }
}

/// Run `fut`, turning expiry of `limit` into `StoreUnavailable`.
pub(crate) async fn bounded<T>(
    limit: Duration,
    op: &'static str,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(NerveError::StoreUnavailable(format!(
            "{op} timed out after {}ms",
            limit.as_millis()
        ))),
    }
}
