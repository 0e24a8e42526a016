//! SQLite-backed document store.
//!
//! Two independent collections, one for standalone statement rows and one for
//! report definitions. Each collection is a single `(id, body)` table whose
//! body column holds the record's JSON document, so the store behaves like a
//! key-value document database: save assigns a fresh id when the record has
//! none, reads decode the stored document, and listings come back in
//! insertion order.

use crate::model::{ReportDefinition, StatementRow};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, SqlitePool};
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

const ROWS_TABLE: &str = "statement_rows";
const DEFINITIONS_TABLE: &str = "report_definitions";

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS statement_rows (
    id TEXT PRIMARY KEY,
    body TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS report_definitions (
    id TEXT PRIMARY KEY,
    body TEXT NOT NULL
);
";

/// Handle to the statement document store. Cheap to clone; all clones share
/// one connection pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens the database at `url`, creating the file and the collection
    /// tables if they do not exist yet.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        pool.execute(SCHEMA).await?;
        debug!("document store ready at {url}");
        Ok(Self { pool })
    }

    /// Persists a statement row, assigning an id if the row has none, and
    /// returns the stored record.
    pub async fn save_row(&self, mut row: StatementRow) -> Result<StatementRow> {
        let id = assign_id(&mut row.id);
        self.put(ROWS_TABLE, &id, &row).await?;
        Ok(row)
    }

    pub async fn find_row(&self, id: &str) -> Result<Option<StatementRow>> {
        self.get(ROWS_TABLE, id).await
    }

    /// All stored rows in insertion order.
    pub async fn all_rows(&self) -> Result<Vec<StatementRow>> {
        self.list(ROWS_TABLE).await
    }

    /// Persists a report definition, assigning an id if it has none, and
    /// returns the stored record.
    pub async fn save_definition(&self, mut def: ReportDefinition) -> Result<ReportDefinition> {
        let id = assign_id(&mut def.id);
        self.put(DEFINITIONS_TABLE, &id, &def).await?;
        Ok(def)
    }

    pub async fn find_definition(&self, id: &str) -> Result<Option<ReportDefinition>> {
        self.get(DEFINITIONS_TABLE, id).await
    }

    /// All stored definitions in insertion order.
    pub async fn all_definitions(&self) -> Result<Vec<ReportDefinition>> {
        self.list(DEFINITIONS_TABLE).await
    }

    async fn put<T: Serialize>(&self, table: &str, id: &str, doc: &T) -> Result<()> {
        let body = serde_json::to_string(doc)
            .map_err(|e| Error::Store(format!("failed to encode document for {table}: {e}")))?;
        sqlx::query(&format!(
            "INSERT OR REPLACE INTO {table} (id, body) VALUES (?, ?)"
        ))
        .bind(id)
        .bind(body)
        .execute(&self.pool)
        .await?;
        debug!("stored document {id} in {table}");
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, table: &str, id: &str) -> Result<Option<T>> {
        let found: Option<(String,)> =
            sqlx::query_as(&format!("SELECT body FROM {table} WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        found
            .map(|(body,)| decode_document(table, &body))
            .transpose()
    }

    async fn list<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let bodies: Vec<(String,)> =
            sqlx::query_as(&format!("SELECT body FROM {table} ORDER BY rowid"))
                .fetch_all(&self.pool)
                .await?;
        bodies
            .into_iter()
            .map(|(body,)| decode_document(table, &body))
            .collect()
    }
}

fn decode_document<T: DeserializeOwned>(table: &str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| Error::Store(format!("corrupt document in {table}: {e}")))
}

/// Fills in a fresh v4 UUID when the slot is empty and returns the effective
/// id either way.
fn assign_id(slot: &mut Option<String>) -> String {
    match slot {
        Some(id) => id.clone(),
        None => {
            let id = Uuid::new_v4().to_string();
            *slot = Some(id.clone());
            id
        }
    }
}
