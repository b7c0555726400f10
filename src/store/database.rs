use duckdb::{params, Connection};
use serde_json::Value;
use std::path::Path;

use super::{unix_seconds, validate_user_id, CollectionStore};
use crate::config;
use crate::error::{CollectorError, Result};

/// Document store over a DuckDB table keyed by user id.
///
/// Each row holds the user's full collection list as JSON text plus the
/// unix time of the last save.
pub struct DuckDbStore {
    conn: Connection,
}

impl DuckDbStore {
    /// Open (or create) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                user_id VARCHAR PRIMARY KEY,
                collections_json VARCHAR NOT NULL,
                updated_at BIGINT NOT NULL
            )",
            config::DUCKDB_TABLE
        ))?;
        Ok(Self { conn })
    }

    /// Unix time of the last save for `user_id`.
    pub fn updated_at(&self, user_id: &str) -> Result<Option<i64>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT updated_at FROM {} WHERE user_id = ?",
            config::DUCKDB_TABLE
        ))?;
        let mut rows = stmt.query([user_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Ids of every user with stored collections, sorted.
    pub fn user_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT user_id FROM {} ORDER BY user_id",
            config::DUCKDB_TABLE
        ))?;
        let mut rows = stmt.query([])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }
        Ok(ids)
    }
}

impl CollectionStore for DuckDbStore {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn fetch_collections(&self, user_id: &str) -> Result<Vec<Value>> {
        validate_user_id(user_id)?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT collections_json FROM {} WHERE user_id = ?",
            config::DUCKDB_TABLE
        ))?;
        let mut rows = stmt.query([user_id])?;
        let Some(row) = rows.next()? else {
            log::info!("No stored collections for user '{}'", user_id);
            return Ok(Vec::new());
        };
        let json: String = row.get(0)?;
        match serde_json::from_str::<Value>(&json)? {
            Value::Array(collections) => {
                log::info!("Loaded {} collections for user '{}'", collections.len(), user_id);
                Ok(collections)
            }
            other => {
                log::warn!("Stored collections for user '{}' are not a list", user_id);
                Err(CollectorError::InvalidArgument(format!(
                    "stored collections for '{user_id}' must be a JSON array, found {}",
                    json_kind(&other)
                )))
            }
        }
    }

    fn save_documents(&self, user_id: &str, documents: &[Value]) -> Result<()> {
        validate_user_id(user_id)?;
        let json = serde_json::to_string(documents)?;
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (user_id, collections_json, updated_at) VALUES (?, ?, ?)",
                config::DUCKDB_TABLE
            ),
            params![user_id, json, unix_seconds()],
        )?;
        log::info!("Saved {} collections for user '{}'", documents.len(), user_id);
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
