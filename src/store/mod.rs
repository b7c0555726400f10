//! Persistence port for per-user collection lists.
//!
//! A store hands back whatever documents it holds, legacy shapes included;
//! the owner runs them through the migration engine. Saves always write the
//! full, canonical list.

mod database;
mod file;
mod memory;

pub use self::database::DuckDbStore;
pub use self::file::FileStore;
pub use self::memory::MemoryStore;

use serde_json::Value;

use crate::error::{CollectorError, Result};
use crate::models::Collection;

pub trait CollectionStore: Send {
    /// Short label used in log lines and `Display` output.
    fn name(&self) -> &'static str;

    /// Raw documents stored for `user_id`. An unknown user has an empty shelf.
    fn fetch_collections(&self, user_id: &str) -> Result<Vec<Value>>;

    /// Replace everything stored for `user_id` with raw documents.
    fn save_documents(&self, user_id: &str, documents: &[Value]) -> Result<()>;

    /// Replace everything stored for `user_id` with canonical collections.
    fn save_collections(&self, user_id: &str, collections: &[Collection]) -> Result<()> {
        let documents = collections
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.save_documents(user_id, &documents)
    }
}

/// Reject ids that are empty or could escape a storage namespace.
pub(crate) fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(CollectorError::InvalidArgument("user id must not be empty".into()));
    }
    if user_id.contains(['/', '\\']) || user_id.contains("..") {
        return Err(CollectorError::InvalidArgument(format!(
            "user id '{user_id}' contains a path separator"
        )));
    }
    Ok(())
}

pub(crate) fn unix_seconds() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
