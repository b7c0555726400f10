use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::{unix_seconds, validate_user_id, CollectionStore};
use crate::config;
use crate::error::Result;

/// On-disk document, one per user.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredShelf {
    user_id: String,
    updated_at: i64,
    collections: Vec<Value>,
}

/// Stores each user's collections as a JSON file under a data directory.
///
/// With `compress` set, files are written gzipped (`<user>.json.gz`). Reads
/// accept either form, so toggling compression keeps existing data readable.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    compress: bool,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P, compress: bool) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, compress })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn compress(&self) -> bool {
        self.compress
    }

    /// Path the next save for `user_id` writes to.
    pub fn path_for(&self, user_id: &str) -> Result<PathBuf> {
        validate_user_id(user_id)?;
        Ok(self.file_path(user_id, self.compress))
    }

    fn file_path(&self, user_id: &str, gz: bool) -> PathBuf {
        let ext = if gz {
            config::STORE_FILE_EXTENSION_GZ
        } else {
            config::STORE_FILE_EXTENSION
        };
        self.dir.join(format!("{user_id}.{ext}"))
    }

    fn read_contents(path: &Path, gz: bool) -> Result<String> {
        let file = fs::File::open(path)?;
        let mut contents = String::new();
        if gz {
            let mut reader = BufReader::new(GzDecoder::new(BufReader::new(file)));
            reader.read_to_string(&mut contents)?;
        } else {
            BufReader::new(file).read_to_string(&mut contents)?;
        }
        Ok(contents)
    }
}

impl CollectionStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn fetch_collections(&self, user_id: &str) -> Result<Vec<Value>> {
        validate_user_id(user_id)?;
        let candidates = [self.compress, !self.compress];
        let Some((path, gz)) = candidates
            .iter()
            .map(|gz| (self.file_path(user_id, *gz), *gz))
            .find(|(path, _)| path.exists())
        else {
            log::info!("No stored collections for user '{}'", user_id);
            return Ok(Vec::new());
        };

        let contents = Self::read_contents(&path, gz)?;
        // Corrupt files are reported but left in place: they hold user data.
        let value: Value = serde_json::from_str(&contents).map_err(|e| {
            log::warn!("Corrupt collection file {}: {}", path.display(), e);
            e
        })?;
        let collections = match value {
            Value::Array(items) => items,
            other => serde_json::from_value::<StoredShelf>(other)
                .map_err(|e| {
                    log::warn!("Unrecognized collection file {}: {}", path.display(), e);
                    e
                })?
                .collections,
        };
        log::info!(
            "Loaded {} collections for user '{}' from {}",
            collections.len(),
            user_id,
            path.display()
        );
        Ok(collections)
    }

    fn save_documents(&self, user_id: &str, documents: &[Value]) -> Result<()> {
        validate_user_id(user_id)?;
        let shelf = StoredShelf {
            user_id: user_id.to_string(),
            updated_at: unix_seconds(),
            collections: documents.to_vec(),
        };
        let bytes = serde_json::to_vec(&shelf)?;

        // Write to a temp file in the same directory and rename on success so
        // an interrupted save never leaves a truncated file behind.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        if self.compress {
            let mut encoder = GzEncoder::new(tmp.as_file_mut(), Compression::default());
            encoder.write_all(&bytes)?;
            encoder.finish()?;
        } else {
            tmp.write_all(&bytes)?;
        }
        tmp.as_file().sync_all()?;
        let path = self.file_path(user_id, self.compress);
        tmp.persist(&path).map_err(|e| e.error)?;

        let stale = self.file_path(user_id, !self.compress);
        if stale.exists() {
            fs::remove_file(&stale)?;
        }
        log::info!(
            "Saved {} collections for user '{}' to {}",
            documents.len(),
            user_id,
            path.display()
        );
        Ok(())
    }
}
