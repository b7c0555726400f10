//! Backup files: a JSON array of collection documents.
//!
//! Files ending in `.gz` are gzipped. Reading performs the shape check
//! (top-level array of objects, each with a `cards` list) so malformed
//! backups are rejected before anything is migrated.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;
use std::fs;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{CollectorError, Result};
use crate::models::Collection;

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

/// Serialize collections in backup form.
pub fn to_backup_string(collections: &[Collection]) -> Result<String> {
    Ok(serde_json::to_string_pretty(collections)?)
}

/// Parse and shape-check backup contents, returning the raw documents.
pub fn parse_backup(contents: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(contents)
        .map_err(|e| CollectorError::InvalidBackup(format!("not valid JSON: {e}")))?;
    let Value::Array(entries) = value else {
        return Err(CollectorError::InvalidBackup(
            "expected a JSON array of collections".into(),
        ));
    };
    for (i, entry) in entries.iter().enumerate() {
        let Some(doc) = entry.as_object() else {
            return Err(CollectorError::InvalidBackup(format!(
                "entry {i} is not a collection object"
            )));
        };
        if !doc.get("cards").is_some_and(Value::is_array) {
            return Err(CollectorError::InvalidBackup(format!(
                "entry {i} has no cards list"
            )));
        }
    }
    Ok(entries)
}

/// Write `collections` to `path`, replacing any existing file atomically.
pub fn write_backup<P: AsRef<Path>>(path: P, collections: &[Collection]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let contents = to_backup_string(collections)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    if is_gzip(path) {
        let mut encoder = GzEncoder::new(tmp.as_file_mut(), Compression::default());
        encoder.write_all(contents.as_bytes())?;
        encoder.finish()?;
    } else {
        tmp.write_all(contents.as_bytes())?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    log::info!("Wrote backup of {} collections to {}", collections.len(), path.display());
    Ok(())
}

/// Read and shape-check a backup file.
pub fn read_backup<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let file = fs::File::open(path)?;
    let mut contents = String::new();
    if is_gzip(path) {
        BufReader::new(GzDecoder::new(BufReader::new(file))).read_to_string(&mut contents)?;
    } else {
        BufReader::new(file).read_to_string(&mut contents)?;
    }
    parse_backup(&contents)
}
