// Snapshot JSON: an array of {"agent", "name", "nib-ref"} objects

use std::fs;
use std::path::Path;

use log::info;
use nibtab_registry::SnapshotEntry;
use serde::{Deserialize, Serialize};

use crate::error::IoError;

/// On-disk shape of one snapshot entry. Fields are declared in key order so
/// serialization is sorted by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Entity key; null or empty on the sentinel entry.
    pub agent: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "nib-ref")]
    pub nib_ref: Option<String>,
}

impl From<SnapshotRecord> for SnapshotEntry {
    fn from(record: SnapshotRecord) -> Self {
        SnapshotEntry {
            entity_key: record.agent.unwrap_or_default(),
            display_text: record.name.unwrap_or_default(),
            code: record.nib_ref.unwrap_or_default(),
        }
    }
}

impl From<&SnapshotEntry> for SnapshotRecord {
    fn from(entry: &SnapshotEntry) -> Self {
        SnapshotRecord {
            agent: Some(entry.entity_key.clone()),
            name: Some(entry.display_text.clone()),
            nib_ref: Some(entry.code.clone()),
        }
    }
}

/// Load a snapshot, keeping file order (sentinel included).
pub fn read_snapshot(path: &Path) -> Result<Vec<SnapshotEntry>, IoError> {
    let content = fs::read_to_string(path).map_err(|e| IoError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let records: Vec<SnapshotRecord> =
        serde_json::from_str(&content).map_err(|source| IoError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    info!("{}: {} snapshot entries", path.display(), records.len());
    Ok(records.into_iter().map(SnapshotEntry::from).collect())
}

/// Two-space indented JSON with a trailing newline.
pub fn snapshot_to_string(entries: &[SnapshotEntry]) -> Result<String, serde_json::Error> {
    let records: Vec<SnapshotRecord> = entries.iter().map(SnapshotRecord::from).collect();
    let mut out = serde_json::to_string_pretty(&records)?;
    out.push('\n');
    Ok(out)
}

/// Write a snapshot; `Ok(false)` when the file cannot be created.
pub fn write_snapshot(path: &Path, entries: &[SnapshotEntry]) -> Result<bool, IoError> {
    let content = snapshot_to_string(entries).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    match fs::write(path, content) {
        Ok(()) => {
            info!("Written: {}", path.display());
            Ok(true)
        }
        Err(e)
            if matches!(
                e.kind(),
                std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::NotFound
            ) =>
        {
            log::warn!("cannot write {}: {e}", path.display());
            Ok(false)
        }
        Err(source) => Err(IoError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}
