use crate::types::{MonitorError, Result, SeenSet, SeenStore};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Seen-set persisted as a JSON array of key strings, one file per source.
pub struct JsonFileSeenStore {
    path: PathBuf,
}

impl JsonFileSeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<SeenSet>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.read_error(e)),
        };

        let keys: Vec<String> = serde_json::from_str(&content).map_err(|e| self.read_error(e))?;
        Ok(Some(keys.into_iter().collect()))
    }

    fn read_error(&self, reason: impl ToString) -> MonitorError {
        MonitorError::StoreRead {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    fn write_error(&self, source: std::io::Error) -> MonitorError {
        MonitorError::StoreWrite {
            path: self.path.clone(),
            source,
        }
    }

    fn write_atomically(&self, seen: &SeenSet) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.write_error(e))?;

        // BTreeSet iteration keeps the file sorted and diff-friendly
        let keys: Vec<&String> = seen.iter().collect();
        let payload = serde_json::to_vec_pretty(&keys).map_err(|e| self.write_error(e.into()))?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| self.write_error(e))?;
        temp.write_all(&payload).map_err(|e| self.write_error(e))?;
        temp.as_file().sync_all().map_err(|e| self.write_error(e))?;
        temp.persist(&self.path).map_err(|e| self.write_error(e.error))?;
        Ok(())
    }
}

impl SeenStore for JsonFileSeenStore {
    fn load(&self) -> SeenSet {
        match self.read() {
            Ok(Some(seen)) => {
                info!("Loaded {} seen keys from {}", seen.len(), self.path.display());
                seen
            }
            Ok(None) => {
                info!("No seen-set at {}, starting empty", self.path.display());
                SeenSet::new()
            }
            Err(e) => {
                warn!("{}; treating every record as unseen", e);
                SeenSet::new()
            }
        }
    }

    fn commit(&self, new_keys: &[String], existing: &SeenSet) -> Result<()> {
        let merged = existing.union_with(new_keys);
        self.write_atomically(&merged)?;
        info!(
            "Committed {} new keys to {} ({} total)",
            new_keys.len(),
            self.path.display(),
            merged.len()
        );
        Ok(())
    }
}
