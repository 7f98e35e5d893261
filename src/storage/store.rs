//! Whole-document persistence of the catalog
//!
//! - One JSON file per database, rewritten in full on every save
//! - Saves go through a sibling `.tmp` file, fsync, then rename over the target
//! - A missing file loads as `None`; read and decode faults are distinct errors

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use crate::catalog::Catalog;

/// Reads and writes the catalog document at a fixed path.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
    temp_path: PathBuf,
    pretty: bool,
}

impl DocumentStore {
    /// Creates a store for `path`. No I/O happens until `load` or `save`.
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        let path = path.into();
        let mut temp: OsString = path.as_os_str().to_os_string();
        temp.push(".tmp");
        Self {
            path,
            temp_path: PathBuf::from(temp),
            pretty,
        }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the backing file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the persisted catalog.
    ///
    /// Returns `Ok(None)` when the backing file does not exist.
    ///
    /// # Errors
    ///
    /// - `STORAGE_READ_FAILED` if the file exists but cannot be read
    /// - `STORAGE_MALFORMED_DOCUMENT` if the content is not a catalog document
    pub fn load(&self) -> StorageResult<Option<Catalog>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::read_failed(
                    format!("Failed to read {}", self.path.display()),
                    e,
                ))
            }
        };

        let catalog: Catalog = serde_json::from_str(&content).map_err(|e| {
            StorageError::malformed(
                format!("Invalid catalog document {}", self.path.display()),
                e.to_string(),
            )
        })?;

        Ok(Some(catalog))
    }

    /// Serializes the full catalog and replaces the backing file.
    ///
    /// # Errors
    ///
    /// Returns `STORAGE_WRITE_FAILED` if encoding, writing, syncing or the
    /// final rename fails. The previous document is left in place and the
    /// temp file is removed in that case.
    pub fn save(&self, catalog: &Catalog) -> StorageResult<()> {
        let body = if self.pretty {
            serde_json::to_string_pretty(catalog)
        } else {
            serde_json::to_string(catalog)
        }
        .map_err(|e| {
            StorageError::write_failed_no_source("Failed to encode catalog", e.to_string())
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::write_failed(
                        format!("Failed to create directory {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        self.write_temp(body.as_bytes())
            .and_then(|()| {
                fs::rename(&self.temp_path, &self.path).map_err(|e| {
                    StorageError::write_failed(
                        format!(
                            "Failed to replace {} with {}",
                            self.path.display(),
                            self.temp_path.display()
                        ),
                        e,
                    )
                })
            })
            .map_err(|e| {
                let _ = fs::remove_file(&self.temp_path);
                e
            })
    }

    fn write_temp(&self, body: &[u8]) -> StorageResult<()> {
        let mut file = File::create(&self.temp_path).map_err(|e| {
            StorageError::write_failed(
                format!("Failed to create {}", self.temp_path.display()),
                e,
            )
        })?;
        file.write_all(body).map_err(|e| {
            StorageError::write_failed(format!("Failed to write {}", self.temp_path.display()), e)
        })?;
        file.sync_all().map_err(|e| {
            StorageError::write_failed(format!("Failed to sync {}", self.temp_path.display()), e)
        })
    }
}
