//! Backing file I/O with atomic replacement
//!
//! A commit never edits the store file in place:
//! - the new frame is written to a sibling temp file
//! - the temp file is fsynced (unless durability is buffered)
//! - the temp file is renamed over the store file
//! - the parent directory is fsynced so the rename itself is durable
//!
//! A crash at any point leaves either the old frame or the new frame on
//! disk, never a mix of both.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error};
use uuid::Uuid;

use super::config::{Durability, StoreConfig};
use super::errors::{StoreError, StoreResult};
use super::format::{decode_frame, encode_frame};

/// Handle on the store file location. Holds no open descriptor between commits.
#[derive(Debug)]
pub(crate) struct StoreFile {
    path: PathBuf,
    durability: Durability,
}

impl StoreFile {
    /// Binds to the configured path, creating parent directories when asked.
    pub(crate) fn prepare(config: &StoreConfig) -> StoreResult<Self> {
        let file = Self {
            path: config.path.clone(),
            durability: config.durability,
        };

        let parent = file.parent_dir();
        if !parent.exists() {
            if !config.create_dirs {
                return Err(StoreError::io_error(
                    format!("Store directory does not exist: {}", parent.display()),
                    io::Error::new(io::ErrorKind::NotFound, "missing store directory"),
                ));
            }
            fs::create_dir_all(&parent).map_err(|e| {
                StoreError::io_error(
                    format!("Failed to create store directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        Ok(file)
    }

    /// Returns the store file path.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and verifies the stored payload.
    ///
    /// Returns `None` when the file is absent or empty (a store that has
    /// never committed).
    pub(crate) fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::read_failed(
                    format!("Failed to read store file: {}", self.path.display()),
                    e,
                ))
            }
        };

        if data.is_empty() {
            return Ok(None);
        }

        let payload = decode_frame(&data).map_err(|reason| {
            error!(path = %self.path.display(), %reason, "STORE_CORRUPTION");
            StoreError::data_corruption(&self.path, reason.to_string())
        })?;

        Ok(Some(payload.to_vec()))
    }

    /// Atomically replaces the store file with a frame holding `payload`.
    pub(crate) fn write(&self, payload: &[u8]) -> StoreResult<()> {
        let frame = encode_frame(payload)
            .map_err(|reason| StoreError::encode_failed(reason.to_string()))?;
        let temp_path = self.temp_path();

        if let Err(e) = self.write_temp(&temp_path, &frame) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::write_failed(
                format!("Failed to replace store file: {}", self.path.display()),
                e,
            ));
        }

        if self.durability.syncs() {
            self.sync_parent_dir()?;
        }

        debug!(path = %self.path.display(), bytes = frame.len(), "STORE_FLUSH");
        Ok(())
    }

    fn write_temp(&self, temp_path: &Path, frame: &[u8]) -> StoreResult<()> {
        let mut file = File::create(temp_path).map_err(|e| {
            StoreError::write_failed(
                format!("Failed to create temp file: {}", temp_path.display()),
                e,
            )
        })?;

        file.write_all(frame).map_err(|e| {
            StoreError::write_failed(
                format!("Failed to write temp file: {}", temp_path.display()),
                e,
            )
        })?;

        // fsync before rename, otherwise the rename can land ahead of the data
        if self.durability.syncs() {
            file.sync_all().map_err(|e| {
                StoreError::write_failed(
                    format!("fsync failed for temp file: {}", temp_path.display()),
                    e,
                )
            })?;
        }

        Ok(())
    }

    #[cfg(unix)]
    fn sync_parent_dir(&self) -> StoreResult<()> {
        let parent = self.parent_dir();
        let dir = OpenOptions::new().read(true).open(&parent).map_err(|e| {
            StoreError::write_failed(
                format!("Failed to open store directory for fsync: {}", parent.display()),
                e,
            )
        })?;

        dir.sync_all().map_err(|e| {
            StoreError::write_failed(
                format!("Failed to fsync store directory: {}", parent.display()),
                e,
            )
        })
    }

    #[cfg(not(unix))]
    fn sync_parent_dir(&self) -> StoreResult<()> {
        Ok(())
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("store"));
        name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }
}
