//! Single-file transactional document store
//!
//! The whole document lives in memory and is mirrored to one backing file.
//! Readers share the committed snapshot; writers are serialized and work on
//! a private copy that replaces the snapshot only after it reached disk.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use super::config::StoreConfig;
use super::errors::{StoreError, StoreResult};
use super::file::StoreFile;
use super::transaction::{ReadTransaction, WriteTransaction};

/// A root document the store can hold.
///
/// Serialization must be deterministic (ordered maps, no floating
/// timestamps) so that an unchanged document encodes to unchanged bytes.
pub trait Document: Serialize + DeserializeOwned + Default + Clone + Send + Sync {}

impl<T> Document for T where T: Serialize + DeserializeOwned + Default + Clone + Send + Sync {}

/// Committed state shared by all transactions.
pub(crate) struct Snapshot<R> {
    pub(crate) root: R,
    /// Payload of the last flush; `None` until the document has been
    /// written to disk at least once.
    pub(crate) persisted: Option<Vec<u8>>,
}

/// Transactional store of one document of type `R`.
pub struct Database<R> {
    file: StoreFile,
    state: RwLock<Snapshot<R>>,
    next_txn: AtomicU64,
}

impl<R: Document> Database<R> {
    /// Opens (or prepares to create) the store described by `config`.
    ///
    /// A missing or empty backing file yields `R::default()`; the file is
    /// created by the first write transaction.
    ///
    /// # Errors
    ///
    /// - `BLOG_CONFIG_INVALID` if the config fails validation
    /// - `BLOG_DATA_CORRUPTION` if the file fails framing, checksum or decoding
    /// - `BLOG_STORE_READ_FAILED` / `BLOG_STORE_IO_ERROR` on filesystem failure
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let file = StoreFile::prepare(&config)?;

        let snapshot = match file.read()? {
            Some(payload) => {
                let root: R = serde_json::from_slice(&payload).map_err(|e| {
                    StoreError::data_corruption(
                        file.path(),
                        format!("checksum-valid payload failed to decode: {}", e),
                    )
                })?;
                Snapshot {
                    root,
                    persisted: Some(payload),
                }
            }
            None => Snapshot {
                root: R::default(),
                persisted: None,
            },
        };

        info!(
            path = %file.path().display(),
            existing = snapshot.persisted.is_some(),
            "STORE_OPEN"
        );

        Ok(Self {
            file,
            state: RwLock::new(snapshot),
            next_txn: AtomicU64::new(1),
        })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub(crate) fn file(&self) -> &StoreFile {
        &self.file
    }

    /// Starts a read-only transaction on the last committed snapshot.
    pub fn begin_read(&self) -> ReadTransaction<'_, R> {
        let guard = self.state.read().unwrap_or_else(|poisoned| {
            warn!("STORE_LOCK_RECOVERED");
            poisoned.into_inner()
        });
        ReadTransaction {
            id: self.next_txn_id(),
            guard,
        }
    }

    /// Starts a read-write transaction. Blocks until every other
    /// transaction on this store has finished.
    pub fn begin_write(&self) -> WriteTransaction<'_, R> {
        // A panicking writer only ever touched its own working copy, so the
        // committed snapshot behind a poisoned lock is still consistent.
        let guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let working = guard.root.clone();
        WriteTransaction {
            id: self.next_txn_id(),
            db: self,
            guard,
            working,
        }
    }

    /// Runs `operation` inside a read-only transaction.
    pub fn read<T, F>(&self, operation: F) -> T
    where
        F: FnOnce(&R) -> T,
    {
        let txn = self.begin_read();
        operation(txn.root())
    }

    /// Runs `operation` inside a read-write transaction.
    ///
    /// `Ok` commits (flushing when the document changed); `Err` aborts and
    /// leaves memory and disk untouched.
    pub fn write<T, F>(&self, operation: F) -> StoreResult<T>
    where
        F: FnOnce(&mut R) -> StoreResult<T>,
    {
        let mut txn = self.begin_write();
        match operation(txn.root_mut()) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                txn.abort();
                Err(e)
            }
        }
    }

    fn next_txn_id(&self) -> u64 {
        self.next_txn.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    type Counters = BTreeMap<String, u64>;

    fn open_in(dir: &TempDir) -> Database<Counters> {
        Database::open(StoreConfig::new(dir.path().join("counters.store"))).unwrap()
    }

    #[test]
    fn test_fresh_store_is_default_and_not_on_disk() {
        let dir = TempDir::new().unwrap();
        let db = open_in(&dir);
        assert!(db.read(|root| root.is_empty()));
        assert!(!db.path().exists());
    }

    #[test]
    fn test_first_write_creates_file_even_without_changes() {
        let dir = TempDir::new().unwrap();
        let db = open_in(&dir);
        db.write(|_| Ok(())).unwrap();
        assert!(db.path().exists());
    }

    #[test]
    fn test_committed_write_visible_and_durable() {
        let dir = TempDir::new().unwrap();
        {
            let db = open_in(&dir);
            db.write(|root| {
                root.insert("hits".into(), 3);
                Ok(())
            })
            .unwrap();
            assert_eq!(db.read(|root| root.get("hits").copied()), Some(3));
        }

        let reopened = open_in(&dir);
        assert_eq!(reopened.read(|root| root.get("hits").copied()), Some(3));
    }

    #[test]
    fn test_failed_operation_aborts() {
        let dir = TempDir::new().unwrap();
        let db = open_in(&dir);
        db.write(|root| {
            root.insert("kept".into(), 1);
            Ok(())
        })
        .unwrap();
        let before = fs::read(db.path()).unwrap();

        let result: StoreResult<()> = db.write(|root| {
            root.insert("dropped".into(), 2);
            Err(StoreError::invalid_record("refused"))
        });

        assert!(result.is_err());
        assert!(db.read(|root| !root.contains_key("dropped")));
        assert_eq!(fs::read(db.path()).unwrap(), before);
    }

    #[test]
    fn test_dropped_write_transaction_aborts() {
        let dir = TempDir::new().unwrap();
        let db = open_in(&dir);
        {
            let mut txn = db.begin_write();
            txn.root_mut().insert("ghost".into(), 1);
        }
        assert!(db.read(|root| root.is_empty()));
    }

    #[test]
    fn test_unchanged_commit_skips_flush() {
        let dir = TempDir::new().unwrap();
        let db = open_in(&dir);
        let mut txn = db.begin_write();
        txn.root_mut().insert("a".into(), 1);
        assert!(txn.commit().unwrap());

        let mut txn = db.begin_write();
        txn.root_mut().insert("a".into(), 1);
        assert!(!txn.commit().unwrap());
    }

    #[test]
    fn test_changed_commit_with_equal_checksum_is_flushed() {
        // Same length and same CRC32, different bytes
        const BEFORE: &str = "gPXiOYsEXS";
        const AFTER: &str = "hvcmuzuUbK";

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("labels.store");
        {
            let db = Database::<BTreeMap<String, String>>::open(StoreConfig::new(&path)).unwrap();
            db.write(|root| {
                root.insert("label".into(), BEFORE.into());
                Ok(())
            })
            .unwrap();

            let mut txn = db.begin_write();
            txn.root_mut().insert("label".into(), AFTER.into());
            assert!(txn.commit().unwrap());
            assert_eq!(
                db.read(|root| root.get("label").cloned()),
                Some(AFTER.to_string())
            );
        }

        let reopened = Database::<BTreeMap<String, String>>::open(StoreConfig::new(&path)).unwrap();
        assert_eq!(
            reopened.read(|root| root.get("label").cloned()),
            Some(AFTER.to_string())
        );
    }

    #[test]
    fn test_reopen_then_unchanged_commit_skips_flush() {
        let dir = TempDir::new().unwrap();
        {
            let db = open_in(&dir);
            db.write(|root| {
                root.insert("a".into(), 1);
                Ok(())
            })
            .unwrap();
        }

        let db = open_in(&dir);
        assert!(!db.begin_write().commit().unwrap());
    }

    #[test]
    fn test_transaction_ids_increase() {
        let dir = TempDir::new().unwrap();
        let db = open_in(&dir);
        let first = db.begin_read().id();
        let second = db.begin_write().id();
        assert!(second > first);
    }

    #[test]
    fn test_undecodable_payload_is_corruption() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counters.store");
        let frame = super::super::format::encode_frame(b"[1,2,3]").unwrap();
        fs::write(&path, frame).unwrap();

        let err = Database::<Counters>::open(StoreConfig::new(&path))
            .err()
            .unwrap();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("decode"));
    }

    #[test]
    fn test_concurrent_writers_are_serialized() {
        use std::sync::Arc;
        use std::thread;

        let dir = TempDir::new().unwrap();
        let db = Arc::new(Database::<Counters>::open(
            StoreConfig::new(dir.path().join("counters.store"))
                .with_durability(super::super::config::Durability::Buffered),
        )
        .unwrap());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let db = Arc::clone(&db);
                thread::spawn(move || {
                    for _ in 0..25 {
                        db.write(|root| {
                            *root.entry("n".into()).or_insert(0) += 1;
                            Ok(())
                        })
                        .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(db.read(|root| root.get("n").copied()), Some(100));
    }
}
