//! Read and write transactions over a [`Database`](super::Database).
//!
//! A read transaction borrows the committed snapshot under a shared lock.
//! A write transaction holds the exclusive lock and mutates a private
//! working copy; the committed snapshot only changes when `commit` has
//! flushed the working copy to disk.

use std::sync::{RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error};

use super::database::{Database, Document, Snapshot};
use super::errors::{StoreError, StoreResult};

/// Shared-lock view of the last committed snapshot.
pub struct ReadTransaction<'a, R> {
    pub(crate) id: u64,
    pub(crate) guard: RwLockReadGuard<'a, Snapshot<R>>,
}

impl<'a, R> ReadTransaction<'a, R> {
    /// Transaction id, unique within the database instance
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The committed document
    pub fn root(&self) -> &R {
        &self.guard.root
    }
}

/// Exclusive-lock transaction over a working copy of the document.
///
/// Dropping the transaction without calling [`commit`](Self::commit)
/// discards every change.
pub struct WriteTransaction<'a, R: Document> {
    pub(crate) id: u64,
    pub(crate) db: &'a Database<R>,
    pub(crate) guard: RwLockWriteGuard<'a, Snapshot<R>>,
    pub(crate) working: R,
}

impl<'a, R: Document> WriteTransaction<'a, R> {
    /// Transaction id, unique within the database instance
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The working copy
    pub fn root(&self) -> &R {
        &self.working
    }

    /// Mutable access to the working copy
    pub fn root_mut(&mut self) -> &mut R {
        &mut self.working
    }

    /// Flushes the working copy and publishes it as the committed snapshot.
    ///
    /// Returns `false` when the document is byte-identical to the last
    /// flush and the file was left alone. On error neither the file nor the
    /// committed snapshot has changed.
    pub fn commit(self) -> StoreResult<bool> {
        let WriteTransaction {
            id,
            db,
            mut guard,
            working,
        } = self;

        let payload = serde_json::to_vec(&working).map_err(|e| {
            StoreError::encode_failed(format!("Failed to encode document in txn {}: {}", id, e))
        })?;

        if guard.persisted.as_deref() == Some(payload.as_slice()) {
            debug!(txn_id = id, "TX_COMMIT_UNCHANGED");
            return Ok(false);
        }

        if let Err(e) = db.file().write(&payload) {
            error!(txn_id = id, error = %e, "TX_COMMIT_FAILED");
            return Err(e);
        }

        debug!(txn_id = id, bytes = payload.len(), "TX_COMMIT");

        guard.root = working;
        guard.persisted = Some(payload);

        Ok(true)
    }

    /// Discards the working copy.
    pub fn abort(self) {
        debug!(txn_id = self.id, "TX_ABORT");
    }
}
