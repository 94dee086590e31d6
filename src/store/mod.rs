//! Store subsystem
//!
//! A local, single-process, single-file transactional store. The whole
//! document is held in memory and rewritten to disk on every commit that
//! changes it.
//!
//! # Design Principles
//!
//! - One backing file per store, location always passed in by config
//! - Writers serialized, readers share the last committed snapshot
//! - A commit is durable before it becomes visible
//! - Whole-file atomic replace (temp file, fsync, rename, directory fsync)
//! - Checksum verified on every open; corruption halts startup
//!
//! # Layers
//!
//! - [`Database`]: generic transactional document store
//! - [`PostStore`]: posts keyed by id on top of a `Database<PostTable>`

mod config;
mod database;
mod errors;
mod file;
mod format;
mod posts;
mod transaction;

pub use config::{ConfigError, Durability, StoreConfig};
pub use database::{Database, Document};
pub use errors::{Severity, StoreError, StoreErrorCode, StoreResult};
pub use format::{decode_frame, encode_frame, FrameError, FORMAT_VERSION, MAGIC};
pub use posts::{PostStore, PostTable};
pub use transaction::{ReadTransaction, WriteTransaction};
