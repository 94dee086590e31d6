//! Shared helpers for integration tests
//!
//! - Temp store locations (real filesystem, no mocks)
//! - Fixed timestamps
//! - Log capture through the test writer

#![allow(dead_code)]

use std::collections::HashMap;

use aeroblog::store::{Durability, StoreConfig};
use aeroblog::{Post, PostAttributes, PostStore};
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

/// Route `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aeroblog=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Seconds since the epoch as a UTC timestamp
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// Store config inside `dir`; fsync stays on so tests cover the real path.
pub fn config_in(dir: &TempDir) -> StoreConfig {
    StoreConfig::new(dir.path().join("blog.store"))
}

/// Store config inside `dir` without fsync, for tests that write a lot.
pub fn buffered_config_in(dir: &TempDir) -> StoreConfig {
    config_in(dir).with_durability(Durability::Buffered)
}

/// Fresh temp dir plus an empty store inside it
pub fn open_temp_store() -> (TempDir, PostStore) {
    init_tracing();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = PostStore::open(config_in(&dir)).expect("Failed to open store");
    (dir, store)
}

/// Form-style parameters from string pairs
pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A pre-built post for seeding
pub fn seed_post(id: &str, title: &str, created_at: i64) -> Post {
    Post::new(id, PostAttributes::new(title), at(created_at))
}
