#![allow(dead_code)]

pub mod contended_store;
pub mod fake_blob_store;
pub mod flaky_store;

use std::sync::Arc;

use log::LevelFilter;
use skillswap_core::{ConnectionGraphManager, MemoryStore};

use fake_blob_store::FakeBlobStore;

///   Logs will appear only when you run with `-- --nocapture`
///   or when the test fails.
pub fn init_test_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// A manager over a fresh in-memory store, plus handles on both collaborators.
pub fn manager() -> (ConnectionGraphManager, MemoryStore, FakeBlobStore) {
    init_test_logging();
    let store = MemoryStore::new();
    let blobs = FakeBlobStore::new();
    let manager = ConnectionGraphManager::new(Arc::new(store.clone()), Arc::new(blobs.clone()));
    (manager, store, blobs)
}
