//! File-backed implementations of the skill-swap storage seams.

pub mod blob;
pub mod store;

pub use blob::LocalBlobStore;
pub use store::JsonFileStore;
