pub mod auth;
pub mod blob;
pub mod errors;
pub mod graph;
pub mod profile;
pub mod store;
pub mod utils;

// re‑export ergonomic entry points
pub use auth::{AccountService, AuthConfig};
pub use errors::{BlobError, GraphError, StoreError};
pub use graph::manager::ConnectionGraphManager;
pub use graph::{Decision, RequestOutcome, ResolveOutcome};
pub use profile::{Profile, ProfileId, ProfileUpdate, UserId, Visibility};
pub use store::memory::MemoryStore;
