use std::{path::PathBuf, sync::Arc};

use skillswap_core::{AccountService, ConnectionGraphManager};
use skillswap_storage::{JsonFileStore, LocalBlobStore};
use tracing::info;

use super::config::Config;

pub struct State {
    pub graph: ConnectionGraphManager,
    pub accounts: AccountService,
    /// Directory served under `/uploads`.
    pub uploads_dir: PathBuf,
}

impl State {
    pub fn new(
        graph: ConnectionGraphManager,
        accounts: AccountService,
        uploads_dir: PathBuf,
    ) -> Arc<Self> {
        Arc::new(Self {
            graph,
            accounts,
            uploads_dir,
        })
    }

    /// File-backed state: documents and photos both live under the data directory.
    pub fn from_config(config: &Config) -> anyhow::Result<Arc<Self>> {
        let store = match &config.data_dir {
            Some(dir) => JsonFileStore::with_dir(dir)?,
            None => JsonFileStore::new()?,
        };
        info!("Storing documents in {:?}", store.root());

        let uploads_dir = store.root().join("uploads");
        let public_base = format!("{}/uploads", config.public_url.trim_end_matches('/'));
        let blobs = LocalBlobStore::new(&uploads_dir, public_base)?;

        let store = Arc::new(store);
        let graph = ConnectionGraphManager::new(store.clone(), Arc::new(blobs));
        let accounts = AccountService::new(store, &config.auth);

        Ok(Self::new(graph, accounts, uploads_dir))
    }
}
