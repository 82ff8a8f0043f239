//! CLI subcommands and the context they share.

pub mod assets;
pub mod batch;
pub mod config;
pub mod invoice;
pub mod ledger;
pub mod pay;
pub mod render;
pub mod totals;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tracing::debug;

use bizledger_core::models::config::AppConfig;
use bizledger_core::models::rows::BusinessRow;
use bizledger_core::store::repository::resolve_business;
use bizledger_core::store::{InMemoryStore, StaticAuth};

/// Configuration and data location resolved from global options.
pub struct Context {
    pub config: AppConfig,
    data: Option<PathBuf>,
}

impl Context {
    pub fn new(config_path: Option<&str>, data: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => AppConfig::from_file(Path::new(path))
                .with_context(|| format!("Failed to read config {}", path))?,
            None => {
                let default = config::default_config_path();
                if default.exists() {
                    AppConfig::from_file(&default)?
                } else {
                    AppConfig::default()
                }
            }
        };
        Ok(Self { config, data })
    }

    fn data_path(&self) -> anyhow::Result<&Path> {
        self.data
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No data snapshot given. Pass --data <file>."))
    }

    /// Directory relative image paths resolve against when the config sets none.
    pub fn asset_base_dir(&self) -> Option<PathBuf> {
        self.data
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
    }

    /// Open the data snapshot.
    pub fn open_store(&self) -> anyhow::Result<InMemoryStore> {
        let path = self.data_path()?;
        if !path.exists() {
            anyhow::bail!("Data snapshot not found: {}", path.display());
        }
        debug!("Opening data snapshot {}", path.display());
        Ok(InMemoryStore::load(path)?)
    }

    /// Write the data snapshot back.
    pub fn save_store(&self, store: &InMemoryStore) -> anyhow::Result<()> {
        let path = self.data_path()?;
        store.save(path)?;
        debug!("Saved data snapshot {}", path.display());
        Ok(())
    }

    /// Business to act for: `--business`, then the configured session.
    pub fn business(
        &self,
        store: &InMemoryStore,
        preferred: Option<&str>,
    ) -> anyhow::Result<BusinessRow> {
        let session = &self.config.session;
        let auth = match &session.user_id {
            Some(user_id) => StaticAuth::signed_in(user_id.as_str()),
            None => StaticAuth::anonymous(),
        };
        let preferred = preferred.or(session.business_id.as_deref());
        Ok(resolve_business(store, &auth, preferred)?)
    }
}
