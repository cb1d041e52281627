//! Builds the store and executor the commands share from a loaded config.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use setdesk_clients::{OktaClient, SlackClient};
use setdesk_core::config::{Config, StoreBackend, WarnLevel};
use setdesk_core::db::RedbStore;
use setdesk_core::{Executor, MemoryStore, RecordStore};

/// Load the config, log its warnings, and refuse to continue on errors.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::load(path).context("failed to load config")?;
    let warnings = config.validate();
    for w in &warnings {
        match w.level {
            WarnLevel::Warning => tracing::warn!("config: {}", w.message),
            WarnLevel::Error => tracing::error!("config: {}", w.message),
        }
    }
    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("invalid config; run `setdesk config validate` for details");
    }
    Ok(config)
}

pub fn open_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    match config.store.backend {
        StoreBackend::Redb => {
            let path = &config.store.path;
            let store = RedbStore::open(path)
                .with_context(|| format!("failed to open store at {}", path.display()))?;
            tracing::debug!(path = %path.display(), "opened redb store");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory store; records are lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Wire the Okta and Slack clients into an executor over `store`.
///
/// Must be called, and the executor dropped, outside any async runtime.
pub fn build_executor(config: &Config, store: Arc<dyn RecordStore>) -> anyhow::Result<Executor> {
    let okta = OktaClient::new(&config.okta).context("failed to build Okta client")?;
    let slack = SlackClient::new(&config.slack).context("failed to build Slack client")?;
    Ok(Executor::new(
        store,
        Arc::new(okta),
        Arc::new(slack),
        Arc::new(config.rotation()),
        config.okta.groups.clone(),
    ))
}
