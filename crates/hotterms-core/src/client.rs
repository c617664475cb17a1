use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{StoreStatus, TermRecord, TermStats};
use crate::store::TermStore;

/// Application handle built once at startup and cloned into every consumer.
#[derive(Clone)]
pub struct HotTerms {
    config: Arc<AppConfig>,
    store: Arc<TermStore>,
}

impl std::fmt::Debug for HotTerms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotTerms")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl HotTerms {
    pub fn open(config: AppConfig) -> Result<Self> {
        let store = TermStore::open(&config.store)?;
        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::open(AppConfig::from_env()?)
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &TermStore {
        &self.store
    }

    #[must_use]
    pub fn status(&self) -> StoreStatus {
        self.store.status()
    }

    /// Widget query: `None` means the configured default (30), always capped by capacity.
    #[must_use]
    pub fn top_terms(&self, limit: Option<usize>) -> Vec<TermRecord> {
        let limit = limit.unwrap_or_else(|| self.config.store.effective_default_limit());
        self.store.list(limit)
    }

    /// Fire-and-forget write after a user search. Failures are logged, never returned.
    pub fn record_search(&self, term: &str) {
        if let Err(err) = self.store.record(term) {
            tracing::debug!(code = err.code(), error = %err, "search term not recorded");
        }
    }

    pub fn record_term(&self, term: &str) -> Result<()> {
        self.store.record(term)
    }

    pub fn delete_term(&self, term: &str, credential: &str) -> Result<bool> {
        self.store.delete(term, credential)
    }

    pub fn clear_terms(&self, credential: &str) -> Result<usize> {
        self.store.clear_all(credential)
    }

    #[must_use]
    pub fn stats(&self) -> TermStats {
        self.store.stats()
    }

    /// Closes the backend if this is the last handle; otherwise a no-op.
    pub fn close(self) -> Result<()> {
        match Arc::try_unwrap(self.store) {
            Ok(store) => store.close(),
            Err(_) => Ok(()),
        }
    }
}
