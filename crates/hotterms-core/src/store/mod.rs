use chrono::Utc;

use crate::auth::AdminCredential;
use crate::backend::{BackendInit, TermBackend, open_backend};
use crate::config::{STATS_TOP_TERMS, StoreConfig};
use crate::error::{HotTermsError, Result};
use crate::filter::ContentFilter;
use crate::models::{BackendKind, BackendMode, StoreStatus, TermRecord, TermStats};

/// Bounded ranked set of search terms over a [`TermBackend`].
///
/// Every accepted write is followed by capacity enforcement, so once a call
/// returns the store holds at most `max_entries` records: the highest-ranked ones.
/// Backend failures never panic. Writes and admin calls return them as errors,
/// reads degrade to empty results.
pub struct TermStore {
    backend: Box<dyn TermBackend>,
    mode: BackendMode,
    filter: ContentFilter,
    credential: AdminCredential,
    max_entries: usize,
    max_term_chars: usize,
}

impl std::fmt::Debug for TermStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermStore")
            .field("backend", &self.backend.kind())
            .field("mode", &self.mode)
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}

impl TermStore {
    /// Selects the backend (durable, else volatile) and builds the store.
    /// Fails only on invalid configuration such as a bad extra filter pattern.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Self::from_init(open_backend(config), config)
    }

    pub fn from_init(init: BackendInit, config: &StoreConfig) -> Result<Self> {
        let (backend, mode) = init.into_parts();
        Self::new(backend, mode, config)
    }

    pub fn new(
        backend: Box<dyn TermBackend>,
        mode: BackendMode,
        config: &StoreConfig,
    ) -> Result<Self> {
        if config.max_entries == 0 {
            return Err(HotTermsError::Validation(
                "max_entries must be at least 1".to_string(),
            ));
        }
        let filter = ContentFilter::with_extra_patterns(&config.extra_blocked_patterns)?;
        let credential = AdminCredential::new(&config.admin_password);
        if credential.is_default() {
            tracing::warn!("admin password is the documented default; override HOTTERMS_ADMIN_PASSWORD in production");
        }

        Ok(Self {
            backend,
            mode,
            filter,
            credential,
            max_entries: config.max_entries,
            max_term_chars: config.max_term_chars.max(1),
        })
    }

    #[must_use]
    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    #[must_use]
    pub const fn mode(&self) -> &BackendMode {
        &self.mode
    }

    #[must_use]
    pub const fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Counts one search for `term`, stamped with the wall clock. Terms caught by the
    /// content filter are dropped and still report success.
    pub fn record(&self, term: &str) -> Result<()> {
        self.record_at(term, Utc::now().timestamp_millis())
    }

    /// [`Self::record`] with an explicit `last_searched` timestamp (epoch ms).
    pub fn record_at(&self, term: &str, at_ms: i64) -> Result<()> {
        let term = self.validate_term(term)?;
        if self.filter.is_blocked(term) {
            tracing::debug!("discarded term matching content filter");
            return Ok(());
        }

        self.backend
            .upsert_increment(term, at_ms)
            .inspect_err(|err| log_backend_failure("record", err))?;
        self.enforce_capacity()
            .inspect_err(|err| log_backend_failure("enforce_capacity", err))
    }

    /// Up to `limit` records in ranking order; `limit` is clamped to capacity.
    #[must_use]
    pub fn list(&self, limit: usize) -> Vec<TermRecord> {
        let limit = limit.min(self.max_entries);
        if limit == 0 {
            return Vec::new();
        }
        self.backend
            .list_ranked(limit)
            .inspect_err(|err| log_backend_failure("list", err))
            .unwrap_or_default()
    }

    pub fn get(&self, term: &str) -> Result<Option<TermRecord>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(None);
        }
        self.backend
            .get(term)
            .inspect_err(|err| log_backend_failure("get", err))
    }

    /// Removes `term`. Returns `Ok(false)` when it was not stored.
    pub fn delete(&self, term: &str, credential: &str) -> Result<bool> {
        self.credential.authorize(credential)?;
        let term = term.trim();
        if term.is_empty() {
            return Ok(false);
        }
        let removed = self
            .backend
            .delete(term)
            .inspect_err(|err| log_backend_failure("delete", err))?;
        if removed {
            tracing::info!("admin deleted a term");
        }
        Ok(removed)
    }

    pub fn clear_all(&self, credential: &str) -> Result<usize> {
        self.credential.authorize(credential)?;
        let removed = self
            .backend
            .clear()
            .inspect_err(|err| log_backend_failure("clear_all", err))?;
        tracing::info!(removed, "admin cleared all terms");
        Ok(removed)
    }

    #[must_use]
    pub fn stats(&self) -> TermStats {
        self.backend
            .snapshot(STATS_TOP_TERMS)
            .inspect_err(|err| log_backend_failure("stats", err))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn status(&self) -> StoreStatus {
        let kind = self.backend.kind();
        let entries = self
            .backend
            .count()
            .inspect_err(|err| log_backend_failure("status", err))
            .unwrap_or_default();
        StoreStatus {
            backend: kind,
            mode: self.mode.clone(),
            persistent: kind.is_durable() && self.mode.is_durable(),
            entries,
            max_entries: self.max_entries,
            default_admin_password: self.credential.is_default(),
        }
    }

    /// Releases the backend's file handles.
    pub fn close(self) -> Result<()> {
        self.backend.close()
    }

    fn validate_term<'a>(&self, term: &'a str) -> Result<&'a str> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return Err(HotTermsError::Validation(
                "term must not be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > self.max_term_chars {
            return Err(HotTermsError::Validation(format!(
                "term exceeds {} characters",
                self.max_term_chars
            )));
        }
        Ok(trimmed)
    }

    fn enforce_capacity(&self) -> Result<()> {
        let count = self.backend.count()?;
        if count <= self.max_entries {
            return Ok(());
        }
        let evicted = self.backend.retain_top(self.max_entries)?;
        tracing::debug!(evicted, max_entries = self.max_entries, "evicted lowest-ranked terms");
        Ok(())
    }
}

fn log_backend_failure(operation: &'static str, err: &HotTermsError) {
    tracing::warn!(operation, code = err.code(), error = %err, "term store backend operation failed");
}
