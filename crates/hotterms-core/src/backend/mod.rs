use crate::config::{BackendPreference, StoreConfig};
use crate::error::{HotTermsError, Result};
use crate::models::{BackendKind, BackendMode, TermRecord, TermStats};

mod memory;
mod sqlite;

pub use memory::MemoryTermBackend;
pub use sqlite::SqliteTermBackend;

/// Raw storage under [`crate::store::TermStore`]. Implementations synchronize internally
/// and must make `upsert_increment` atomic per term.
pub trait TermBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Inserts `term` with score 1, or bumps its score and `last_searched` in one step.
    fn upsert_increment(&self, term: &str, now_ms: i64) -> Result<TermRecord>;

    fn get(&self, term: &str) -> Result<Option<TermRecord>>;

    /// Records in ranking order, at most `limit` of them.
    fn list_ranked(&self, limit: usize) -> Result<Vec<TermRecord>>;

    fn count(&self) -> Result<usize>;

    /// Row count and the top `limit` records read under one lock, so the two agree.
    fn snapshot(&self, limit: usize) -> Result<TermStats>;

    fn delete(&self, term: &str) -> Result<bool>;

    fn clear(&self) -> Result<usize>;

    /// Deletes every record ranked below the first `keep`; returns how many went.
    fn retain_top(&self, keep: usize) -> Result<usize>;

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

pub enum BackendInit {
    Durable(SqliteTermBackend),
    Volatile {
        backend: MemoryTermBackend,
        reason: String,
    },
}

impl std::fmt::Debug for BackendInit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendInit")
            .field("mode", &self.mode())
            .finish_non_exhaustive()
    }
}

impl BackendInit {
    #[must_use]
    pub fn mode(&self) -> BackendMode {
        match self {
            Self::Durable(_) => BackendMode::Durable,
            Self::Volatile { reason, .. } => BackendMode::Volatile {
                reason: reason.clone(),
            },
        }
    }

    #[must_use]
    pub fn into_parts(self) -> (Box<dyn TermBackend>, BackendMode) {
        let mode = self.mode();
        let backend: Box<dyn TermBackend> = match self {
            Self::Durable(backend) => Box::new(backend),
            Self::Volatile { backend, .. } => Box::new(backend),
        };
        (backend, mode)
    }
}

/// Picks the backend once at startup. A durable init failure degrades to the
/// volatile backend instead of failing; the reason is kept for status and logs.
#[must_use]
pub fn open_backend(config: &StoreConfig) -> BackendInit {
    if config.backend == BackendPreference::Memory {
        tracing::info!("term store using volatile backend by configuration");
        return BackendInit::Volatile {
            backend: MemoryTermBackend::new(),
            reason: "configured".to_string(),
        };
    }

    let db_path = config.db_path();
    match SqliteTermBackend::open(&db_path) {
        Ok(backend) => {
            tracing::info!(path = %db_path.display(), "term store using sqlite backend");
            BackendInit::Durable(backend)
        }
        Err(err) => {
            let unavailable =
                HotTermsError::BackendUnavailable(format!("{}: {err}", db_path.display()));
            tracing::warn!(
                error = %unavailable,
                preference = config.backend.as_str(),
                "sqlite backend failed to initialize; falling back to volatile memory backend"
            );
            BackendInit::Volatile {
                backend: MemoryTermBackend::new(),
                reason: unavailable.to_string(),
            }
        }
    }
}
