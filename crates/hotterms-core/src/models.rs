use serde::{Deserialize, Serialize};

/// One tracked search term. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRecord {
    pub term: String,
    pub score: u64,
    pub last_searched: i64,
    pub created_at: i64,
}

impl TermRecord {
    #[must_use]
    pub fn first_seen(term: impl Into<String>, now_ms: i64) -> Self {
        Self {
            term: term.into(),
            score: 1,
            last_searched: now_ms,
            created_at: now_ms,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermStats {
    pub total: usize,
    pub top_terms: Vec<TermRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Sqlite,
    Memory,
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }

    #[must_use]
    pub const fn is_durable(self) -> bool {
        matches!(self, Self::Sqlite)
    }
}

/// Which backend ended up serving the store, and why if it is not the durable one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BackendMode {
    Durable,
    Volatile { reason: String },
}

impl BackendMode {
    #[must_use]
    pub const fn is_durable(&self) -> bool {
        matches!(self, Self::Durable)
    }

    #[must_use]
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Self::Durable => None,
            Self::Volatile { reason } => Some(reason.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    pub backend: BackendKind,
    #[serde(flatten)]
    pub mode: BackendMode,
    pub persistent: bool,
    pub entries: usize,
    pub max_entries: usize,
    pub default_admin_password: bool,
}
