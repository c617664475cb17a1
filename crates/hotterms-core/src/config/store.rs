use std::path::PathBuf;

use serde::Deserialize;

use crate::auth::DEFAULT_ADMIN_PASSWORD;
use crate::error::{HotTermsError, Result};

use super::env::{non_empty, parse_usize_at_least};

pub const ENV_DATA_DIR: &str = "HOTTERMS_DATA_DIR";
pub const ENV_BACKEND: &str = "HOTTERMS_BACKEND";
pub const ENV_MAX_ENTRIES: &str = "HOTTERMS_MAX_ENTRIES";
pub const ENV_DEFAULT_LIST_LIMIT: &str = "HOTTERMS_DEFAULT_LIST_LIMIT";
pub const ENV_MAX_TERM_CHARS: &str = "HOTTERMS_MAX_TERM_CHARS";
pub const ENV_ADMIN_PASSWORD: &str = "HOTTERMS_ADMIN_PASSWORD";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DB_FILE_NAME: &str = "hotterms.sqlite3";
pub const DEFAULT_MAX_ENTRIES: usize = 50;
pub const DEFAULT_LIST_LIMIT: usize = 30;
pub const DEFAULT_MAX_TERM_CHARS: usize = 100;
pub const STATS_TOP_TERMS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    /// Durable first, volatile on init failure.
    #[default]
    Auto,
    /// Same as `Auto`; a durable init failure still degrades instead of aborting.
    Sqlite,
    Memory,
}

impl BackendPreference {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "sqlite" | "durable" => Ok(Self::Sqlite),
            "memory" | "volatile" => Ok(Self::Memory),
            other => Err(HotTermsError::Validation(format!(
                "invalid {ENV_BACKEND}: {other} (expected auto|sqlite|memory)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub backend: BackendPreference,
    pub max_entries: usize,
    pub default_list_limit: usize,
    pub max_term_chars: usize,
    pub admin_password: String,
    pub extra_blocked_patterns: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            backend: BackendPreference::Auto,
            max_entries: DEFAULT_MAX_ENTRIES,
            default_list_limit: DEFAULT_LIST_LIMIT,
            max_term_chars: DEFAULT_MAX_TERM_CHARS,
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            extra_blocked_patterns: Vec::new(),
        }
    }
}

/// `[store]` table of the optional TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct StoreFileConfig {
    pub(super) data_dir: Option<PathBuf>,
    pub(super) db_file_name: Option<String>,
    pub(super) backend: Option<BackendPreference>,
    pub(super) max_entries: Option<usize>,
    pub(super) default_list_limit: Option<usize>,
    pub(super) max_term_chars: Option<usize>,
    pub(super) admin_password: Option<String>,
    #[serde(default)]
    pub(super) extra_blocked_patterns: Vec<String>,
}

impl StoreConfig {
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    /// A default list request, capped by capacity.
    #[must_use]
    pub fn effective_default_limit(&self) -> usize {
        self.default_list_limit.min(self.max_entries)
    }

    pub(super) fn apply_file(&mut self, file: StoreFileConfig) -> Result<()> {
        if let Some(data_dir) = file.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(name) = non_empty(file.db_file_name) {
            self.db_file_name = name;
        }
        if let Some(backend) = file.backend {
            self.backend = backend;
        }
        if let Some(max_entries) = file.max_entries {
            self.max_entries = require_positive("max_entries", max_entries)?;
        }
        if let Some(limit) = file.default_list_limit {
            self.default_list_limit = limit;
        }
        if let Some(max_chars) = file.max_term_chars {
            self.max_term_chars = require_positive("max_term_chars", max_chars)?;
        }
        if let Some(password) = file.admin_password {
            self.admin_password = password;
        }
        self.extra_blocked_patterns
            .extend(file.extra_blocked_patterns);
        Ok(())
    }

    pub(super) fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(data_dir) = non_empty(lookup(ENV_DATA_DIR)) {
            self.data_dir = PathBuf::from(data_dir);
        }
        if let Some(raw) = lookup(ENV_BACKEND) {
            self.backend = BackendPreference::parse(&raw)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_MAX_ENTRIES)) {
            self.max_entries = parse_usize_at_least(ENV_MAX_ENTRIES, &raw, 1)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_DEFAULT_LIST_LIMIT)) {
            self.default_list_limit = parse_usize_at_least(ENV_DEFAULT_LIST_LIMIT, &raw, 0)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_MAX_TERM_CHARS)) {
            self.max_term_chars = parse_usize_at_least(ENV_MAX_TERM_CHARS, &raw, 1)?;
        }
        // Raw value: surrounding whitespace is part of the secret.
        if let Some(password) = lookup(ENV_ADMIN_PASSWORD).filter(|value| !value.is_empty()) {
            self.admin_password = password;
        }
        Ok(())
    }
}

fn require_positive(field: &str, value: usize) -> Result<usize> {
    if value == 0 {
        Err(HotTermsError::Validation(format!(
            "store.{field} must be at least 1"
        )))
    } else {
        Ok(value)
    }
}
