use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

mod env;
mod store;

pub use store::{
    BackendPreference, DEFAULT_DATA_DIR, DEFAULT_DB_FILE_NAME, DEFAULT_LIST_LIMIT,
    DEFAULT_MAX_ENTRIES, DEFAULT_MAX_TERM_CHARS, ENV_ADMIN_PASSWORD, ENV_BACKEND, ENV_DATA_DIR,
    ENV_DEFAULT_LIST_LIMIT, ENV_MAX_ENTRIES, ENV_MAX_TERM_CHARS, STATS_TOP_TERMS, StoreConfig,
};

pub const ENV_CONFIG_PATH: &str = "HOTTERMS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    store: store::StoreFileConfig,
}

impl AppConfig {
    /// Defaults, then the TOML file (explicit path or `HOTTERMS_CONFIG`), then env overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with(config_path, env::std_env_lookup)
    }

    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    pub fn load_with(
        config_path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();
        let file_path = config_path
            .map(Path::to_path_buf)
            .or_else(|| env::non_empty(lookup(ENV_CONFIG_PATH)).map(PathBuf::from));
        if let Some(path) = file_path {
            config.apply_toml(&std::fs::read_to_string(path)?)?;
        }
        config.store.apply_env(&lookup)?;
        Ok(config)
    }

    pub fn apply_toml(&mut self, raw: &str) -> Result<()> {
        let file: FileConfig = toml::from_str(raw)?;
        self.store.apply_file(file.store)
    }
}

#[cfg(test)]
mod tests;
