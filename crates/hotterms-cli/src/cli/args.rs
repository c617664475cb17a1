use clap::{Args, ValueEnum};
use hotterms_core::BackendPreference;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Auto,
    Sqlite,
    Memory,
}

impl From<BackendArg> for BackendPreference {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Auto => Self::Auto,
            BackendArg::Sqlite => Self::Sqlite,
            BackendArg::Memory => Self::Memory,
        }
    }
}

#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Search terms to record, one recording each (per `--times`).
    #[arg(required = true, allow_hyphen_values = true)]
    pub terms: Vec<String>,
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub times: u32,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Defaults to the configured list limit (30), capped at capacity.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[arg(allow_hyphen_values = true)]
    pub term: String,
    #[command(flatten)]
    pub admin: AdminArgs,
}

#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin password (`HOTTERMS_ADMIN_PASSWORD` on the store side).
    #[arg(long)]
    pub password: String,
}
