use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;


pub use args::{AdminArgs, BackendArg, DeleteArgs, ListArgs, RecordArgs};

#[derive(Debug, Parser)]
#[command(name = "hotterms")]
#[command(about = "Trending search term store", version)]
pub struct Cli {
    /// Data directory for the sqlite file (overrides config and `HOTTERMS_DATA_DIR`).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// TOML config file (falls back to `HOTTERMS_CONFIG`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Record(RecordArgs),
    List(ListArgs),
    Stats,
    Status,
    Delete(DeleteArgs),
    Clear(AdminArgs),
}

impl Commands {
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::List(_) => "list",
            Self::Stats => "stats",
            Self::Status => "status",
            Self::Delete(_) => "delete",
            Self::Clear(_) => "clear",
        }
    }
}
