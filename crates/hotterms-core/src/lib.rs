// Public fallible APIs in this crate share one concrete error contract (`HotTermsError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod auth;
pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod ranking;
pub mod store;

pub use client::HotTerms;
pub use config::{AppConfig, BackendPreference, StoreConfig};
pub use error::{HotTermsError, Result};
pub use models::{BackendKind, BackendMode, StoreStatus, TermRecord, TermStats};
pub use store::TermStore;
