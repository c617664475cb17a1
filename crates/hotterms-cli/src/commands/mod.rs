use anyhow::{Context, Result};
use hotterms_core::{AppConfig, HotTerms, HotTermsError};
use serde::Serialize;

use crate::cli::{Cli, Commands, RecordArgs};


pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let app = HotTerms::open(config).context("failed to open term store")?;
    tracing::debug!(backend = app.store().kind().as_str(), "term store opened");
    let outcome = run_command(&app, cli.command);
    app.close().context("failed to close term store")?;
    outcome
}

pub(crate) fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(data_dir) = &cli.data_dir {
        config.store.data_dir.clone_from(data_dir);
    }
    if let Some(backend) = cli.backend {
        config.store.backend = backend.into();
    }
    Ok(config)
}

fn run_command(app: &HotTerms, command: Commands) -> Result<()> {
    match command {
        Commands::Record(args) => {
            let recorded = record_terms(app, &args)?;
            print_json(&serde_json::json!({
                "status": "ok",
                "recorded": recorded,
            }))?;
        }
        Commands::List(args) => {
            print_json(&app.top_terms(args.limit))?;
        }
        Commands::Stats => {
            print_json(&app.stats())?;
        }
        Commands::Status => {
            print_json(&app.status())?;
        }
        Commands::Delete(args) => {
            let removed = app.delete_term(&args.term, &args.admin.password)?;
            print_json(&serde_json::json!({
                "status": "ok",
                "term": args.term.trim(),
                "removed": removed,
            }))?;
        }
        Commands::Clear(args) => {
            let removed = app.clear_terms(&args.password)?;
            print_json(&serde_json::json!({
                "status": "ok",
                "removed": removed,
            }))?;
        }
    }
    Ok(())
}

/// Number of recording calls that reached the store. Filtered terms count too.
fn record_terms(app: &HotTerms, args: &RecordArgs) -> Result<u64> {
    let mut recorded = 0_u64;
    for term in &args.terms {
        for _ in 0..args.times {
            app.record_term(term)
                .with_context(|| format!("failed to record {term:?}"))?;
            recorded += 1;
        }
    }
    Ok(recorded)
}

/// Store errors go to stderr as a JSON payload with a stable code; anything else as text.
pub(crate) fn report_error(operation: &str, err: &anyhow::Error) {
    let payload = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<HotTermsError>())
        .map(|store_err| store_err.to_payload(operation, None))
        .and_then(|payload| serde_json::to_string_pretty(&payload).ok());
    match payload {
        Some(json) => eprintln!("{json}"),
        None => eprintln!("error: {err:#}"),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
