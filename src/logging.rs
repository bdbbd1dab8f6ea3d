//! Process-wide `tracing` subscriber setup.
//!
//! Verbosity comes from `RUST_LOG` (default `info`). When `HOMEWORK_LOG_FILE` is set,
//! events are appended to that file without colours; otherwise they go to stderr.
//! Initialisation is idempotent and never panics.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

static LOGGING_INIT: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber from the environment.
pub fn init_logging() {
    let filter = std::env::var("RUST_LOG").ok();
    let log_file = std::env::var("HOMEWORK_LOG_FILE")
        .ok()
        .filter(|p| !p.trim().is_empty());
    if let Err(e) = init_logging_with(filter.as_deref(), log_file.as_deref().map(Path::new)) {
        eprintln!("[LOGGING] {e}; falling back to stderr");
        init_logging_with(filter.as_deref(), None).ok();
    }
}

/// Installs the global subscriber once. Later calls are no-ops returning `Ok`.
/// An unparsable filter falls back to the default level.
pub fn init_logging_with(filter: Option<&str>, log_file: Option<&Path>) -> Result<(), String> {
    if LOGGING_INIT.get().is_some() {
        return Ok(());
    }
    let env_filter = build_filter(filter);

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("cannot open log file `{}`: {e}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    if installed.is_err() {
        // Another subscriber (e.g. a test harness) is already global.
        tracing::debug!(target = "logging", "global subscriber already installed");
    }
    let _ = LOGGING_INIT.set(());
    Ok(())
}

fn build_filter(filter: Option<&str>) -> EnvFilter {
    filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_filter_falls_back_to_default() {
        let filter = build_filter(Some("this=is=not=valid"));
        assert!(filter.to_string().contains(DEFAULT_FILTER));
    }

    #[test]
    fn repeated_init_is_ok() {
        init_logging_with(Some("debug"), None).unwrap();
        init_logging_with(Some("warn"), None).unwrap();
    }
}
