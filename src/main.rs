#![forbid(unsafe_code)]

mod color;
mod config;
mod constants;
mod error;
mod gui;
mod lifecycle;
mod panel;
mod pin;
mod tray;
mod types;

use clap::Parser;
use std::path::PathBuf;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use config::JsonConfigStore;

/// Always-on-top web widgets with a tray-resident settings window
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Widget collection file (defaults to the per-user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// trace, debug, info, warn or error; falls back to LOG_LEVEL
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn parse_log_level(level: &str) -> TraceLevel {
    match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = parse_log_level(
        &cli.log_level
            .clone()
            .or_else(|| std::env::var("LOG_LEVEL").ok())
            .unwrap_or_else(|| "info".to_string()),
    );

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let store = match cli.config {
        Some(path) => JsonConfigStore::new(path),
        None => JsonConfigStore::at_default_path(),
    };
    info!(path = %store.path().display(), "Using widget config");

    gui::run_gui(store)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG"), TraceLevel::DEBUG);
        assert_eq!(parse_log_level("warn"), TraceLevel::WARN);
        assert_eq!(parse_log_level("verbose"), TraceLevel::INFO);
    }

    #[test]
    fn test_cli_accepts_config_path() {
        let cli = Cli::parse_from(["web-widgets", "--config", "/tmp/w.json", "--log-level", "debug"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/w.json")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }
}
