//! Logging setup
//!
//! Logging is off unless ARSIP_LOG is set (e.g. `ARSIP_LOG=debug`).
//! CLI commands log to stderr; the TUI logs to a file so it doesn't
//! corrupt the terminal.

use std::fs::File;
use std::sync::Mutex;

use arsip_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ARSIP_LOG";

fn env_filter() -> Option<EnvFilter> {
    let level = std::env::var(LOG_ENV).ok()?;
    Some(EnvFilter::new(format!(
        "arsip_core={},arsip_cli={}",
        level, level
    )))
}

/// Initialize stderr logging for CLI commands
pub fn init_stderr() {
    let Some(env_filter) = env_filter() else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialize logging for TUI mode
///
/// Logs to file (config.log_file or default {data_dir}/debug.log).
pub fn init_file(config: &Config) {
    let Some(env_filter) = env_filter() else {
        return;
    };

    if let Err(e) = config.ensure_data_dir() {
        eprintln!("Warning: {}", e);
        return;
    }

    let log_path = config.log_path();
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
