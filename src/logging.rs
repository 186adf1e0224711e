//! Logging initialization for filedrop.
//!
//! Log lines go to stdout and, in the full setup, to the configured log
//! file as well. `RUST_LOG` directives take precedence over the configured
//! level, so individual targets can be turned up without touching the
//! config file.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(config.tracing_level().into())
}

/// Initialize logging to stdout and the configured log file.
///
/// Creates the log file's parent directory if needed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if let Some(parent) = Path::new(&config.file).parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let log_file = Arc::new(File::create(&config.file)?);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stdout.and(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Initialize stdout-only logging, used when the log file cannot be opened.
pub fn init_console_only(config: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .init();
}
