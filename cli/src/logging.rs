//! Tracing setup for the CLI.
//!
//! `RUST_LOG` takes precedence over the default `warn` filter. Logs go to
//! stderr unless the settings name a log directory, in which case they go
//! to a daily rolling file there.

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use scrypt_params_host::Settings;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Prefix of the rolling log files.
pub const LOG_FILE_PREFIX: &str = "scrypt-params.log";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the rest of `main`.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created.
pub fn init_tracing(settings: &Settings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let Some(dir) = settings.log_directory.as_deref() else {
        let init_result = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        if let Err(err) = init_result {
            tracing::warn!(error = %err, "tracing already initialized; skipping setup");
        }
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX));

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    if let Err(err) = init_result {
        tracing::warn!(error = %err, "tracing already initialized; skipping setup");
    }
    Ok(Some(guard))
}
