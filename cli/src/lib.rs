//! `scrypt-params` command-line front end.
//!
//! Loads [`Settings`], installs logging, then runs one command against
//! `scrypt-params-host`. Results go to stdout as JSON; host errors go to
//! stderr as `{code, message}` and set the exit status.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod commands;
pub mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use scrypt_params_host::settings::SETTINGS_FILE;
use scrypt_params_host::{HostError, Settings};

use commands::params::ParamsArgs;
use commands::salt::SaltArgs;

/// Pick scrypt cost parameters for this machine.
#[derive(Debug, Parser)]
#[command(name = "scrypt-params", version, about)]
pub struct Cli {
    /// Settings file (defaults to `scrypt-params.json` in the working directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose `{N, r, p}` for a time and memory budget.
    Params(ParamsArgs),
    /// Generate a random salt.
    Salt(SaltArgs),
}

impl Cli {
    /// Settings path named on the command line, or the default file.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }
}

/// Run a parsed command line.
///
/// Host errors are reported on stderr and mapped to the exit status; the
/// returned error covers failures outside the search itself (logging setup,
/// runtime construction, writing the output).
///
/// # Errors
///
/// Returns an error if a named settings file is missing or corrupt, or the command
/// cannot be carried out for reasons other than a host error.
pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let path = cli.settings_path();
    let (settings, ignored) = load_settings(&path, cli.config.is_some())?;
    let _guard = logging::init_tracing(&settings)?;
    if let Some(err) = ignored {
        tracing::warn!(path = %path.display(), error = %err, "ignoring corrupt settings file");
    }
    tracing::debug!(?settings, "loaded settings");

    match &cli.command {
        Command::Params(args) => report(commands::params::execute(args, &settings)?),
        Command::Salt(args) => report(commands::salt::execute(args, &settings)),
    }
}

/// An explicitly named settings file must exist and parse. The default file
/// may be absent; if it is unreadable the defaults are used and the error is
/// handed back so it can be logged once logging is up.
fn load_settings(
    path: &Path,
    explicit: bool,
) -> anyhow::Result<(Settings, Option<std::io::Error>)> {
    if explicit {
        let settings = Settings::try_load(path)
            .with_context(|| format!("Cannot load settings file {}", path.display()))?;
        return Ok((settings, None));
    }
    match Settings::try_load(path) {
        Ok(settings) => Ok((settings, None)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok((Settings::default(), None)),
        Err(e) => Ok((Settings::default(), Some(e))),
    }
}

fn report<T: Serialize>(result: Result<T, HostError>) -> anyhow::Result<ExitCode> {
    match result {
        Ok(value) => {
            let json = serde_json::to_string(&value).context("Failed to encode result")?;
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let json = serde_json::to_string(&err).context("Failed to encode error")?;
            eprintln!("{json}");
            Ok(ExitCode::from(exit_status(&err)))
        }
    }
}

/// Exit status for a host error: its code, saturated to the `u8` range.
#[must_use]
pub fn exit_status(err: &HostError) -> u8 {
    u8::try_from(err.code).unwrap_or(u8::MAX)
}
