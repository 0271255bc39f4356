//! `scrypt-params salt`.

use clap::Args;

use scrypt_params_host::{generate_salt, HostError, SaltDto, Settings};

/// Arguments of the `salt` subcommand.
#[derive(Debug, Args)]
pub struct SaltArgs {
    /// Salt length in bytes (defaults to the settings file, then 32).
    #[arg(long, value_name = "BYTES")]
    pub len: Option<usize>,
}

/// Generate one salt.
///
/// # Errors
///
/// Returns a `ResourceExhausted` host error if no entropy source works.
pub fn execute(args: &SaltArgs, settings: &Settings) -> Result<SaltDto, HostError> {
    generate_salt(args.len.unwrap_or(settings.salt_length))
}
