//! `scrypt-params params <maxtime>`.

use anyhow::Context;
use clap::Args;

use scrypt_params_host::{
    pick_params_async, pick_params_sync, CallMode, Calibration, HostError, ParamsDto,
    ParamsRequest, Settings,
};

/// Arguments of the `params` subcommand. Unset memory flags fall back to
/// the settings file.
#[derive(Debug, Args)]
pub struct ParamsArgs {
    /// Time budget in seconds.
    #[arg(allow_negative_numbers = true)]
    pub maxtime: f64,

    /// Memory ceiling in bytes (0 = derive from physical memory).
    #[arg(long, value_name = "BYTES")]
    pub maxmem: Option<u64>,

    /// Fraction of usable memory the result may occupy.
    #[arg(long, value_name = "FRACTION", allow_negative_numbers = true)]
    pub maxmemfrac: Option<f64>,

    /// Run the search on tokio's blocking pool.
    #[arg(long = "async")]
    pub deferred: bool,

    /// Reuse one calibration for the whole process.
    #[arg(long)]
    pub cached: bool,
}

impl ParamsArgs {
    /// Merge these flags over `settings`.
    #[must_use]
    pub fn request(&self, settings: &Settings) -> ParamsRequest {
        let mut request = settings.request(self.maxtime);
        if let Some(maxmem) = self.maxmem {
            request.maxmem = maxmem;
        }
        if let Some(maxmemfrac) = self.maxmemfrac {
            request.maxmemfrac = maxmemfrac;
        }
        if self.deferred {
            request.mode = CallMode::Deferred;
        }
        request
    }

    /// `--cached` forces a shared calibration; otherwise the settings decide.
    #[must_use]
    pub fn calibration(&self, settings: &Settings) -> Calibration {
        if self.cached {
            Calibration::shared()
        } else {
            settings.calibration()
        }
    }
}

/// Run the search.
///
/// The outer error is reserved for the async runtime failing to start; the
/// search outcome itself is the inner result.
///
/// # Errors
///
/// Returns an error if `--async` was given and no tokio runtime can be built.
pub fn execute(
    args: &ParamsArgs,
    settings: &Settings,
) -> anyhow::Result<Result<ParamsDto, HostError>> {
    let request = args.request(settings);
    let calibration = args.calibration(settings);
    tracing::debug!(?request, "running params command");

    match request.mode {
        CallMode::Sync => Ok(pick_params_sync(&request, &calibration)),
        CallMode::Deferred => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .build()
                .context("Failed to start async runtime")?;
            Ok(runtime.block_on(pick_params_async(request, calibration)))
        }
    }
}
