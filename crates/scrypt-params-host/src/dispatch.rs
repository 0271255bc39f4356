//! Running the search for a host: inline, as a future, or with a callback.
//!
//! The core search is a single blocking call. Deferred variants move it to
//! a worker (tokio's blocking pool or a dedicated thread) and translate a
//! failed worker into a [`HostError`]; nothing here cancels a search once
//! it has started.

use std::sync::Arc;
use std::thread::JoinHandle;

use scrypt_params_core::{
    pick_params_with, CachedCalibration, Calibrate, CostParameters, ParamsError, ResourceBudget,
};

use crate::args::{parse_arguments, CallMode, HostArg, ParamsRequest};
use crate::dto::{ParamsDto, SaltDto};
use crate::error::HostError;

/// How a search obtains the machine's throughput.
#[derive(Debug, Clone, Default)]
pub enum Calibration {
    /// Measure on every call.
    #[default]
    PerCall,
    /// Measure once, share the rate between calls.
    Shared(Arc<CachedCalibration>),
}

impl Calibration {
    /// A fresh shared cache.
    #[must_use]
    pub fn shared() -> Self {
        Self::Shared(Arc::new(CachedCalibration::new()))
    }

    fn pick(&self, budget: &ResourceBudget) -> Result<CostParameters, ParamsError> {
        match self {
            Self::PerCall => pick_params_with(budget, &Calibrate),
            Self::Shared(cache) => pick_params_with(budget, cache),
        }
    }
}

/// Outcome of [`invoke`].
#[derive(Debug)]
pub enum Invocation {
    /// Synchronous call: the result object.
    Completed(ParamsDto),
    /// Deferred call: the worker delivering the result to the callback.
    Deferred(JoinHandle<()>),
}

/// Run the search inline.
///
/// # Errors
///
/// Returns the core error translated into a [`HostError`].
pub fn pick_params_sync(
    request: &ParamsRequest,
    calibration: &Calibration,
) -> Result<ParamsDto, HostError> {
    let budget = request.budget()?;
    let params = calibration.pick(&budget).inspect_err(|e| {
        tracing::debug!(error = %e, code = e.code(), "scrypt params search failed");
    })?;
    Ok(ParamsDto::from(params))
}

/// Run the search on tokio's blocking pool.
///
/// # Errors
///
/// Returns the core error, or a dispatch error if the worker panicked or
/// the runtime shut down first.
pub async fn pick_params_async(
    request: ParamsRequest,
    calibration: Calibration,
) -> Result<ParamsDto, HostError> {
    tokio::task::spawn_blocking(move || pick_params_sync(&request, &calibration))
        .await
        .map_err(|e| HostError::dispatch(format!("Task failed: {e}")))?
}

/// Run the search on a new worker thread and hand the result to `callback`.
///
/// # Errors
///
/// Returns a dispatch error if the thread cannot be spawned; the callback
/// is not invoked in that case.
pub fn pick_params_with_callback<F>(
    request: ParamsRequest,
    calibration: Calibration,
    callback: F,
) -> Result<JoinHandle<()>, HostError>
where
    F: FnOnce(Result<ParamsDto, HostError>) + Send + 'static,
{
    std::thread::Builder::new()
        .name("scrypt-params".into())
        .spawn(move || callback(pick_params_sync(&request, &calibration)))
        .map_err(|e| HostError::dispatch(format!("Failed to spawn worker: {e}")))
}

/// Host entry point: validate `args`, then run inline or deferred.
///
/// A trailing function argument selects the deferred path, in which case
/// `callback` receives the result; otherwise `callback` is dropped unused.
/// Argument errors are returned immediately in both modes.
///
/// # Errors
///
/// Returns argument errors, errors of an inline search, or a dispatch error
/// if a deferred worker cannot be spawned.
pub fn invoke<F>(
    args: &[HostArg],
    calibration: &Calibration,
    callback: F,
) -> Result<Invocation, HostError>
where
    F: FnOnce(Result<ParamsDto, HostError>) + Send + 'static,
{
    let request = parse_arguments(args)?;
    match request.mode {
        CallMode::Sync => pick_params_sync(&request, calibration).map(Invocation::Completed),
        CallMode::Deferred => {
            pick_params_with_callback(request, calibration.clone(), callback)
                .map(Invocation::Deferred)
        }
    }
}

/// Generate a hex-encoded salt of `len` bytes.
///
/// # Errors
///
/// Returns a `ResourceExhausted` host error if no entropy source works.
pub fn generate_salt(len: usize) -> Result<SaltDto, HostError> {
    let salt = scrypt_params_core::generate_salt(len)?;
    Ok(SaltDto::from_bytes(&salt))
}
