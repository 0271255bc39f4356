//! Throughput calibration for the scrypt core.
//!
//! scrypt's cost is counted in salsa20/8 core invocations: one call with
//! parameters `(N, r, p)` runs `p` independent `SMix` passes of `2N`
//! `BlockMix` rounds, each of `2r` cores, i.e. `4 * N * r * p` cores.
//! Timing one cheap call and dividing gives a cores-per-second rate that
//! extrapolates linearly to any other triple.
//!
//! - [`measure_calibration_run`] — time one run at `N = 1024, r = 8, p = 1`
//! - [`estimate_ops_per_second`] — the resulting rate
//! - [`Throughput`] — where a search gets its rate from

use std::sync::Mutex;
use std::time::{Duration, Instant};

use zeroize::Zeroize;

use crate::error::ParamsError;

/// `log2(N)` of the calibration run.
pub const CALIBRATION_LOG_N: u8 = 10;

/// Block-size factor of the calibration run.
pub const CALIBRATION_R: u32 = 8;

/// Parallelization factor of the calibration run.
pub const CALIBRATION_P: u32 = 1;

const CALIBRATION_OUTPUT_LEN: usize = 32;
const CALIBRATION_PASSWORD: &[u8] = b"calibration_probe";
const CALIBRATION_SALT: &[u8] = b"calibration_salt_16b";

/// Smallest elapsed time a measurement is clamped to.
const MIN_ELAPSED: Duration = Duration::from_nanos(1);

/// Number of salsa20/8 cores one scrypt call with `(n, r, p)` performs.
///
/// Computed in floating point so large triples cannot overflow.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scrypt_operations(n: u64, r: u32, p: u32) -> f64 {
    4.0 * n as f64 * f64::from(r) * f64::from(p)
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

/// One timed scrypt invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BenchmarkSample {
    /// CPU/memory cost factor used.
    pub n: u64,
    /// Block-size factor used.
    pub r: u32,
    /// Parallelization factor used.
    pub p: u32,
    /// Measured wall-clock time (monotonic clock).
    pub elapsed: Duration,
}

impl BenchmarkSample {
    /// Cores performed by the sampled run.
    #[must_use]
    pub fn operations(&self) -> f64 {
        scrypt_operations(self.n, self.r, self.p)
    }

    /// Cores per second, with `elapsed` clamped to at least 1 ns.
    #[must_use]
    pub fn ops_per_second(&self) -> f64 {
        self.operations() / self.elapsed.max(MIN_ELAPSED).as_secs_f64()
    }
}

/// Run scrypt once with the calibration parameters and time it.
///
/// # Errors
///
/// Returns `ParamsError::ResourceExhausted` if scrypt rejects the
/// parameters, fails, or panics while allocating its working memory.
pub fn measure_calibration_run() -> Result<BenchmarkSample, ParamsError> {
    let params = scrypt::Params::new(
        CALIBRATION_LOG_N,
        CALIBRATION_R,
        CALIBRATION_P,
        CALIBRATION_OUTPUT_LEN,
    )
    .map_err(|e| ParamsError::ResourceExhausted(format!("invalid calibration params: {e}")))?;

    let start = Instant::now();
    let outcome = std::panic::catch_unwind(|| {
        let mut out = [0u8; CALIBRATION_OUTPUT_LEN];
        let result = scrypt::scrypt(CALIBRATION_PASSWORD, CALIBRATION_SALT, &params, &mut out);
        out.zeroize();
        result
    });
    let elapsed = start.elapsed();

    match outcome {
        Ok(Ok(())) => Ok(BenchmarkSample {
            n: 1 << CALIBRATION_LOG_N,
            r: CALIBRATION_R,
            p: CALIBRATION_P,
            elapsed,
        }),
        Ok(Err(e)) => Err(ParamsError::ResourceExhausted(format!(
            "scrypt calibration run failed: {e}"
        ))),
        Err(_) => Err(ParamsError::ResourceExhausted(
            "scrypt calibration run aborted: unable to allocate working memory".into(),
        )),
    }
}

/// Measure how many salsa20/8 cores this machine runs per second.
///
/// # Errors
///
/// Propagates `ParamsError::ResourceExhausted` from the calibration run.
pub fn estimate_ops_per_second() -> Result<f64, ParamsError> {
    let sample = measure_calibration_run()?;
    let rate = sample.ops_per_second();
    tracing::debug!(
        elapsed_us = sample.elapsed.as_micros(),
        ops_per_second = rate,
        "scrypt calibration finished"
    );
    Ok(rate)
}

// ---------------------------------------------------------------------------
// Throughput sources
// ---------------------------------------------------------------------------

/// Source of the cores-per-second rate used by one search.
pub trait Throughput {
    /// Positive, finite cores-per-second rate.
    ///
    /// # Errors
    ///
    /// Returns `ParamsError::ResourceExhausted` if the rate must be measured
    /// and the measurement fails.
    fn ops_per_second(&self) -> Result<f64, ParamsError>;
}

/// Measures afresh on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct Calibrate;

impl Throughput for Calibrate {
    fn ops_per_second(&self) -> Result<f64, ParamsError> {
        estimate_ops_per_second()
    }
}

/// Measures once, then reuses the rate.
///
/// Share it by reference (or `Arc`) between searches. A poisoned lock
/// falls back to measuring without caching.
#[derive(Debug, Default)]
pub struct CachedCalibration {
    rate: Mutex<Option<f64>>,
}

impl CachedCalibration {
    /// Empty cache; the first search pays for the measurement.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rate: Mutex::new(None),
        }
    }

    /// The cached rate, if one has been measured.
    #[must_use]
    pub fn cached(&self) -> Option<f64> {
        self.rate.lock().ok().and_then(|rate| *rate)
    }

    /// Forget the cached rate so the next search re-measures.
    pub fn invalidate(&self) {
        if let Ok(mut rate) = self.rate.lock() {
            *rate = None;
        }
    }
}

impl Throughput for CachedCalibration {
    fn ops_per_second(&self) -> Result<f64, ParamsError> {
        let Ok(mut rate) = self.rate.lock() else {
            return estimate_ops_per_second();
        };
        if let Some(cached) = *rate {
            return Ok(cached);
        }
        let measured = estimate_ops_per_second()?;
        *rate = Some(measured);
        Ok(measured)
    }
}

/// A constant rate, for reproducible searches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedThroughput(f64);

impl FixedThroughput {
    /// Wrap a known cores-per-second rate.
    ///
    /// # Errors
    ///
    /// Returns `ParamsError::InvalidArgument` unless the rate is finite and
    /// strictly positive.
    pub fn new(ops_per_second: f64) -> Result<Self, ParamsError> {
        if !ops_per_second.is_finite() || ops_per_second <= 0.0 {
            return Err(ParamsError::InvalidArgument(format!(
                "throughput must be positive and finite (got {ops_per_second})"
            )));
        }
        Ok(Self(ops_per_second))
    }

    /// Rate derived from an existing sample.
    ///
    /// # Errors
    ///
    /// Same as [`FixedThroughput::new`].
    pub fn from_sample(sample: &BenchmarkSample) -> Result<Self, ParamsError> {
        Self::new(sample.ops_per_second())
    }
}

impl Throughput for FixedThroughput {
    fn ops_per_second(&self) -> Result<f64, ParamsError> {
        Ok(self.0)
    }
}

impl<T: Throughput + ?Sized> Throughput for &T {
    fn ops_per_second(&self) -> Result<f64, ParamsError> {
        (**self).ops_per_second()
    }
}

impl<T: Throughput + ?Sized> Throughput for std::sync::Arc<T> {
    fn ops_per_second(&self) -> Result<f64, ParamsError> {
        (**self).ops_per_second()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
