//! scrypt cost-parameter search.
//!
//! Follows scrypt's own `pickparams` heuristic:
//!
//! 1. derive `memlimit` from the [`ResourceBudget`] and usable memory
//! 2. `opslimit = maxtime * ops_per_second`, floored at 2^15 cores
//! 3. fix `r = 8` (lowered only if `memlimit` cannot hold `N = 2`)
//! 4. the memory limit needs `128 * N * r <= memlimit`, the CPU limit
//!    needs `4 * N * r * p <= opslimit`. If `opslimit < memlimit / 32` the
//!    CPU limit is the stronger bound on `N`: take `p = 1` and size `N`
//!    from `opslimit`. Otherwise size `N` from `memlimit` and let `p`
//!    absorb the remaining CPU budget.

use serde::{Deserialize, Serialize};

use crate::benchmark::{scrypt_operations, Calibrate, Throughput};
use crate::budget::ResourceBudget;
use crate::error::ParamsError;
use crate::memory::usable_memory;

/// Minimum operation budget (2^15 salsa20/8 cores).
pub const MIN_OPSLIMIT: f64 = 32_768.0;

/// Block-size factor used unless memory forces it lower.
pub const DEFAULT_R: u32 = 8;

/// Smallest `N` scrypt accepts.
pub const MIN_N: u64 = 2;

/// Bytes per `N * r` unit of scrypt working memory.
const BLOCK_BYTES: u64 = 128;

/// `128 * r * N` for `N = 2, r = 1`.
const MIN_FOOTPRINT: u64 = 256;

/// scrypt requires `r * p < 2^30`.
const MAX_RP: u64 = 0x3fff_ffff;

/// Chosen scrypt cost parameters.
///
/// Serializes with the field names scrypt callers expect: `N`, `r`, `p`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostParameters {
    /// CPU/memory cost factor, a power of two `>= 2`.
    #[serde(rename = "N")]
    pub n: u64,
    /// Block-size factor, `>= 1`.
    pub r: u32,
    /// Parallelization factor, `>= 1`.
    pub p: u32,
}

impl CostParameters {
    /// `log2(N)`, the form the `scrypt` crate takes.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn log_n(&self) -> u8 {
        // trailing_zeros of a u64 is at most 64.
        self.n.trailing_zeros() as u8
    }

    /// Working memory of one `SMix` pass: `128 * r * N` bytes, saturating
    /// at `u64::MAX` for triples no search returns.
    #[must_use]
    pub fn memory_bytes(&self) -> u64 {
        footprint(self.n, self.r).unwrap_or(u64::MAX)
    }

    /// salsa20/8 cores one scrypt call performs.
    #[must_use]
    pub fn operations(&self) -> f64 {
        scrypt_operations(self.n, self.r, self.p)
    }

    /// Convert into `scrypt::Params` producing `output_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns `ParamsError::InvalidConfiguration` if `N` is not a power of
    /// two or the `scrypt` crate rejects the combination.
    pub fn to_scrypt_params(&self, output_len: usize) -> Result<scrypt::Params, ParamsError> {
        if !self.n.is_power_of_two() || self.n < MIN_N {
            return Err(ParamsError::InvalidConfiguration(format!(
                "scrypt N must be a power of 2 and at least {MIN_N}, got {}",
                self.n
            )));
        }
        scrypt::Params::new(self.log_n(), self.r, self.p, output_len)
            .map_err(|e| ParamsError::InvalidConfiguration(format!("invalid scrypt params: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Pick scrypt parameters for the given limits, calibrating on this machine.
///
/// `maxmem = 0` and `maxmemfrac = 0` select the defaults described on
/// [`ResourceBudget`].
///
/// # Errors
///
/// - `ParamsError::InvalidArgument` if `maxtime` is not positive and finite
/// - `ParamsError::InvalidConfiguration` if the memory limit cannot hold
///   `N = 2, r = 1`
/// - `ParamsError::ResourceExhausted` if the calibration run fails
pub fn pick_params(
    maxtime: f64,
    maxmem: u64,
    maxmemfrac: f64,
) -> Result<CostParameters, ParamsError> {
    let budget = ResourceBudget::new(maxtime, maxmem, maxmemfrac)?;
    pick_params_with(&budget, &Calibrate)
}

/// Pick scrypt parameters taking the rate from `throughput`.
///
/// The budget is validated and the memory limit checked before the
/// throughput is asked for, so an invalid call never pays for calibration.
///
/// # Errors
///
/// Same as [`pick_params`].
pub fn pick_params_with<T: Throughput + ?Sized>(
    budget: &ResourceBudget,
    throughput: &T,
) -> Result<CostParameters, ParamsError> {
    budget.validate()?;

    let memlimit = budget.memlimit(usable_memory()?);
    block_size_for(memlimit)?;

    let ops_per_second = throughput.ops_per_second()?;
    let opslimit = budget.maxtime * ops_per_second;
    tracing::debug!(memlimit, opslimit, ops_per_second, "searching scrypt params");

    let params = select_params(memlimit, opslimit)?;
    tracing::debug!(
        n = params.n,
        r = params.r,
        p = params.p,
        memory_bytes = params.memory_bytes(),
        "selected scrypt params"
    );
    Ok(params)
}

/// The search itself, for a known memory ceiling and operation budget.
///
/// `opslimit` below [`MIN_OPSLIMIT`] (or NaN) is raised to it.
///
/// # Errors
///
/// Returns `ParamsError::InvalidConfiguration` if `memlimit` cannot hold
/// `N = 2, r = 1` (256 bytes).
pub fn select_params(memlimit: u64, opslimit: f64) -> Result<CostParameters, ParamsError> {
    let opslimit = opslimit.max(MIN_OPSLIMIT);
    let r = block_size_for(memlimit)?;
    let fits_memory = |n: u64| fits_in(memlimit, n, r);

    #[allow(clippy::cast_precision_loss)]
    let cpu_bound = opslimit < memlimit as f64 / 32.0;

    if cpu_bound {
        let fits_time = |n: u64| scrypt_operations(n, r, 1) <= opslimit;
        let n = largest_power_of_two(|n| fits_memory(n) && fits_time(n)).ok_or_else(|| {
            ParamsError::InvalidConfiguration(format!(
                "operation budget of {opslimit} cores cannot run scrypt with N = {MIN_N}, r = {r}"
            ))
        })?;
        return Ok(CostParameters { n, r, p: 1 });
    }

    let n = largest_power_of_two(fits_memory).ok_or_else(|| infeasible_memory(memlimit))?;
    Ok(CostParameters {
        n,
        r,
        p: parallelism_for(opslimit, n, r),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `128 * r * N`, or `None` if that overflows `u64`.
fn footprint(n: u64, r: u32) -> Option<u64> {
    BLOCK_BYTES.checked_mul(u64::from(r))?.checked_mul(n)
}

/// An overflowing footprint never fits.
fn fits_in(memlimit: u64, n: u64, r: u32) -> bool {
    footprint(n, r).is_some_and(|bytes| bytes <= memlimit)
}

fn infeasible_memory(memlimit: u64) -> ParamsError {
    ParamsError::InvalidConfiguration(format!(
        "memory limit of {memlimit} bytes cannot hold the minimum scrypt footprint of \
         {MIN_FOOTPRINT} bytes (N = {MIN_N}, r = 1); raise maxmem or maxmemfrac"
    ))
}

/// `r = 8`, halved until `N = 2` fits in `memlimit`.
fn block_size_for(memlimit: u64) -> Result<u32, ParamsError> {
    let mut r = DEFAULT_R;
    while !fits_in(memlimit, MIN_N, r) {
        if r == 1 {
            return Err(infeasible_memory(memlimit));
        }
        r /= 2;
    }
    Ok(r)
}

/// Largest power of two `N >= 2` accepted by `fits`, doubling from 2.
fn largest_power_of_two(fits: impl Fn(u64) -> bool) -> Option<u64> {
    let mut n = MIN_N;
    if !fits(n) {
        return None;
    }
    while let Some(next) = n.checked_mul(2) {
        if !fits(next) {
            break;
        }
        n = next;
    }
    Some(n)
}

/// `p = floor(opslimit / (4 * N * r))`, with `r * p < 2^30` and `p >= 1`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn parallelism_for(opslimit: f64, n: u64, r: u32) -> u32 {
    let max_rp = ((opslimit / 4.0) / n as f64).min(MAX_RP as f64) as u64;
    let p = max_rp / u64::from(r);
    u32::try_from(p).unwrap_or(u32::MAX).max(1)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
