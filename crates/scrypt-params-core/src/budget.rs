//! Resource budget for one parameter search.
//!
//! A [`ResourceBudget`] holds the caller's three knobs exactly as supplied;
//! the defaulting rules are applied when the effective memory ceiling is
//! derived with [`ResourceBudget::memlimit`].

use serde::{Deserialize, Serialize};

use crate::error::ParamsError;
use crate::memory::MIB;

/// Fraction of usable memory used when `maxmemfrac` is zero or out of range.
pub const DEFAULT_MAXMEMFRAC: f64 = 0.5;

/// `maxmem = 0` resolves to usable memory divided by this.
pub const DEFAULT_MAXMEM_DIVISOR: u64 = 128;

/// Floor applied to the computed memory terms (1 MiB).
pub const MIN_MEMLIMIT: u64 = MIB;

/// Caller-supplied resource limits for a single search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceBudget {
    /// Wall-clock ceiling in seconds for one scrypt invocation.
    pub maxtime: f64,
    /// Maximum bytes scrypt may use; `0` selects the computed default.
    pub maxmem: u64,
    /// Maximum fraction of usable memory; `0` or outside `(0, 1]` selects `0.5`.
    pub maxmemfrac: f64,
}

impl ResourceBudget {
    /// Build a budget, rejecting an unusable `maxtime`.
    ///
    /// # Errors
    ///
    /// Returns `ParamsError::InvalidArgument` if `maxtime` is not a finite,
    /// strictly positive number of seconds.
    pub fn new(maxtime: f64, maxmem: u64, maxmemfrac: f64) -> Result<Self, ParamsError> {
        let budget = Self {
            maxtime,
            maxmem,
            maxmemfrac,
        };
        budget.validate()?;
        Ok(budget)
    }

    /// Budget with the default memory settings.
    ///
    /// # Errors
    ///
    /// Same as [`ResourceBudget::new`].
    pub fn with_maxtime(maxtime: f64) -> Result<Self, ParamsError> {
        Self::new(maxtime, 0, DEFAULT_MAXMEMFRAC)
    }

    /// Check the fields a caller may have set directly.
    ///
    /// # Errors
    ///
    /// Returns `ParamsError::InvalidArgument` if `maxtime` is not a finite,
    /// strictly positive number of seconds.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.maxtime.is_finite() || self.maxtime <= 0.0 {
            return Err(ParamsError::InvalidArgument(format!(
                "maxtime must be greater than 0 (got {})",
                self.maxtime
            )));
        }
        Ok(())
    }

    /// `maxmemfrac` after defaulting.
    #[must_use]
    pub fn effective_memfrac(&self) -> f64 {
        if self.maxmemfrac > 0.0 && self.maxmemfrac <= 1.0 {
            self.maxmemfrac
        } else {
            DEFAULT_MAXMEMFRAC
        }
    }

    /// `maxmem` after defaulting against the given usable memory.
    #[must_use]
    pub fn effective_maxmem(&self, usable_memory: u64) -> u64 {
        if self.maxmem == 0 {
            (usable_memory / DEFAULT_MAXMEM_DIVISOR).max(MIN_MEMLIMIT)
        } else {
            self.maxmem
        }
    }

    /// Effective memory ceiling in bytes.
    ///
    /// `min(maxmem, max(maxmemfrac * usable_memory, 1 MiB))`. The floor only
    /// lifts computed terms: an explicit `maxmem` below 1 MiB is kept, so a
    /// caller can ask for a budget that turns out to be infeasible.
    #[must_use]
    pub fn memlimit(&self, usable_memory: u64) -> u64 {
        let fraction = fraction_of(usable_memory, self.effective_memfrac()).max(MIN_MEMLIMIT);
        self.effective_maxmem(usable_memory).min(fraction)
    }
}

/// `bytes * frac`, rounded down.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn fraction_of(bytes: u64, frac: f64) -> u64 {
    // `as` saturates for floats, and frac is within (0, 1].
    (bytes as f64 * frac) as u64
}
