//! `scrypt-params-core` — adaptive scrypt cost-parameter selection.
//!
//! Given a time budget and memory constraints, picks the scrypt `(N, r, p)`
//! triple that uses as much of the budget as possible without exceeding it.
//! The CPU side of the budget is measured on the current machine by timing
//! one cheap scrypt run and extrapolating linearly.
//!
//! This crate never hashes passwords and has no async or I/O surface beyond
//! the salt fallback device.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod benchmark;
pub mod budget;
pub mod search;

pub mod salt;

pub use benchmark::{
    estimate_ops_per_second, measure_calibration_run, scrypt_operations, BenchmarkSample,
    CachedCalibration, Calibrate, FixedThroughput, Throughput,
};
pub use budget::{ResourceBudget, DEFAULT_MAXMEMFRAC, MIN_MEMLIMIT};
pub use error::{ErrorKind, ParamsError};
pub use memory::usable_memory;
pub use salt::{generate_salt, get_salt, DEFAULT_SALT_LEN};
pub use search::{pick_params, pick_params_with, select_params, CostParameters, MIN_OPSLIMIT};
