//! `scrypt-params-host` — the boundary between a host runtime and
//! `scrypt-params-core`.
//!
//! Takes loosely typed call arguments, applies the defaulting rules,
//! runs the search inline or on a worker, and hands back plain DTOs:
//! `{N, r, p}` on success, `{code, message}` on failure.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod args;
pub mod dispatch;
pub mod dto;
pub mod error;
pub mod settings;

pub use args::{parse_arguments, CallMode, HostArg, ParamsRequest};
pub use dispatch::{
    generate_salt, invoke, pick_params_async, pick_params_sync, pick_params_with_callback,
    Calibration, Invocation,
};
pub use dto::{ParamsDto, SaltDto};
pub use error::HostError;
pub use settings::Settings;
