//! Call-argument rules for `params(maxtime, [maxmem], [maxmemfrac], [callback])`.
//!
//! Positional, variable arity. A function argument after `maxtime` marks the
//! call as deferred and ends parsing; `undefined` or non-positive numbers
//! for the memory knobs keep their defaults.

use scrypt_params_core::{ResourceBudget, DEFAULT_MAXMEMFRAC};

use crate::error::HostError;

/// Default `maxmem`: derive from physical memory.
pub const DEFAULT_MAXMEM: u64 = 0;

/// One call argument as a dynamically typed host hands it over.
#[derive(Debug, Clone, PartialEq)]
pub enum HostArg {
    /// A number.
    Number(f64),
    /// An explicitly missing value.
    Undefined,
    /// A string (never valid for this call).
    Text(String),
    /// A callable; marks a deferred call.
    Function,
}

/// Whether the caller waits for the result or gets it via callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    /// Run inline and return the result.
    Sync,
    /// Run on a worker and deliver the result to the callback.
    Deferred,
}

/// Validated arguments of one call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamsRequest {
    /// Seconds, strictly positive.
    pub maxtime: f64,
    /// Bytes; `0` derives the limit from physical memory.
    pub maxmem: u64,
    /// Fraction of usable memory.
    pub maxmemfrac: f64,
    /// Sync or deferred.
    pub mode: CallMode,
}

impl ParamsRequest {
    /// Synchronous request with default memory settings.
    #[must_use]
    pub const fn new(maxtime: f64) -> Self {
        Self {
            maxtime,
            maxmem: DEFAULT_MAXMEM,
            maxmemfrac: DEFAULT_MAXMEMFRAC,
            mode: CallMode::Sync,
        }
    }

    /// The core budget for this request.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` host error if `maxtime` is unusable.
    pub fn budget(&self) -> Result<ResourceBudget, HostError> {
        Ok(ResourceBudget::new(
            self.maxtime,
            self.maxmem,
            self.maxmemfrac,
        )?)
    }
}

/// Validate positional call arguments.
///
/// # Errors
///
/// Returns an `InvalidArgument` host error carrying the message the host
/// should raise as a type error.
pub fn parse_arguments(args: &[HostArg]) -> Result<ParamsRequest, HostError> {
    match args.first() {
        None => {
            return Err(HostError::invalid_argument(
                "Wrong number of arguments: At least one argument is needed - the maxtime",
            ))
        }
        Some(HostArg::Function) => {
            return Err(HostError::invalid_argument(
                "Wrong number of arguments: At least one argument is needed before the callback - the maxtime",
            ))
        }
        Some(_) => {}
    }

    let mut request = ParamsRequest::new(0.0);
    for (position, arg) in args.iter().enumerate() {
        if position > 0 && *arg == HostArg::Function {
            request.mode = CallMode::Deferred;
            break;
        }

        match position {
            0 => request.maxtime = parse_maxtime(arg)?,
            1 => {
                if let Some(maxmem) = optional_number(arg, "maxmem argument must be a number")? {
                    if maxmem > 0.0 {
                        request.maxmem = bytes_from(maxmem);
                    }
                }
            }
            2 => {
                if let Some(frac) = optional_number(arg, "max_memfrac argument must be a number")? {
                    if frac > 0.0 {
                        request.maxmemfrac = frac;
                    }
                }
            }
            _ => {}
        }
    }

    tracing::trace!(?request, "parsed params arguments");
    Ok(request)
}

fn parse_maxtime(arg: &HostArg) -> Result<f64, HostError> {
    let HostArg::Number(maxtime) = *arg else {
        return Err(HostError::invalid_argument(
            "maxtime argument must be a number",
        ));
    };
    if maxtime.is_nan() || maxtime <= 0.0 {
        return Err(HostError::invalid_argument("maxtime must be greater than 0"));
    }
    if maxtime.is_infinite() {
        return Err(HostError::invalid_argument("maxtime must be finite"));
    }
    Ok(maxtime)
}

fn optional_number(arg: &HostArg, message: &str) -> Result<Option<f64>, HostError> {
    match *arg {
        HostArg::Undefined => Ok(None),
        HostArg::Number(value) => Ok(Some(value)),
        HostArg::Text(_) | HostArg::Function => Err(HostError::invalid_argument(message)),
    }
}

/// Whole bytes from a positive host number; saturates at `u64::MAX`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn bytes_from(value: f64) -> u64 {
    value as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use HostArg::{Function, Number, Text, Undefined};

    fn message(args: &[HostArg]) -> String {
        parse_arguments(args).expect_err("arguments should be rejected").message
    }

    #[test]
    fn maxtime_only_uses_defaults() {
        let request = parse_arguments(&[Number(1.5)]).unwrap();
        assert_eq!(request, ParamsRequest::new(1.5));
        assert_eq!(request.mode, CallMode::Sync);
    }

    #[test]
    fn all_numbers_are_taken() {
        let request = parse_arguments(&[Number(0.5), Number(1_048_576.0), Number(0.25)]).unwrap();
        assert!((request.maxtime - 0.5).abs() < f64::EPSILON);
        assert_eq!(request.maxmem, 1_048_576);
        assert!((request.maxmemfrac - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn no_arguments_is_rejected() {
        assert_eq!(
            message(&[]),
            "Wrong number of arguments: At least one argument is needed - the maxtime"
        );
    }

    #[test]
    fn leading_callback_is_rejected() {
        assert_eq!(
            message(&[Function]),
            "Wrong number of arguments: At least one argument is needed before the callback - the maxtime"
        );
    }

    #[test]
    fn maxtime_must_be_a_positive_number() {
        assert_eq!(message(&[Text("1".into())]), "maxtime argument must be a number");
        assert_eq!(message(&[Undefined]), "maxtime argument must be a number");
        assert_eq!(message(&[Number(0.0)]), "maxtime must be greater than 0");
        assert_eq!(message(&[Number(-2.0)]), "maxtime must be greater than 0");
        assert_eq!(message(&[Number(f64::NAN)]), "maxtime must be greater than 0");
    }

    #[test]
    fn memory_arguments_must_be_numbers() {
        assert_eq!(
            message(&[Number(1.0), Text("big".into())]),
            "maxmem argument must be a number"
        );
        assert_eq!(
            message(&[Number(1.0), Number(0.0), Text("half".into())]),
            "max_memfrac argument must be a number"
        );
    }

    #[test]
    fn undefined_and_non_positive_memory_keep_defaults() {
        let request = parse_arguments(&[Number(1.0), Undefined, Undefined]).unwrap();
        assert_eq!(request.maxmem, DEFAULT_MAXMEM);
        assert!((request.maxmemfrac - DEFAULT_MAXMEMFRAC).abs() < f64::EPSILON);

        let request = parse_arguments(&[Number(1.0), Number(-5.0), Number(0.0)]).unwrap();
        assert_eq!(request.maxmem, DEFAULT_MAXMEM);
        assert!((request.maxmemfrac - DEFAULT_MAXMEMFRAC).abs() < f64::EPSILON);
    }

    #[test]
    fn trailing_callback_defers_and_stops_parsing() {
        let request = parse_arguments(&[Number(1.0), Function, Text("ignored".into())]).unwrap();
        assert_eq!(request.mode, CallMode::Deferred);
        assert_eq!(request.maxmem, DEFAULT_MAXMEM);

        let request =
            parse_arguments(&[Number(1.0), Number(2048.0), Number(0.1), Function]).unwrap();
        assert_eq!(request.mode, CallMode::Deferred);
        assert_eq!(request.maxmem, 2048);
    }

    #[test]
    fn request_converts_to_budget() {
        let budget = ParamsRequest::new(2.0).budget().unwrap();
        assert!((budget.maxtime - 2.0).abs() < f64::EPSILON);
        assert_eq!(budget.maxmem, 0);
    }

    #[test]
    fn request_with_bad_maxtime_has_no_budget() {
        let err = ParamsRequest::new(0.0).budget().expect_err("must be rejected");
        assert_eq!(err.code, 1);
    }
}
