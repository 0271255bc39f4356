//! Salt generation for scrypt callers.
//!
//! Salt comes from the OS CSPRNG (`OsRng`). If that source errors, the
//! bytes are read straight from `/dev/urandom` instead. A buffer is either
//! completely filled or, on failure, zeroed: it is never handed back
//! half-written.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::error::ParamsError;

/// Salt length used when the caller has no preference.
pub const DEFAULT_SALT_LEN: usize = 32;

/// Device read when the CSPRNG fails.
const FALLBACK_DEVICE: &str = "/dev/urandom";

/// Fill `salt` with cryptographically random bytes.
///
/// # Errors
///
/// Returns `ParamsError::ResourceExhausted` if the CSPRNG fails and the
/// fallback device cannot be opened or read to the end of the buffer.
pub fn get_salt(salt: &mut [u8]) -> Result<(), ParamsError> {
    match OsRng.try_fill_bytes(salt) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::warn!(error = %e, device = FALLBACK_DEVICE, "CSPRNG failed, using fallback device");
            fill_from_device(Path::new(FALLBACK_DEVICE), salt)
        }
    }
}

/// Allocate and fill a salt of `len` bytes.
///
/// # Errors
///
/// Same as [`get_salt`].
pub fn generate_salt(len: usize) -> Result<Vec<u8>, ParamsError> {
    let mut salt = vec![0u8; len];
    get_salt(&mut salt)?;
    Ok(salt)
}

fn fill_from_device(device: &Path, salt: &mut [u8]) -> Result<(), ParamsError> {
    let result = File::open(device)
        .map_err(|e| {
            ParamsError::ResourceExhausted(format!("cannot open {}: {e}", device.display()))
        })
        .and_then(|mut file| fill_from(&mut file, salt));
    if result.is_err() {
        salt.zeroize();
    }
    result
}

/// Read until `salt` is full. Short reads and `EINTR` are retried; an
/// end-of-file is an error since a random device never runs dry.
fn fill_from<R: Read>(source: &mut R, salt: &mut [u8]) -> Result<(), ParamsError> {
    source
        .read_exact(salt)
        .map_err(|e| ParamsError::ResourceExhausted(format!("random device read failed: {e}")))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
