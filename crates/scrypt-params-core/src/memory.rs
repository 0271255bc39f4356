//! Usable memory detection.
//!
//! The amount of memory scrypt may touch is bounded by physical RAM and by
//! the process resource limits. On Unix the probe returns the minimum of:
//! - `sysconf(_SC_PHYS_PAGES) * sysconf(_SC_PAGESIZE)`
//! - the soft `RLIMIT_AS` limit, when finite
//! - the soft `RLIMIT_DATA` limit, when finite

use crate::error::ParamsError;

/// One mebibyte.
pub const MIB: u64 = 1 << 20;

/// Assumed usable memory on platforms without a probe (4 GiB).
pub const FALLBACK_USABLE_MEMORY: u64 = 4 << 30;

/// Return the number of bytes this process can reasonably use.
///
/// # Errors
///
/// Returns `ParamsError::ResourceExhausted` if the platform refuses to
/// report its physical memory size.
pub fn usable_memory() -> Result<u64, ParamsError> {
    let usable = platform::usable_memory_impl()?;
    tracing::trace!(usable, "probed usable memory");
    Ok(usable)
}

// ---------------------------------------------------------------------------
// Platform-specific implementations
// ---------------------------------------------------------------------------

#[cfg(unix)]
mod platform {
    use crate::error::ParamsError;

    pub(super) fn usable_memory_impl() -> Result<u64, ParamsError> {
        let soft_limit = |resource| {
            let mut limit = libc::rlimit {
                rlim_cur: 0,
                rlim_max: 0,
            };
            // SAFETY: getrlimit writes into the struct we own.
            let ret = unsafe { libc::getrlimit(resource, &raw mut limit) };
            if ret != 0 || limit.rlim_cur == libc::RLIM_INFINITY {
                return None;
            }
            #[allow(clippy::useless_conversion)]
            u64::try_from(limit.rlim_cur).ok()
        };

        let mut usable = physical_memory()?;
        for cap in [soft_limit(libc::RLIMIT_AS), soft_limit(libc::RLIMIT_DATA)]
            .into_iter()
            .flatten()
        {
            usable = usable.min(cap);
        }
        Ok(usable)
    }

    fn physical_memory() -> Result<u64, ParamsError> {
        // SAFETY: sysconf only reads system configuration values.
        let pages = unsafe { libc::sysconf(libc::_SC_PHYS_PAGES) };
        // SAFETY: as above.
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };

        match (u64::try_from(pages), u64::try_from(page_size)) {
            (Ok(pages), Ok(page_size)) if pages > 0 && page_size > 0 => {
                Ok(pages.saturating_mul(page_size))
            }
            _ => Err(ParamsError::ResourceExhausted(
                "unable to query physical memory via sysconf".into(),
            )),
        }
    }
}

#[cfg(not(unix))]
mod platform {
    use crate::error::ParamsError;

    pub(super) fn usable_memory_impl() -> Result<u64, ParamsError> {
        static WARNED: std::sync::Once = std::sync::Once::new();
        WARNED.call_once(|| {
            tracing::warn!(
                assumed = super::FALLBACK_USABLE_MEMORY,
                "no memory probe on this platform, assuming fixed usable memory"
            );
        });
        Ok(super::FALLBACK_USABLE_MEMORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usable_memory_is_reported() {
        let usable = usable_memory().expect("memory probe should succeed");
        assert!(usable > 0);
    }

    #[test]
    fn usable_memory_is_stable() {
        let a = usable_memory().expect("memory probe should succeed");
        let b = usable_memory().expect("memory probe should succeed");
        assert_eq!(a, b);
    }

    #[cfg(unix)]
    #[test]
    fn usable_memory_respects_address_space_limit() {
        let mut limit = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        let ret = unsafe { libc::getrlimit(libc::RLIMIT_AS, &raw mut limit) };
        assert_eq!(ret, 0);
        let usable = usable_memory().expect("memory probe should succeed");
        if limit.rlim_cur != libc::RLIM_INFINITY {
            assert!(usable <= limit.rlim_cur as u64);
        }
    }
}
