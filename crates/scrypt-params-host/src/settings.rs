//! Persistent defaults for hosts that run parameter searches repeatedly.
//!
//! Stored as plain JSON. Every field has a default, so a missing or
//! corrupt file simply yields [`Settings::default`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use scrypt_params_core::{DEFAULT_MAXMEMFRAC, DEFAULT_SALT_LEN};

use crate::args::{CallMode, ParamsRequest, DEFAULT_MAXMEM};
use crate::dispatch::Calibration;

/// Default file name inside a configuration directory.
pub const SETTINGS_FILE: &str = "scrypt-params.json";

/// Host-level defaults for parameter searches and salt generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Default `maxmem` in bytes (`0` = derive from physical memory).
    #[serde(default = "default_maxmem")]
    pub maxmem: u64,

    /// Default `maxmemfrac`.
    #[serde(default = "default_maxmemfrac")]
    pub maxmemfrac: f64,

    /// Salt length in bytes.
    #[serde(default = "default_salt_length")]
    pub salt_length: usize,

    /// Reuse one calibration across searches in the same process.
    #[serde(default)]
    pub cache_calibration: bool,

    /// Write logs to a daily rolling file in this directory instead of stderr.
    #[serde(default)]
    pub log_directory: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            maxmem: default_maxmem(),
            maxmemfrac: default_maxmemfrac(),
            salt_length: default_salt_length(),
            cache_calibration: false,
            log_directory: None,
        }
    }
}

const fn default_maxmem() -> u64 {
    DEFAULT_MAXMEM
}
const fn default_maxmemfrac() -> f64 {
    DEFAULT_MAXMEMFRAC
}
const fn default_salt_length() -> usize {
    DEFAULT_SALT_LEN
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// Returns [`Default::default()`] when the file is missing or
    /// contains invalid JSON.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => settings,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt settings file");
                Self::default()
            }
        }
    }

    /// Load settings from `path`, reporting why that failed.
    ///
    /// # Errors
    ///
    /// Returns the `io::Error` from reading the file, or an
    /// `InvalidData` error wrapping the JSON parse failure.
    pub fn try_load(path: &Path) -> std::io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Persist settings to `path`.
    ///
    /// Writes to a sibling `.tmp` file first, then renames over `path`.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the directory does not exist or the
    /// file system rejects the write/rename.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &json)?;
        fs::rename(&tmp, path)
    }

    /// A synchronous request for `maxtime` using these defaults.
    #[must_use]
    pub const fn request(&self, maxtime: f64) -> ParamsRequest {
        ParamsRequest {
            maxtime,
            maxmem: self.maxmem,
            maxmemfrac: self.maxmemfrac,
            mode: CallMode::Sync,
        }
    }

    /// The calibration strategy these settings ask for.
    #[must_use]
    pub fn calibration(&self) -> Calibration {
        if self.cache_calibration {
            Calibration::shared()
        } else {
            Calibration::PerCall
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join(SETTINGS_FILE));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.maxmem, 0);
        assert!((settings.maxmemfrac - 0.5).abs() < f64::EPSILON);
        assert_eq!(settings.salt_length, 32);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn try_load_reports_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let err = Settings::try_load(&path).expect_err("missing file");
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);

        fs::write(&path, "{ not json").unwrap();
        let err = Settings::try_load(&path).expect_err("corrupt file");
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);

        fs::write(&path, r#"{ "saltLength": 16 }"#).unwrap();
        assert_eq!(Settings::try_load(&path).unwrap().salt_length, 16);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{ "maxmem": 67108864, "cacheCalibration": true }"#).unwrap();
        let settings = Settings::load(&path);
        assert_eq!(settings.maxmem, 67_108_864);
        assert!(settings.cache_calibration);
        assert_eq!(settings.salt_length, DEFAULT_SALT_LEN);
        assert!(settings.log_directory.is_none());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let settings = Settings {
            maxmem: 1 << 26,
            maxmemfrac: 0.25,
            salt_length: 64,
            cache_calibration: true,
            log_directory: Some(dir.path().join("logs")),
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        assert!(!dir.path().join("scrypt-params.json.tmp").exists());
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(SETTINGS_FILE);
        assert!(Settings::default().save(&path).is_err());
    }

    #[test]
    fn request_uses_configured_memory() {
        let settings = Settings {
            maxmem: 4096,
            maxmemfrac: 0.1,
            ..Settings::default()
        };
        let request = settings.request(2.0);
        assert_eq!(request.maxmem, 4096);
        assert!((request.maxmemfrac - 0.1).abs() < f64::EPSILON);
        assert_eq!(request.mode, CallMode::Sync);
    }

    #[test]
    fn calibration_follows_cache_flag() {
        assert!(matches!(Settings::default().calibration(), Calibration::PerCall));
        let cached = Settings {
            cache_calibration: true,
            ..Settings::default()
        };
        assert!(matches!(cached.calibration(), Calibration::Shared(_)));
    }

    #[test]
    fn settings_snapshot() {
        insta::assert_json_snapshot!(Settings::default(), @r#"
        {
          "maxmem": 0,
          "maxmemfrac": 0.5,
          "saltLength": 32,
          "cacheCalibration": false,
          "logDirectory": null
        }
        "#);
    }
}
