//! Aggregation configuration management.
//!
//! Handles loading, saving, and validating the numeric policies contact
//! aggregation runs under:
//! - RSSI noise floor for credible readings
//! - Identifier epoch length
//! - Timezone for calendar-day bucketing
//! - Contact gating (the historical handshake-count threshold)

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NearfieldError, Result};
use crate::time::{SECONDS_PER_EPOCH, WINDOW_SECS};

/// Default signal floor in dBm; readings at or below it are noise.
pub const DEFAULT_BAD_RSSI_THRESHOLD: f64 = -85.0;

/// Historical minimum number of credible sightings for a contact.
///
/// Used when [`ContactGating::MinCredibleReadings`] is enabled; the default
/// gating mode emits without counting (see [`ContactGating::Off`]).
pub const DEFAULT_CONTACT_THRESHOLD: u32 = 1;

/// Effect of the contact threshold on record emission.
///
/// The threshold was historically accepted but never enforced, so the
/// default reproduces that behavior. Enforcement is an explicit opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactGating {
    /// Emit a record for every identifier with at least one credible reading.
    Off,

    /// Emit only records whose identifier accumulated at least this many
    /// credible readings. A minimum of zero behaves like [`ContactGating::Off`].
    MinCredibleReadings(u32),
}

impl ContactGating {
    /// Minimum number of credible readings a group must have to emit a record.
    #[must_use]
    pub const fn min_required(self) -> usize {
        match self {
            Self::Off => 0,
            Self::MinCredibleReadings(n) => n as usize,
        }
    }
}

/// Configuration for handshake-to-contact aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Signal floor in dBm. A reading must be strictly greater than this to
    /// count as credible.
    pub bad_rssi_threshold: f64,

    /// Length of one identifier epoch in seconds.
    ///
    /// Must be a positive multiple of 60 so the epoch divides into whole
    /// signal-statistics windows.
    pub seconds_per_epoch: u32,

    /// Timezone used to bucket contacts by calendar day.
    #[serde(with = "timezone_serde")]
    pub timezone: Tz,

    /// Whether the historical contact threshold gates record emission.
    pub contact_gating: ContactGating,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            bad_rssi_threshold: DEFAULT_BAD_RSSI_THRESHOLD,
            seconds_per_epoch: SECONDS_PER_EPOCH,
            timezone: chrono_tz::UTC,
            contact_gating: ContactGating::Off,
        }
    }
}

impl AggregationConfig {
    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, unparsable, or
    /// fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(NearfieldError::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded aggregation config");
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is unreadable, unparsable, or
    /// fails validation.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be serialized or written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The default configuration file path for the current platform.
    #[must_use]
    pub fn default_path() -> PathBuf {
        // On deployed devices: /etc/nearfield/config.toml
        // For development: platform config dir
        #[cfg(target_os = "linux")]
        {
            PathBuf::from("/etc/nearfield/config.toml")
        }
        #[cfg(not(target_os = "linux"))]
        {
            directories::ProjectDirs::from("", "", "nearfield")
                .map(|dirs| dirs.config_dir().join("config.toml"))
                .unwrap_or_else(|| PathBuf::from("./nearfield.toml"))
        }
    }

    /// Validate field values.
    ///
    /// # Errors
    ///
    /// Returns [`NearfieldError::ConfigValidation`] for the first invalid
    /// field found.
    pub fn validate(&self) -> Result<()> {
        if self.seconds_per_epoch == 0 || self.seconds_per_epoch % WINDOW_SECS != 0 {
            return Err(NearfieldError::ConfigValidation {
                field: "seconds_per_epoch",
                message: format!(
                    "must be a positive multiple of {WINDOW_SECS}, got {}",
                    self.seconds_per_epoch
                ),
            });
        }
        if !self.bad_rssi_threshold.is_finite() {
            return Err(NearfieldError::ConfigValidation {
                field: "bad_rssi_threshold",
                message: "must be a finite dBm value".into(),
            });
        }
        Ok(())
    }
}

mod timezone_serde {
    use chrono_tz::Tz;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(tz: &Tz, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(tz.name())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Tz, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
