//! Unified error types for the nearfield core library.
//!
//! Contact aggregation itself has no failure modes: absent or weak signal
//! readings are data-quality signals to be filtered, not faults. The
//! variants here cover the ambient operations around it — identifier
//! parsing and configuration handling.
//!
//! # Design Principles
//!
//! - **Specific variants**: Each error variant captures exactly one failure mode
//! - **Actionable messages**: Error messages guide users toward resolution
//! - **Context preservation**: Wrapped errors maintain their original context

use std::path::PathBuf;
use thiserror::Error;

/// The unified error type for all nearfield core operations.
#[derive(Debug, Error)]
pub enum NearfieldError {
    // =========================================================================
    // IDENTIFIER ERRORS
    // =========================================================================
    /// An ephemeral identifier string could not be parsed.
    #[error("Invalid ephemeral identifier '{value}': {reason}")]
    InvalidEphId {
        /// The rejected input.
        value: String,
        /// Why the input was rejected.
        reason: String,
    },

    // =========================================================================
    // CONFIGURATION ERRORS
    // =========================================================================
    /// The configuration file was not found at the expected path.
    #[error("Configuration file not found at: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The configuration file exists but could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration could not be serialized for writing.
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The configuration was parsed but contains invalid values.
    #[error("Configuration validation failed: {field}: {message}")]
    ConfigValidation {
        /// The offending configuration field.
        field: &'static str,
        /// What is wrong with its value.
        message: String,
    },

    // =========================================================================
    // I/O ERRORS
    // =========================================================================
    /// A low-level I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized [`Result`] type for nearfield core operations.
///
/// This type alias eliminates the need to specify the error type explicitly
/// when returning results from nearfield functions.
pub type Result<T> = std::result::Result<T, NearfieldError>;

impl NearfieldError {
    /// Returns `true` if this error is related to configuration.
    #[inline]
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound(_)
                | Self::ConfigParse(_)
                | Self::ConfigSerialize(_)
                | Self::ConfigValidation { .. }
        )
    }

    /// Returns `true` if this error came from malformed caller input rather
    /// than the environment.
    #[inline]
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidEphId { .. })
    }

    /// Returns a machine-readable error code for embedding SDK diagnostics.
    #[inline]
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidEphId { .. } => "INVALID_EPH_ID",
            Self::ConfigNotFound(_) => "CONFIG_NOT_FOUND",
            Self::ConfigParse(_) => "CONFIG_PARSE_ERROR",
            Self::ConfigSerialize(_) => "CONFIG_SERIALIZE_ERROR",
            Self::ConfigValidation { .. } => "CONFIG_VALIDATION_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
