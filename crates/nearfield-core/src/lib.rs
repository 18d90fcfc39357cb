//! # nearfield-core
//!
//! Core contact-aggregation logic for the nearfield proximity tracing SDK.
//!
//! This crate provides:
//! - Handshake-to-contact aggregation with RSSI noise filtering
//! - Per-epoch signal-quality statistics for diagnostics
//! - Epoch-boundary and calendar-day time keying
//! - Configuration management (noise floor, epoch length, timezone, gating)
//!
//! ## Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`contacts`] - Grouping, noise filtering, and contact synthesis
//! - [`time`] - Epoch boundaries and calendar-day bucketing
//! - [`config`] - Aggregation configuration loading, saving, and validation
//! - [`error`] - Unified error types for the crate
//! - [`types`] - Shared handshake and contact types
//!
//! Ephemeral-identifier generation, cryptographic key schedules, Bluetooth
//! scanning, persistence, and exposure-risk scoring all live in the
//! surrounding SDK, not here.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod config;
pub mod contacts;
pub mod error;
pub mod time;
pub mod types;

// Re-export primary types for convenience
pub use config::{
    AggregationConfig, ContactGating, DEFAULT_BAD_RSSI_THRESHOLD, DEFAULT_CONTACT_THRESHOLD,
};
pub use contacts::{contacts_from_handshakes, SignalSummary};
pub use error::{NearfieldError, Result};
pub use time::{epoch_start, DayDate, EPOCHS_PER_DAY, SECONDS_PER_EPOCH, WINDOW_SECS};
pub use types::{Contact, EphId, Handshake, EPH_ID_LENGTH};
