//! Contact synthesis from raw handshake observations.
//!
//! Handshakes arrive as an unordered stream of (identifier, timestamp,
//! optional RSSI) sightings. Aggregation collapses them into one [`Contact`]
//! per identifier that produced at least one credible reading, bucketed by
//! calendar day. Per-group signal statistics are computed alongside for
//! diagnostics; they do not influence which records are emitted.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace};

use crate::config::AggregationConfig;
use crate::time::{epoch_start, DayDate, WINDOW_SECS};
use crate::types::{Contact, EphId, Handshake};

/// Signal-quality summary for one identifier group.
///
/// Computed from the group's credible readings only. Reserved for a future
/// signal-quality field on [`Contact`]; today it is surfaced through logging
/// and this type so independent implementations can compare numerics.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SignalSummary {
    /// Arithmetic mean strength of all credible readings in the group.
    pub mean_rssi: f64,

    /// Start of the epoch containing the first credible reading.
    pub epoch_start: DateTime<Utc>,

    /// Mean strength per one-minute window of the epoch, in window order.
    /// `None` where a window saw no readings.
    pub window_means: Vec<Option<f64>>,
}

impl SignalSummary {
    /// Compute the summary for a group's credible readings, in arrival order.
    ///
    /// Returns `None` for an empty slice. Windows are 60-second strides from
    /// the epoch start with strict bounds on both ends: a reading exactly on
    /// a window boundary is attributed to neither adjoining window.
    #[must_use]
    pub fn compute(readings: &[(DateTime<Utc>, f64)], seconds_per_epoch: u32) -> Option<Self> {
        let (first_ts, _) = *readings.first()?;

        let strengths: Vec<f64> = readings.iter().map(|(_, rssi)| *rssi).collect();
        let mean_rssi = mean(&strengths);

        let epoch = epoch_start(first_ts, seconds_per_epoch);
        let window_means = (0..seconds_per_epoch / WINDOW_SECS)
            .map(|index| {
                let start = epoch + Duration::seconds(i64::from(index * WINDOW_SECS));
                let end = start + Duration::seconds(i64::from(WINDOW_SECS));
                let values: Vec<f64> = readings
                    .iter()
                    .filter(|(ts, _)| *ts > start && *ts < end)
                    .map(|(_, rssi)| *rssi)
                    .collect();
                if values.is_empty() {
                    None
                } else {
                    Some(mean(&values))
                }
            })
            .collect();

        Some(Self {
            mean_rssi,
            epoch_start: epoch,
            window_means,
        })
    }

    /// Number of windows that saw at least one credible reading.
    #[must_use]
    pub fn occupied_windows(&self) -> usize {
        self.window_means.iter().flatten().count()
    }
}

/// Collapse raw handshakes into de-duplicated contact records.
///
/// Pure and deterministic: no I/O, no internal state, and no failure modes.
/// Empty input yields an empty output. Records are returned in first-seen
/// identifier order; only the record *set* is contractually significant.
///
/// Per identifier group:
/// - readings with no RSSI, or with RSSI at or below
///   `config.bad_rssi_threshold`, are discarded as noise;
/// - a group whose every reading is noise emits nothing;
/// - the record's `day` comes from the group's first observation in arrival
///   order, credible or not;
/// - `identifier` and `associated_known_case` are left unset for downstream
///   layers to fill in.
#[must_use]
pub fn contacts_from_handshakes(
    handshakes: &[Handshake],
    config: &AggregationConfig,
) -> Vec<Contact> {
    let min_credible = config.contact_gating.min_required();
    let mut contacts = Vec::new();

    for (eph_id, group) in group_by_eph_id(handshakes) {
        let readings = credible_readings(&group, config.bad_rssi_threshold);
        if readings.is_empty() {
            trace!(%eph_id, observations = group.len(), "no credible readings");
            continue;
        }
        if readings.len() < min_credible {
            debug!(
                %eph_id,
                credible = readings.len(),
                required = min_credible,
                "below contact gating minimum"
            );
            continue;
        }

        if let Some(summary) = SignalSummary::compute(&readings, config.seconds_per_epoch) {
            debug!(
                %eph_id,
                mean_rssi = summary.mean_rssi,
                occupied_windows = summary.occupied_windows(),
                epoch_start = %summary.epoch_start,
                "credible contact group"
            );
        }

        let first = group[0];
        contacts.push(Contact {
            identifier: None,
            eph_id,
            day: DayDate::from_timestamp(first.timestamp, config.timezone),
            associated_known_case: None,
        });
    }

    contacts
}

/// Partition handshakes into per-identifier groups.
///
/// Groups are keyed solely on the ephemeral identifier and come back in
/// first-seen key order, each preserving its observations' arrival order.
fn group_by_eph_id(handshakes: &[Handshake]) -> Vec<(EphId, Vec<&Handshake>)> {
    let mut groups: Vec<(EphId, Vec<&Handshake>)> = Vec::new();
    let mut index: HashMap<EphId, usize> = HashMap::new();

    for handshake in handshakes {
        match index.get(&handshake.eph_id) {
            Some(&i) => groups[i].1.push(handshake),
            None => {
                index.insert(handshake.eph_id, groups.len());
                groups.push((handshake.eph_id, vec![handshake]));
            }
        }
    }
    groups
}

/// Arithmetic mean of a non-empty slice.
#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Keep the (timestamp, strength) pairs whose reading is present and
/// strictly above the noise floor.
fn credible_readings(group: &[&Handshake], bad_rssi_threshold: f64) -> Vec<(DateTime<Utc>, f64)> {
    group
        .iter()
        .filter_map(|handshake| {
            let rssi = handshake.rssi?;
            (rssi > bad_rssi_threshold).then_some((handshake.timestamp, rssi))
        })
        .collect()
}
