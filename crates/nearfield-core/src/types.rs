//! Shared handshake and contact types.
//!
//! A handshake is one raw sighting of a nearby device's rotating beacon; a
//! contact is the de-duplicated record synthesized from a group of credible
//! sightings. Both shapes are persisted and transported by the surrounding
//! SDK; this crate only defines them and fills them in.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{NearfieldError, Result};
use crate::time::DayDate;

/// Length in bytes of an ephemeral identifier.
pub const EPH_ID_LENGTH: usize = 16;

/// A rotating, non-identifying token broadcast by a nearby device.
///
/// Opaque to this crate: it is only compared for equality when grouping
/// handshakes. Generation and validation belong to the cryptographic key
/// schedule in the surrounding SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EphId([u8; EPH_ID_LENGTH]);

impl EphId {
    /// Wrap raw identifier bytes.
    #[must_use]
    pub const fn new(bytes: [u8; EPH_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse an identifier from its hex representation.
    ///
    /// # Errors
    ///
    /// Returns [`NearfieldError::InvalidEphId`] if the input is not exactly
    /// 32 hex characters.
    pub fn from_hex(value: &str) -> Result<Self> {
        if value.len() != EPH_ID_LENGTH * 2 {
            return Err(NearfieldError::InvalidEphId {
                value: value.to_owned(),
                reason: format!(
                    "expected {} hex characters, got {}",
                    EPH_ID_LENGTH * 2,
                    value.len()
                ),
            });
        }
        if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(NearfieldError::InvalidEphId {
                value: value.to_owned(),
                reason: "contains non-hex characters".into(),
            });
        }

        let mut bytes = [0u8; EPH_ID_LENGTH];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &value[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16).map_err(|_| NearfieldError::InvalidEphId {
                value: value.to_owned(),
                reason: format!("'{pair}' is not a hex byte"),
            })?;
        }
        Ok(Self(bytes))
    }

    /// The raw identifier bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; EPH_ID_LENGTH] {
        &self.0
    }
}

impl fmt::Display for EphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// One recorded detection of a nearby device's beacon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Handshake {
    /// Identifier the remote device was broadcasting at detection time.
    pub eph_id: EphId,

    /// When the beacon was observed (UTC).
    pub timestamp: DateTime<Utc>,

    /// Received signal strength in dBm.
    ///
    /// `None` when the radio reported no usable reading. Absence is modeled
    /// explicitly rather than with a sentinel value, so "no reading" is never
    /// mistaken for "very weak reading".
    pub rssi: Option<f64>,
}

/// A credible proximity event with one ephemeral identifier on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Row identifier assigned by the persistence layer; `None` until stored.
    pub identifier: Option<i64>,

    /// The ephemeral identifier this contact groups.
    pub eph_id: EphId,

    /// Calendar day of the first observation in the group.
    pub day: DayDate,

    /// Known case this contact was matched against; `None` until exposure
    /// matching runs.
    pub associated_known_case: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eph_id_hex_round_trip() {
        let id = EphId::new([
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ]);
        let hex = id.to_string();
        assert_eq!(hex, "00112233445566778899aabbccddeeff");
        assert_eq!(EphId::from_hex(&hex).unwrap(), id);
    }

    #[test]
    fn test_eph_id_from_hex_accepts_uppercase() {
        let id = EphId::from_hex("00112233445566778899AABBCCDDEEFF").unwrap();
        assert_eq!(id.as_bytes()[10], 0xaa);
    }

    #[test]
    fn test_eph_id_from_hex_rejects_wrong_length() {
        let err = EphId::from_hex("abcd").unwrap_err();
        assert!(matches!(err, NearfieldError::InvalidEphId { .. }));
    }

    #[test]
    fn test_eph_id_from_hex_rejects_non_hex() {
        let err = EphId::from_hex("zz112233445566778899aabbccddeeff").unwrap_err();
        assert!(matches!(err, NearfieldError::InvalidEphId { .. }));
    }

    #[test]
    fn test_eph_id_from_hex_rejects_non_ascii() {
        // Same byte length as a valid id, but not hex.
        let err = EphId::from_hex("éééééééééééééééé").unwrap_err();
        assert!(matches!(err, NearfieldError::InvalidEphId { .. }));
    }

    #[test]
    fn test_contact_serde_shape() {
        let contact = Contact {
            identifier: None,
            eph_id: EphId::new([7; 16]),
            day: DayDate::from(chrono::NaiveDate::from_ymd_opt(2020, 4, 1).unwrap()),
            associated_known_case: None,
        };
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["identifier"], serde_json::Value::Null);
        assert_eq!(json["day"], "2020-04-01");
        let back: Contact = serde_json::from_value(json).unwrap();
        assert_eq!(back, contact);
    }

    #[test]
    fn test_handshake_serde_none_rssi() {
        let json = r#"{"eph_id":[1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],"timestamp":"2020-04-01T10:00:00Z","rssi":null}"#;
        let handshake: Handshake = serde_json::from_str(json).unwrap();
        assert!(handshake.rssi.is_none());
        assert_eq!(handshake.eph_id, EphId::new([1; 16]));
    }
}
