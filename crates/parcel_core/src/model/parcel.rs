//! Parcel domain model.
//!
//! # Responsibility
//! - Define the stored parcel record and its insert payload.
//! - Own the status value that opens the mutation gate.
//!
//! # Invariants
//! - `number` is assigned by the store and never reused.
//! - `client` and `created_at` never change after insert.
//! - Only `status == STATUS_REGISTERED` allows address changes and deletion.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned parcel key.
pub type ParcelNumber = i64;

/// Owning client identifier.
pub type ClientId = i64;

/// Initial status; the only value that permits address changes and deletion.
pub const STATUS_REGISTERED: &str = "registered";
/// Conventional status once a parcel has left the depot.
pub const STATUS_SENT: &str = "sent";
/// Conventional terminal status.
pub const STATUS_DELIVERED: &str = "delivered";

/// Returns whether `status` opens the address/delete gate.
///
/// The check is value-based: a parcel moved back to `registered` is mutable
/// again.
pub fn is_registered(status: &str) -> bool {
    status == STATUS_REGISTERED
}

/// Current UTC time in RFC 3339 with second precision, e.g.
/// `2024-05-01T12:30:00Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Stored parcel record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    pub number: ParcelNumber,
    pub client: ClientId,
    /// Free-form status string. Not validated beyond the gate check.
    pub status: String,
    pub address: String,
    pub created_at: String,
}

impl Parcel {
    /// Returns whether address changes and deletion are currently allowed.
    pub fn is_registered(&self) -> bool {
        is_registered(&self.status)
    }
}

/// Insert payload for a parcel that has no key yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParcel {
    pub client: ClientId,
    pub status: String,
    pub address: String,
    pub created_at: String,
}

impl NewParcel {
    /// Builds a payload in the initial `registered` state.
    pub fn registered(
        client: ClientId,
        address: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            client,
            status: STATUS_REGISTERED.to_string(),
            address: address.into(),
            created_at: created_at.into(),
        }
    }

    /// Attaches the store-assigned key, producing the stored record shape.
    pub fn into_parcel(self, number: ParcelNumber) -> Parcel {
        Parcel {
            number,
            client: self.client,
            status: self.status,
            address: self.address,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{is_registered, timestamp_now, NewParcel, STATUS_REGISTERED, STATUS_SENT};

    #[test]
    fn registered_payload_starts_in_registered_state() {
        let parcel = NewParcel::registered(7, "Main st. 1", "2024-05-01T12:30:00Z");
        assert_eq!(parcel.status, STATUS_REGISTERED);
        assert_eq!(parcel.client, 7);
    }

    #[test]
    fn gate_is_exact_match_on_status_value() {
        assert!(is_registered("registered"));
        assert!(!is_registered(STATUS_SENT));
        assert!(!is_registered("Registered"));
        assert!(!is_registered(" registered"));
    }

    #[test]
    fn into_parcel_keeps_payload_fields() {
        let parcel = NewParcel::registered(3, "addr", "t0").into_parcel(42);
        assert_eq!(parcel.number, 42);
        assert_eq!(parcel.address, "addr");
        assert_eq!(parcel.created_at, "t0");
        assert!(parcel.is_registered());
    }

    #[test]
    fn timestamp_now_is_rfc3339_utc() {
        let stamp = timestamp_now();
        assert!(stamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
