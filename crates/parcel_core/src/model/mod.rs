//! Domain model for shipment records.
//!
//! # Invariants
//! - Every parcel is identified by a store-assigned `ParcelNumber`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod parcel;
