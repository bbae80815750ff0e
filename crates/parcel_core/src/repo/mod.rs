//! Repository layer contracts and persistence implementations.
//!
//! # Responsibility
//! - Define record-level data access contracts for parcels.
//! - Isolate SQLite query details from callers.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `InvalidStatus`)
//!   separately from storage errors.

pub mod parcel_repo;
