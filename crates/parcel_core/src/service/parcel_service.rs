//! Parcel use-case service.
//!
//! # Responsibility
//! - Provide entry points for callers that do not build insert payloads.
//! - Delegate persistence and gating to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass the repository gate.
//! - No status progression rules live here; statuses pass through verbatim.

use crate::model::parcel::{timestamp_now, ClientId, NewParcel, Parcel, ParcelNumber};
use crate::repo::parcel_repo::{ParcelRepository, RepoResult};

/// Use-case service wrapper for parcel operations.
pub struct ParcelService<R: ParcelRepository> {
    repo: R,
}

impl<R: ParcelRepository> ParcelService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new parcel stamped with the current UTC time.
    ///
    /// Returns the record as stored, including the assigned key.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> RepoResult<Parcel> {
        self.add(NewParcel::registered(client, address, timestamp_now()))
    }

    /// Stores a caller-built payload and returns it with the assigned key.
    pub fn add(&self, new_parcel: NewParcel) -> RepoResult<Parcel> {
        let number = self.repo.add(&new_parcel)?;
        Ok(new_parcel.into_parcel(number))
    }

    pub fn parcel(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        self.repo.get(number)
    }

    pub fn client_parcels(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        self.repo.get_by_client(client)
    }

    pub fn set_status(&self, number: ParcelNumber, status: &str) -> RepoResult<()> {
        self.repo.set_status(number, status)
    }

    /// Changes the address; rejected unless the parcel is `registered`.
    pub fn change_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        self.repo.set_address(number, address)
    }

    /// Deletes the parcel; rejected unless the parcel is `registered`.
    pub fn remove(&self, number: ParcelNumber) -> RepoResult<()> {
        self.repo.delete(number)
    }
}
