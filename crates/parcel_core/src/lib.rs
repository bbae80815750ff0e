//! Persistence layer for parcel shipment records.
//! The repository is the single place where the `registered` gate is enforced.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::parcel::{
    is_registered, timestamp_now, ClientId, NewParcel, Parcel, ParcelNumber, STATUS_DELIVERED,
    STATUS_REGISTERED, STATUS_SENT,
};
pub use repo::parcel_repo::{ParcelRepository, RepoError, RepoResult, SqliteParcelRepository};
pub use service::parcel_service::ParcelService;
