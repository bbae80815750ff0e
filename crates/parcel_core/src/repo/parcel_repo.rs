//! Parcel repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide record-level APIs over the `parcel` table.
//! - Enforce the `registered` gate on address changes and deletion.
//!
//! # Invariants
//! - `set_status` is unconditional and does not report missing parcels.
//! - Gated writes carry `status = 'registered'` in their `WHERE` clause, so a
//!   concurrent status change between check and write cannot bypass the gate.
//! - Errors are returned to the caller; nothing is logged or retried here.

use crate::db::DbError;
use crate::model::parcel::{
    is_registered, ClientId, NewParcel, Parcel, ParcelNumber, STATUS_REGISTERED,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

const PARCEL_TABLE: &str = "parcel";

const PARCEL_COLUMNS: [&str; 5] = ["number", "client", "status", "address", "created_at"];

const PARCEL_SELECT_SQL: &str = "SELECT
    number,
    client,
    status,
    address,
    created_at
FROM parcel";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from parcel repository operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Underlying SQLite failure.
    #[error("{0}")]
    Db(#[from] DbError),
    /// No parcel exists for the key.
    #[error("parcel {0} does not exist")]
    NotFound(ParcelNumber),
    /// Parcel exists but its status closes the gate.
    #[error("invalid status `{status}` for this operation on parcel {number}; expected `registered`")]
    InvalidStatus {
        number: ParcelNumber,
        status: String,
    },
    /// The guarded write matched nothing although the pre-check passed.
    /// Also returned by `set_address` when its guarded update loses a race.
    #[error("no rows deleted for parcel {0}")]
    NoRowsAffected(ParcelNumber),
    /// Required table is missing.
    #[error("parcel repository requires table `{0}`")]
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    #[error("parcel repository requires column `{column}` in table `{table}`")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_invalid_status(&self) -> bool {
        matches!(self, Self::InvalidStatus { .. })
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for parcel records.
pub trait ParcelRepository {
    /// Inserts a parcel and returns the store-assigned key.
    fn add(&self, parcel: &NewParcel) -> RepoResult<ParcelNumber>;
    /// Loads one parcel by key.
    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel>;
    /// Lists every parcel of one client in store scan order.
    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>>;
    /// Overwrites the status. Succeeds for unknown keys.
    fn set_status(&self, number: ParcelNumber, status: &str) -> RepoResult<()>;
    /// Changes the address of a registered parcel.
    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()>;
    /// Removes a registered parcel.
    fn delete(&self, number: ParcelNumber) -> RepoResult<()>;
}

/// SQLite-backed parcel repository borrowing a caller-owned connection.
pub struct SqliteParcelRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParcelRepository<'conn> {
    /// Creates repository after checking the `parcel` table shape.
    ///
    /// The schema version is not checked, so tables created outside
    /// [`crate::db::open_db`] are accepted as long as the columns match.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_parcel_table_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ParcelRepository for SqliteParcelRepository<'_> {
    fn add(&self, parcel: &NewParcel) -> RepoResult<ParcelNumber> {
        self.conn.execute(
            "INSERT INTO parcel (
                client,
                status,
                address,
                created_at
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                parcel.client,
                parcel.status.as_str(),
                parcel.address.as_str(),
                parcel.created_at.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        self.conn
            .query_row(
                &format!("{PARCEL_SELECT_SQL} WHERE number = ?1;"),
                [number],
                parse_parcel_row,
            )
            .optional()?
            .ok_or(RepoError::NotFound(number))
    }

    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PARCEL_SELECT_SQL} WHERE client = ?1;"))?;
        let mut rows = stmt.query([client])?;

        let mut parcels = Vec::new();
        while let Some(row) = rows.next()? {
            parcels.push(parse_parcel_row(row)?);
        }
        Ok(parcels)
    }

    fn set_status(&self, number: ParcelNumber, status: &str) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE parcel SET status = ?2 WHERE number = ?1;",
            params![number, status],
        )?;
        Ok(())
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        ensure_registered(self.conn, number)?;

        let changed = self.conn.execute(
            "UPDATE parcel
             SET address = ?2
             WHERE number = ?1
               AND status = ?3;",
            params![number, address, STATUS_REGISTERED],
        )?;
        if changed == 0 {
            // Lost the race: report the state that closed the gate.
            ensure_registered(self.conn, number)?;
            return Err(RepoError::NoRowsAffected(number));
        }
        Ok(())
    }

    fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        ensure_registered(self.conn, number)?;

        let changed = self.conn.execute(
            "DELETE FROM parcel
             WHERE number = ?1
               AND status = ?2;",
            params![number, STATUS_REGISTERED],
        )?;
        if changed == 0 {
            return Err(RepoError::NoRowsAffected(number));
        }
        Ok(())
    }
}

fn ensure_registered(conn: &Connection, number: ParcelNumber) -> RepoResult<()> {
    let status: Option<String> = conn
        .query_row(
            "SELECT status FROM parcel WHERE number = ?1;",
            [number],
            |row| row.get(0),
        )
        .optional()?;

    match status {
        None => Err(RepoError::NotFound(number)),
        Some(status) if is_registered(&status) => Ok(()),
        Some(status) => Err(RepoError::InvalidStatus { number, status }),
    }
}

fn parse_parcel_row(row: &Row<'_>) -> rusqlite::Result<Parcel> {
    Ok(Parcel {
        number: row.get("number")?,
        client: row.get("client")?,
        status: row.get("status")?,
        address: row.get("address")?,
        created_at: row.get("created_at")?,
    })
}

fn ensure_parcel_table_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, PARCEL_TABLE)? {
        return Err(RepoError::MissingRequiredTable(PARCEL_TABLE));
    }

    for column in PARCEL_COLUMNS {
        if !table_has_column(conn, PARCEL_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: PARCEL_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
