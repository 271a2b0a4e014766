//! Lazily opened pet store handle.
//!
//! # Responsibility
//! - Defer opening the database until the first operation needs it.
//! - Keep one connection open for the lifetime of the handle.
//! - Verify externally opened connections before adopting them.
//!
//! # Invariants
//! - `connection()` never returns a connection without the `pets` table.
//! - A failed open leaves the handle unopened so the next call retries.

use super::migrations::{current_user_version, latest_version};
use super::{open_db, open_db_in_memory, DbError, DbResult};
use crate::model::contract::{Column, TABLE_NAME};
use once_cell::unsync::OnceCell;
use rusqlite::Connection;
use std::collections::HashSet;
use std::path::PathBuf;

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

/// Process-wide pet store handle.
pub struct PetStore {
    location: StoreLocation,
    conn: OnceCell<Connection>,
}

impl PetStore {
    /// Creates a handle for a database file. No I/O happens until first use.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            conn: OnceCell::new(),
        }
    }

    /// Creates a handle for a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            conn: OnceCell::new(),
        }
    }

    /// Adopts an already opened connection after checking it is migrated.
    ///
    /// # Errors
    /// - `UnsupportedSchemaVersion` when `user_version` is newer than supported.
    /// - `UninitializedConnection` when `user_version` is older than the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the pet table
    ///   does not match the contract.
    pub fn from_connection(conn: Connection) -> DbResult<Self> {
        ensure_connection_ready(&conn)?;
        let location = match conn.path() {
            Some(path) if !path.is_empty() => StoreLocation::File(PathBuf::from(path)),
            _ => StoreLocation::Memory,
        };
        Ok(Self {
            location,
            conn: OnceCell::with_value(conn),
        })
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Whether the underlying connection has been opened yet.
    pub fn is_open(&self) -> bool {
        self.conn.get().is_some()
    }

    /// Returns the open connection, opening and migrating it on first use.
    pub fn connection(&self) -> DbResult<&Connection> {
        self.conn.get_or_try_init(|| match &self.location {
            StoreLocation::File(path) => open_db(path),
            StoreLocation::Memory => open_db_in_memory(),
        })
    }
}

fn ensure_connection_ready(conn: &Connection) -> DbResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version > expected_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: actual_version,
            latest_supported: expected_version,
        });
    }
    if actual_version != expected_version {
        return Err(DbError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({TABLE_NAME});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<HashSet<_>, _>>()?;

    if columns.is_empty() {
        return Err(DbError::MissingRequiredTable(TABLE_NAME));
    }

    for column in Column::ALL {
        if !columns.contains(column.as_str()) {
            return Err(DbError::MissingRequiredColumn {
                table: TABLE_NAME,
                column: column.as_str(),
            });
        }
    }

    Ok(())
}
