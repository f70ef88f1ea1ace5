//! SQLite connection provider and schema bootstrap for aggregate storage.
//!
//! # Responsibility
//! - Open and configure SQLite connections handed to writers and readers.
//! - Apply schema migrations in deterministic order.
//! - Describe the normalized parent/child/link table layout.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Aggregate reads/writes must not run before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory, BUSY_TIMEOUT};

pub type DbResult<T> = Result<T, DbError>;

/// Connection provider and bootstrap failure.
#[derive(Debug)]
pub enum DbError {
    /// Any SQLite failure, passed through untouched.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer aggregate schema than this build knows.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Stable short code used in `db_open` log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite_error",
            Self::UnsupportedSchemaVersion { .. } => "unsupported_aggregate_schema",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "aggregate schema version {db_version} (parents/children/parent_children) \
                 is newer than supported version {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
