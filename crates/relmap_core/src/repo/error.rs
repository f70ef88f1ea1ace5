use crate::db::schema::AggregateTable;
use crate::db::DbError;
use crate::model::aggregate::ParentId;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AggregateResult<T> = Result<T, AggregateError>;

/// Error for aggregate persistence and reconstruction.
#[derive(Debug)]
pub enum AggregateError {
    /// A uniqueness or foreign-key constraint rejected a write; the whole
    /// batch was rolled back.
    ConstraintViolation {
        table: AggregateTable,
        source: rusqlite::Error,
    },
    /// No parent row exists for the requested identity.
    NotFound(ParentId),
    /// Connection/provider failure, passed through unchanged.
    Db(DbError),
    /// Persisted data cannot be converted back into an aggregate.
    InvalidData(String),
}

impl AggregateError {
    /// Classifies an insert failure against `table`.
    pub(crate) fn from_insert(table: AggregateTable, err: rusqlite::Error) -> Self {
        let is_constraint = matches!(
            &err,
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::ConstraintViolation
        );
        if is_constraint {
            Self::ConstraintViolation { table, source: err }
        } else {
            Self::Db(DbError::Sqlite(err))
        }
    }

    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConstraintViolation { .. } => "constraint_violation",
            Self::NotFound(_) => "not_found",
            Self::Db(_) => "db_error",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for AggregateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConstraintViolation { table, source } => {
                write!(f, "constraint violation in `{table}`: {source}")
            }
            Self::NotFound(id) => write!(f, "parent not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted aggregate data: {message}"),
        }
    }
}

impl Error for AggregateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ConstraintViolation { source, .. } => Some(source),
            Self::NotFound(_) => None,
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for AggregateError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for AggregateError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
