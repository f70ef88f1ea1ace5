//! Aggregate use-case service.
//!
//! # Responsibility
//! - Provide bulk create and shape-mirroring query entry points.
//! - Translate repository not-found errors into service errors.
//!
//! # Invariants
//! - `query(ParentKey::One)` always answers `Fetched::One`, and
//!   `query(ParentKey::Many)` always answers `Fetched::Many`.
//! - Service APIs never bypass writer/reader atomicity contracts.

use crate::db::schema::AggregateTable;
use crate::model::aggregate::{Parent, ParentId};
use crate::repo::aggregate_reader::{AggregateReader, SqliteAggregateReader};
use crate::repo::aggregate_writer::{AggregateWriter, SqliteAggregateWriter};
use crate::repo::AggregateError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lookup key for `AggregateService::query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentKey {
    One(ParentId),
    Many(Vec<ParentId>),
}

impl From<ParentId> for ParentKey {
    fn from(value: ParentId) -> Self {
        Self::One(value)
    }
}

impl From<Vec<ParentId>> for ParentKey {
    fn from(value: Vec<ParentId>) -> Self {
        Self::Many(value)
    }
}

/// Query result whose shape mirrors the `ParentKey` variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    One(Parent),
    Many(Vec<Parent>),
}

impl Fetched {
    /// Returns the single aggregate for a `ParentKey::One` query.
    pub fn into_one(self) -> Option<Parent> {
        match self {
            Self::One(parent) => Some(parent),
            Self::Many(_) => None,
        }
    }

    /// Returns aggregates as a list; a single result becomes a one-item list.
    pub fn into_many(self) -> Vec<Parent> {
        match self {
            Self::One(parent) => vec![parent],
            Self::Many(parents) => parents,
        }
    }
}

/// Errors from aggregate service operations.
#[derive(Debug)]
pub enum AggregateServiceError {
    /// Single-key query found no stored parent.
    ParentNotFound(ParentId),
    /// Batch rejected by a storage constraint; nothing was written.
    BatchRejected {
        table: AggregateTable,
        source: AggregateError,
    },
    /// Other repository-level failure.
    Repo(AggregateError),
}

impl Display for AggregateServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParentNotFound(id) => write!(f, "parent not found: {id}"),
            Self::BatchRejected { table, .. } => {
                write!(f, "aggregate batch rejected by `{table}` constraint")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AggregateServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ParentNotFound(_) => None,
            Self::BatchRejected { source, .. } => Some(source),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<AggregateError> for AggregateServiceError {
    fn from(value: AggregateError) -> Self {
        match value {
            AggregateError::NotFound(id) => Self::ParentNotFound(id),
            AggregateError::ConstraintViolation { table, .. } => Self::BatchRejected {
                table,
                source: value,
            },
            other => Self::Repo(other),
        }
    }
}

/// Aggregate service facade over a writer/reader pair.
pub struct AggregateService<W: AggregateWriter, R: AggregateReader> {
    writer: W,
    reader: R,
}

/// Service wired to SQLite writer and reader sharing one connection.
pub type SqliteAggregateService<'conn> =
    AggregateService<SqliteAggregateWriter<'conn>, SqliteAggregateReader<'conn>>;

impl<'conn> SqliteAggregateService<'conn> {
    /// Builds writer and reader over the same migrated connection.
    pub fn from_connection(conn: &'conn Connection) -> Self {
        Self::new(
            SqliteAggregateWriter::new(conn),
            SqliteAggregateReader::new(conn),
        )
    }
}

impl<W: AggregateWriter, R: AggregateReader> AggregateService<W, R> {
    pub fn new(writer: W, reader: R) -> Self {
        Self { writer, reader }
    }

    /// Bulk-creates parents and returns how many were inserted.
    pub fn create_many(&self, parents: &[Parent]) -> Result<usize, AggregateServiceError> {
        Ok(self.writer.write(parents)?)
    }

    /// Loads one aggregate by stable ID.
    pub fn get(&self, id: ParentId) -> Result<Parent, AggregateServiceError> {
        Ok(self.reader.fetch_one(id)?)
    }

    /// Loads the stored aggregates among `ids`, unknown keys omitted.
    pub fn get_many(&self, ids: &[ParentId]) -> Result<Vec<Parent>, AggregateServiceError> {
        Ok(self.reader.fetch_many(ids)?)
    }

    /// Queries one or many parents; the result shape follows the key shape.
    pub fn query(&self, key: impl Into<ParentKey>) -> Result<Fetched, AggregateServiceError> {
        match key.into() {
            ParentKey::One(id) => self.get(id).map(Fetched::One),
            ParentKey::Many(ids) => self.get_many(&ids).map(Fetched::Many),
        }
    }
}
