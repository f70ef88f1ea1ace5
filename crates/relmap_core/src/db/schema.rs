//! Normalized table layout for parent aggregates.
//!
//! # Invariants
//! - `parents.id` and `children.id` are unique.
//! - `parent_children (parent_id, child_id)` is the composite primary key.
//! - Link rows reference existing parents and children (`foreign_keys=ON`).
//!
//! The tables are created by migration `0001_aggregates.sql`; this module
//! only names them.

use super::DbResult;
use rusqlite::Connection;
use std::fmt::{Display, Formatter};

/// One of the three tables backing the aggregate mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateTable {
    /// One row per parent identity.
    Parents,
    /// One row per child identity, shared by every parent referencing it.
    Children,
    /// Membership rows `(parent_id, child_id, position)`.
    ParentChildren,
}

impl AggregateTable {
    /// Tables in the order a batch writes them.
    pub const WRITE_ORDER: [AggregateTable; 3] = [
        AggregateTable::Parents,
        AggregateTable::Children,
        AggregateTable::ParentChildren,
    ];

    /// SQL table name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Parents => "parents",
            Self::Children => "children",
            Self::ParentChildren => "parent_children",
        }
    }
}

impl Display for AggregateTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Counts stored rows in one aggregate table.
pub fn row_count(conn: &Connection, table: AggregateTable) -> DbResult<u64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {};", table.name()),
        [],
        |row| row.get(0),
    )?;
    Ok(count.max(0) as u64)
}
