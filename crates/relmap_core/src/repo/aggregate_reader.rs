//! Aggregate reader and SQLite implementation.
//!
//! # Responsibility
//! - Load parents with their linked children through one join query.
//! - Regroup flat join rows into `Parent` aggregates.
//!
//! # Invariants
//! - Rows are ordered by `parents.seq ASC, parent_children.position ASC`, so
//!   child order matches write order and multi-key results follow parent
//!   insertion order.
//! - A stored parent without links comes back with an empty child list; a
//!   missing parent is `NotFound` for single-key reads.
//! - Multi-key reads omit unknown keys.
//! - A link row without its children row is reported, never skipped.

use crate::model::aggregate::{Child, Parent, ParentId};
use crate::repo::{AggregateError, AggregateResult};
use log::{debug, warn};
use rusqlite::{params_from_iter, Connection, Rows};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;
use uuid::Uuid;

/// Maximum number of keys bound into one `IN (...)` query.
pub const FETCH_KEY_CHUNK: usize = 500;

const AGGREGATE_SELECT_SQL: &str = "SELECT
    p.seq AS parent_seq,
    p.id AS parent_id,
    pc.child_id AS link_child_id,
    c.id AS child_id
FROM parents p
LEFT JOIN parent_children pc ON pc.parent_id = p.id
LEFT JOIN children c ON c.id = pc.child_id";

const AGGREGATE_ORDER_SQL: &str = "ORDER BY p.seq ASC, pc.position ASC";

/// Reader contract for aggregate reconstruction.
pub trait AggregateReader {
    /// Loads one aggregate, or `NotFound` when the parent is not stored.
    fn fetch_one(&self, id: ParentId) -> AggregateResult<Parent>;
    /// Loads every stored aggregate among `ids` in parent insertion order.
    fn fetch_many(&self, ids: &[ParentId]) -> AggregateResult<Vec<Parent>>;
}

/// SQLite-backed aggregate reader.
pub struct SqliteAggregateReader<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAggregateReader<'conn> {
    /// Creates a reader over a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AggregateReader for SqliteAggregateReader<'_> {
    fn fetch_one(&self, id: ParentId) -> AggregateResult<Parent> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{AGGREGATE_SELECT_SQL}
             WHERE p.id = ?1
             {AGGREGATE_ORDER_SQL};"
        ))?;
        let mut groups = BTreeMap::new();
        group_rows(stmt.query([id.to_string()])?, &mut groups)?;

        match groups.into_values().next() {
            Some(parent) => Ok(parent),
            None => {
                debug!("event=aggregate_fetch module=repo status=not_found keys=1");
                Err(AggregateError::NotFound(id))
            }
        }
    }

    fn fetch_many(&self, ids: &[ParentId]) -> AggregateResult<Vec<Parent>> {
        let mut seen = HashSet::new();
        let keys: Vec<String> = ids
            .iter()
            .filter(|id| seen.insert(**id))
            .map(|id| id.to_string())
            .collect();
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let started_at = Instant::now();
        let mut groups = BTreeMap::new();
        for chunk in keys.chunks(FETCH_KEY_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let mut stmt = self.conn.prepare(&format!(
                "{AGGREGATE_SELECT_SQL}
                 WHERE p.id IN ({placeholders})
                 {AGGREGATE_ORDER_SQL};"
            ))?;
            group_rows(stmt.query(params_from_iter(chunk))?, &mut groups)?;
        }

        if groups.len() < keys.len() {
            warn!(
                "event=aggregate_fetch module=repo status=partial requested={} found={}",
                keys.len(),
                groups.len()
            );
        }
        debug!(
            "event=aggregate_fetch module=repo status=ok requested={} found={} duration_ms={}",
            keys.len(),
            groups.len(),
            started_at.elapsed().as_millis()
        );

        Ok(groups.into_values().collect())
    }
}

/// Appends join rows to per-parent groups keyed by insertion sequence.
fn group_rows(mut rows: Rows<'_>, groups: &mut BTreeMap<i64, Parent>) -> AggregateResult<()> {
    while let Some(row) = rows.next()? {
        let seq: i64 = row.get("parent_seq")?;
        let parent = match groups.entry(seq) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let parent_text: String = row.get("parent_id")?;
                let parent_id = parse_uuid(&parent_text, "parents.id")?;
                entry.insert(Parent::with_id(parent_id, Vec::new()))
            }
        };

        let link_child: Option<String> = row.get("link_child_id")?;
        let stored_child: Option<String> = row.get("child_id")?;
        match (link_child, stored_child) {
            (None, _) => {}
            (Some(child_text), Some(_)) => {
                let child_id = parse_uuid(&child_text, "children.id")?;
                parent.children.push(Child::with_id(child_id));
            }
            (Some(child_text), None) => {
                return Err(AggregateError::InvalidData(format!(
                    "parent_children.child_id `{child_text}` of parent {} has no children row",
                    parent.id
                )));
            }
        }
    }
    Ok(())
}

fn parse_uuid(value: &str, column: &'static str) -> AggregateResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| AggregateError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}
