//! Bulk aggregate writer and SQLite implementation.
//!
//! # Responsibility
//! - Stage parent, child and link rows for a batch of aggregates.
//! - Insert the staged rows in one atomic transaction.
//!
//! # Invariants
//! - Each distinct child identity is staged at most once per batch.
//! - Every child position produces its own link row; a parent listing the
//!   same child twice fails on the link primary key.
//! - Any constraint failure rolls back the whole batch.
//! - Identities are never generated here.

use crate::db::schema::AggregateTable;
use crate::model::aggregate::{ChildId, Parent, ParentId};
use crate::repo::{AggregateError, AggregateResult};
use log::{debug, error, info};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::collections::HashSet;
use std::time::Instant;

/// One staged `parent_children` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagedLink {
    pub parent_id: ParentId,
    pub child_id: ChildId,
    /// Index of the child inside its parent's list.
    pub position: i64,
}

/// Rows computed for one batch before any SQL runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedBatch {
    pub parents: Vec<ParentId>,
    pub children: Vec<ChildId>,
    pub links: Vec<StagedLink>,
}

/// Builds the insert rows for `parents`, deduplicating children by identity.
pub fn stage_batch(parents: &[Parent]) -> StagedBatch {
    let mut batch = StagedBatch::default();
    let mut staged_children = HashSet::new();

    for parent in parents {
        batch.parents.push(parent.id);
        for (position, child) in parent.children.iter().enumerate() {
            if staged_children.insert(child.id) {
                batch.children.push(child.id);
            }
            batch.links.push(StagedLink {
                parent_id: parent.id,
                child_id: child.id,
                position: position as i64,
            });
        }
    }

    batch
}

/// Writer contract for bulk aggregate creation.
pub trait AggregateWriter {
    /// Inserts every parent with its children and links, returning the
    /// number of parent rows inserted. An empty batch is a no-op.
    fn write(&self, parents: &[Parent]) -> AggregateResult<usize>;
}

/// SQLite-backed bulk writer.
pub struct SqliteAggregateWriter<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAggregateWriter<'conn> {
    /// Creates a writer over a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AggregateWriter for SqliteAggregateWriter<'_> {
    fn write(&self, parents: &[Parent]) -> AggregateResult<usize> {
        if parents.is_empty() {
            debug!("event=aggregate_write module=repo status=skipped reason=empty_batch");
            return Ok(0);
        }

        let started_at = Instant::now();
        let batch = stage_batch(parents);
        match insert_staged(self.conn, &batch) {
            Ok(inserted) => {
                info!(
                    "event=aggregate_write module=repo status=ok parents={} children={} links={} duration_ms={}",
                    inserted,
                    batch.children.len(),
                    batch.links.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(inserted)
            }
            Err(err) => {
                error!(
                    "event=aggregate_write module=repo status=error parents={} duration_ms={} error_code={} error={}",
                    batch.parents.len(),
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }
}

// Dropping `tx` on any early return rolls the batch back.
fn insert_staged(conn: &Connection, batch: &StagedBatch) -> AggregateResult<usize> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let mut inserted = 0;
    {
        let mut stmt = tx.prepare_cached("INSERT INTO parents (id) VALUES (?1);")?;
        for parent_id in &batch.parents {
            inserted += stmt
                .execute([parent_id.to_string()])
                .map_err(|err| AggregateError::from_insert(AggregateTable::Parents, err))?;
        }
    }

    if !batch.children.is_empty() {
        let mut stmt = tx.prepare_cached("INSERT INTO children (id) VALUES (?1);")?;
        for child_id in &batch.children {
            stmt.execute([child_id.to_string()])
                .map_err(|err| AggregateError::from_insert(AggregateTable::Children, err))?;
        }
    }

    if !batch.links.is_empty() {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO parent_children (parent_id, child_id, position)
             VALUES (?1, ?2, ?3);",
        )?;
        for link in &batch.links {
            stmt.execute(params![
                link.parent_id.to_string(),
                link.child_id.to_string(),
                link.position,
            ])
            .map_err(|err| AggregateError::from_insert(AggregateTable::ParentChildren, err))?;
        }
    }

    tx.commit()?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::{stage_batch, StagedLink};
    use crate::model::aggregate::{Child, Parent};

    #[test]
    fn shared_child_is_staged_once_with_one_link_per_parent() {
        let shared = Child::new();
        let first = Parent::new(vec![Child::new(), shared]);
        let second = Parent::new(vec![shared]);

        let batch = stage_batch(&[first.clone(), second.clone()]);
        assert_eq!(batch.parents, vec![first.id, second.id]);
        assert_eq!(batch.children, vec![first.children[0].id, shared.id]);
        assert_eq!(batch.links.len(), 3);
        assert_eq!(
            batch.links[2],
            StagedLink {
                parent_id: second.id,
                child_id: shared.id,
                position: 0,
            }
        );
    }

    #[test]
    fn repeated_child_within_one_parent_keeps_both_links() {
        let child = Child::new();
        let parent = Parent::new(vec![child, child]);

        let batch = stage_batch(&[parent]);
        assert_eq!(batch.children, vec![child.id]);
        let positions: Vec<i64> = batch.links.iter().map(|link| link.position).collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn parent_without_children_stages_only_parent_row() {
        let parent = Parent::new(Vec::new());
        let batch = stage_batch(&[parent.clone()]);
        assert_eq!(batch.parents, vec![parent.id]);
        assert!(batch.children.is_empty());
        assert!(batch.links.is_empty());
    }

    #[test]
    fn duplicate_parent_objects_are_not_collapsed() {
        let parent = Parent::new(vec![Child::new()]);
        let batch = stage_batch(&[parent.clone(), parent]);
        assert_eq!(batch.parents.len(), 2);
        assert_eq!(batch.children.len(), 1);
        assert_eq!(batch.links.len(), 2);
    }
}
