//! Parent/child aggregate model.
//!
//! # Invariants
//! - `Parent::children` order is meaningful and survives a storage round trip.
//! - Two `Child` values with the same `id` denote the same stored row.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a parent aggregate.
pub type ParentId = Uuid;

/// Stable identifier of a child entity.
pub type ChildId = Uuid;

/// Child entity referenced by one or more parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Child {
    pub id: ChildId,
}

impl Child {
    /// Creates a child with a generated identity.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a child with a caller-provided identity.
    pub fn with_id(id: ChildId) -> Self {
        Self { id }
    }
}

impl Default for Child {
    fn default() -> Self {
        Self::new()
    }
}

/// Parent aggregate owning an ordered list of child references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    pub id: ParentId,
    /// Ordered membership; the same child may also appear under other parents.
    pub children: Vec<Child>,
}

impl Parent {
    /// Creates a parent with a generated identity.
    pub fn new(children: Vec<Child>) -> Self {
        Self::with_id(Uuid::new_v4(), children)
    }

    /// Creates a parent with a caller-provided identity.
    ///
    /// Used by readers rebuilding aggregates from stored rows.
    pub fn with_id(id: ParentId, children: Vec<Child>) -> Self {
        Self { id, children }
    }

    /// Child identities in membership order.
    pub fn child_ids(&self) -> Vec<ChildId> {
        self.children.iter().map(|child| child.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Child, Parent};

    #[test]
    fn generated_identities_are_distinct() {
        let first = Child::new();
        let second = Child::new();
        assert_ne!(first.id, second.id);
        assert_ne!(Parent::new(Vec::new()).id, Parent::new(Vec::new()).id);
    }

    #[test]
    fn child_ids_keep_membership_order() {
        let a = Child::new();
        let b = Child::new();
        let parent = Parent::new(vec![b, a, b]);
        assert_eq!(parent.child_ids(), vec![b.id, a.id, b.id]);
    }
}
