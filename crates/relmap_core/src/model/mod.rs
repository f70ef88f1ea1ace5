//! Aggregate domain model.
//!
//! # Responsibility
//! - Define the in-memory parent/child aggregate handed to writers and
//!   returned by readers.
//!
//! # Invariants
//! - Every parent and child carries a stable UUID identity before it reaches
//!   storage.
//! - A child may appear under several parents; its identity is shared.

pub mod aggregate;
