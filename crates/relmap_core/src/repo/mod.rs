//! Repository layer for parent aggregates.
//!
//! # Responsibility
//! - Map `Parent` aggregates onto the normalized parent/child/link tables.
//! - Rebuild aggregates from join rows with a deterministic child order.
//!
//! # Invariants
//! - Writers and readers only borrow the connection; callers own its lifetime.
//! - Repository APIs return semantic errors (`NotFound`,
//!   `ConstraintViolation`) next to unchanged DB transport errors.

pub mod aggregate_reader;
pub mod aggregate_writer;
mod error;

pub use error::{AggregateError, AggregateResult};
