//! Core mapping between parent/child aggregates and normalized SQLite tables.
//! This crate owns the write dedup and read regrouping rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::schema::{row_count, AggregateTable};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::aggregate::{Child, ChildId, Parent, ParentId};
pub use repo::aggregate_reader::{AggregateReader, SqliteAggregateReader, FETCH_KEY_CHUNK};
pub use repo::aggregate_writer::{
    stage_batch, AggregateWriter, SqliteAggregateWriter, StagedBatch, StagedLink,
};
pub use repo::{AggregateError, AggregateResult};
pub use service::aggregate_service::{
    AggregateService, AggregateServiceError, Fetched, ParentKey, SqliteAggregateService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
