//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate writer/reader calls into use-case level APIs.
//! - Keep callers decoupled from SQL and row layout.

pub mod aggregate_service;
