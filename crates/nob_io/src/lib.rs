//! # Nob IO
//!
//! Persistence layer for simulation runs.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - JSON serialization helpers
//! - Reading and writing trajectory logs, optionally gzip-compressed

/// Error types and result aliases for I/O operations
pub mod error;
/// Validated serialization helpers for JSON
pub mod serialization;
/// Trajectory log files
pub mod trajectory;

pub use error::{IoError, Result};
pub use serialization::{from_json, read_json_file, to_json, to_json_pretty, write_json_file};
pub use trajectory::{read_trajectory, write_trajectory};
