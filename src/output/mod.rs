//! Report output.
//!
//! This module handles:
//! - The versioned JSON report schema
//! - Building a report from an indexed snapshot
//! - Writing and reading reports on disk

pub mod json;
pub mod schema;

// Re-export main functions
pub use json::{read_report, report_to_string, to_report, validate_path, write_report};
pub use schema::{HeapSummary, HotSite, SnapshotReport};
