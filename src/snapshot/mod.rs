//! Snapshot indexing and the query surface used by analysis code.
//!
//! This module transforms a finalized heap graph into:
//! - A dominated-children index (dominator tree navigation)
//! - Per-heap reachable byte totals
//! - An allocation-site tree

pub mod dominated;
pub mod index;

// Re-export main types
pub use dominated::DominatedIndex;
pub use index::{display_name_of, SnapshotIndex};
