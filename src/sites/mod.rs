//! Allocation sites and size roll-ups over them.
//!
//! This module provides:
//! - The allocation-site tree (objects grouped by allocation stack)
//! - Hot site ranking (largest allocation sites)
//! - Heap distribution statistics

pub mod metrics;
pub mod tree;

// Re-export main types and functions
pub use metrics::{calculate_heap_distribution, calculate_hot_sites, HeapDistribution};
pub use tree::{Depth, ObjectsInfo, Site, SiteId, SiteTree};
