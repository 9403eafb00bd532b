//! Output JSON schema definitions for snapshot reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Reachable bytes over all heaps
    pub total_size: u64,

    /// Per-heap totals, in heap order
    pub heaps: Vec<HeapSummary>,

    /// Number of GC roots in the graph
    pub gc_root_count: usize,

    /// Number of allocation sites, root included
    pub site_count: usize,

    /// Largest allocation sites
    pub hot_sites: Vec<HotSite>,

    /// Timestamp when report was generated
    pub generated_at: String,
}

/// Reachable size of one heap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeapSummary {
    pub name: String,
    pub index: usize,
    pub size: u64,

    /// Share of all reachable bytes
    pub percentage: f64,
}

/// An allocation site ranked by retained allocation size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotSite {
    /// Frames from the outermost caller, separated by ';'
    pub path: String,

    /// Stack id and depth addressing this site
    pub stack_id: u32,
    pub depth: usize,

    /// Bytes allocated at or below this site, all heaps
    pub size: u64,

    /// Objects allocated at or below this site, all heaps
    pub count: u64,

    /// Percentage of all indexed bytes
    pub percentage: f64,
}
