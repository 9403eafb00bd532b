//! heapsnap
//!
//! Post-processing for heap snapshots whose immediate dominators are
//! already known: dominator-tree navigation, per-heap reachable sizes and
//! an allocation-site tree with size roll-ups and drill-down.
//!
//! ## Getting Started
//!
//! ```ignore
//! use heapsnap::graph::MemoryGraph;
//! use heapsnap::snapshot::SnapshotIndex;
//!
//! let index = SnapshotIndex::new(MemoryGraph::load("graph.json")?);
//! for heap in index.heaps() {
//!     println!("{}: {} bytes", heap.name, index.heap_size(heap.id));
//! }
//! ```

pub mod commands;
pub mod graph;
pub mod output;
pub mod sites;
pub mod snapshot;
pub mod utils;
