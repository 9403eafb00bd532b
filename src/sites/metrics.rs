//! Calculate hot allocation sites and heap distribution.
//!
//! Hot sites are the allocation sites responsible for the most bytes.
//! These are the primary places to look when memory use is too high.

use super::tree::{Site, SiteTree};
use crate::graph::HeapGraph;
use crate::output::schema::{HeapSummary, HotSite};
use crate::snapshot::SnapshotIndex;
use log::debug;

/// Rank allocation sites by size
///
/// **Public** - main entry point for site metrics
///
/// # Arguments
/// * `tree` - Allocation-site tree of an indexed snapshot
/// * `top_n` - Number of sites to return
///
/// # Returns
/// Non-root sites sorted by cumulative size (descending); ties keep
/// the shallower, earlier-created site first
pub fn calculate_hot_sites(tree: &SiteTree, top_n: usize) -> Vec<HotSite> {
    debug!("Calculating top {} hot sites from {} sites", top_n, tree.site_count());

    let total = tree.root().total_size();

    let mut sites: Vec<&Site> = tree.iter().filter(|s| !s.is_root()).collect();
    sites.sort_by(|a, b| b.total_size().cmp(&a.total_size()).then(a.id().cmp(&b.id())));

    sites
        .into_iter()
        .take(top_n)
        .map(|site| create_hot_site(tree, site, total))
        .collect()
}

/// Create a HotSite from a Site
///
/// **Public** - also used when reporting a single site
pub fn create_hot_site(tree: &SiteTree, site: &Site, total: u64) -> HotSite {
    let path = tree
        .path_of(site)
        .iter()
        .map(|frame| frame.to_string())
        .collect::<Vec<_>>()
        .join(";");

    HotSite {
        path,
        stack_id: site.stack_id(),
        depth: site.depth(),
        size: site.total_size(),
        count: site.total_count(),
        percentage: percentage_of(site.total_size(), total),
    }
}

/// Calculate how reachable bytes are spread over heaps
///
/// **Public** - provides summary statistics
pub fn calculate_heap_distribution<G: HeapGraph>(index: &SnapshotIndex<G>) -> HeapDistribution {
    let total = index.total_size();

    let heaps = index
        .heaps()
        .iter()
        .map(|heap| {
            let size = index.heap_size(heap.id);
            HeapSummary {
                name: heap.name.clone(),
                index: index.heap_index(heap.id).unwrap_or(heap.id.0),
                size,
                percentage: percentage_of(size, total),
            }
        })
        .collect();

    HeapDistribution { total, heaps }
}

fn percentage_of(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Heap distribution statistics
///
/// **Public** - returned from calculate_heap_distribution
#[derive(Debug, Clone, Default)]
pub struct HeapDistribution {
    /// Reachable bytes over all heaps
    pub total: u64,

    /// Per-heap totals, in heap order
    pub heaps: Vec<HeapSummary>,
}

impl HeapDistribution {
    /// Heap holding the most reachable bytes
    pub fn largest(&self) -> Option<&HeapSummary> {
        self.heaps.iter().max_by_key(|h| h.size)
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .heaps
            .iter()
            .map(|h| format!("{}: {} ({:.1}%)", h.name, h.size, h.percentage))
            .collect();
        format!("Total: {} bytes | {}", self.total, parts.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryGraph;
    use serde_json::json;

    fn index() -> SnapshotIndex<MemoryGraph> {
        let graph = MemoryGraph::from_json(&json!({
            "heaps": ["zygote", "app"],
            "stacks": [
                {"id": 1, "frames": [{"method": "alloc"}, {"method": "main"}]},
                {"id": 2, "frames": [{"method": "other"}, {"method": "main"}]}
            ],
            "instances": [
                {"id": 1, "size": 0, "heap": "app"},
                {"id": 2, "size": 60, "heap": "app", "dominator": 1, "stack": 1},
                {"id": 3, "size": 30, "heap": "zygote", "dominator": 1, "stack": 2},
                {"id": 4, "size": 10, "heap": "app", "dominator": 1}
            ]
        }))
        .unwrap();
        SnapshotIndex::new(graph)
    }

    #[test]
    fn test_calculate_hot_sites() {
        let index = index();
        let hot = calculate_hot_sites(index.sites(), 2);

        assert_eq!(hot.len(), 2);
        assert_eq!(hot[0].path, "main");
        assert_eq!(hot[0].size, 90);
        assert_eq!(hot[0].percentage, 90.0);
        assert_eq!(hot[1].path, "main;alloc");
        assert_eq!(hot[1].stack_id, 1);
        assert_eq!(hot[1].depth, 2);
    }

    #[test]
    fn test_hot_sites_empty_tree() {
        let tree = SiteTree::new();
        assert!(calculate_hot_sites(&tree, 10).is_empty());
    }

    #[test]
    fn test_heap_distribution() {
        let index = index();
        let dist = calculate_heap_distribution(&index);

        assert_eq!(dist.total, 100);
        assert_eq!(dist.heaps.len(), 2);
        assert_eq!(dist.heaps[0].name, "zygote");
        assert_eq!(dist.heaps[0].size, 30);
        assert_eq!(dist.heaps[1].percentage, 70.0);
        assert_eq!(dist.largest().map(|h| h.name.as_str()), Some("app"));
        assert!(dist.summary().starts_with("Total: 100 bytes"));
    }

    #[test]
    fn test_percentage_of_zero_total() {
        assert_eq!(percentage_of(10, 0), 0.0);
    }
}
