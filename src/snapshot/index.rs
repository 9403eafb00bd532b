//! Snapshot index: one pass over a finalized heap graph.
//!
//! Builds the dominated-children index, per-heap reachable totals and the
//! allocation-site tree, then serves read-only queries over them.

use super::dominated::DominatedIndex;
use crate::graph::{Heap, HeapGraph, HeapId, Instance, InstanceId, RootObj, StackId};
use crate::sites::{Depth, Site, SiteTree};
use crate::utils::config::{ROOT_CLASS_NAME, UNKNOWN_CLASS_NAME};
use log::{debug, info};
use std::collections::HashMap;

/// Indexed view of a heap graph
///
/// Immutable once built; every query is a plain read.
#[derive(Debug)]
pub struct SnapshotIndex<G> {
    graph: G,
    dominated: DominatedIndex,
    sites: SiteTree,
    heap_sizes: HashMap<HeapId, u64>,

    /// Class assigned to class objects that had none
    class_fixups: HashMap<InstanceId, InstanceId>,
}

impl<G: HeapGraph> SnapshotIndex<G> {
    /// Index `graph`
    ///
    /// **Public** - main entry point of the engine
    ///
    /// # Algorithm
    /// For every instance of every heap that has a dominator:
    /// 1. Add its size to the heap total
    /// 2. Label class objects without a class as `java.lang.Class`
    /// 3. Record it under its dominator
    /// 4. Insert it into the site tree along its reversed allocation stack
    ///
    /// Instances without a dominator are skipped entirely.
    pub fn new(graph: G) -> Self {
        let root_class = graph.find_class(ROOT_CLASS_NAME).map(|c| c.id);
        if root_class.is_none() {
            debug!("No {} class in graph, class objects keep their labels", ROOT_CLASS_NAME);
        }

        let mut dominated = DominatedIndex::new();
        let mut sites = SiteTree::new();
        let mut heap_sizes = HashMap::new();
        let mut class_fixups = HashMap::new();

        for heap in graph.heaps() {
            let mut total = 0u64;
            let mut reachable = 0usize;

            for inst in graph.heap_instances(heap.id) {
                let Some(dominator) = inst.dominator else {
                    continue;
                };
                total = total.saturating_add(inst.size);
                reachable += 1;

                let class = match (inst.class, root_class) {
                    (None, Some(root)) if inst.is_class() => {
                        class_fixups.insert(inst.id, root);
                        Some(root)
                    }
                    (class, _) => class,
                };

                dominated.record(dominator, inst.id);

                let stack = inst.stack.and_then(|id| graph.stack(id));
                let stack_id = stack.map_or(0, |s| s.id);
                let path = stack.into_iter().flat_map(|s| s.root_to_leaf());
                sites.insert(stack_id, Depth::Full, path, inst, class);
            }

            debug!(
                "Heap {}: {} reachable instances, {} bytes",
                heap.name, reachable, total
            );
            heap_sizes.insert(heap.id, total);
        }

        info!(
            "Indexed {} heaps: {} reachable bytes, {} allocation sites, {} dominators",
            graph.heaps().len(),
            heap_sizes.values().fold(0u64, |acc, s| acc.saturating_add(*s)),
            sites.site_count(),
            dominated.dominator_count()
        );

        Self {
            graph,
            dominated,
            sites,
            heap_sizes,
            class_fixups,
        }
    }

    /// The underlying graph
    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn find_class(&self, name: &str) -> Option<&Instance> {
        self.graph.find_class(name)
    }

    pub fn find_instance(&self, id: InstanceId) -> Option<&Instance> {
        self.graph.instance(id)
    }

    pub fn heap_index(&self, heap: HeapId) -> Option<usize> {
        self.graph.heap_index(heap)
    }

    pub fn heap_by_name(&self, name: &str) -> Option<&Heap> {
        self.graph.heap_by_name(name)
    }

    pub fn gc_roots(&self) -> &[RootObj] {
        self.graph.gc_roots()
    }

    pub fn heaps(&self) -> &[Heap] {
        self.graph.heaps()
    }

    pub fn sites(&self) -> &SiteTree {
        &self.sites
    }

    pub fn root_site(&self) -> &Site {
        self.sites.root()
    }

    /// Look up the site at which the given object was allocated.
    /// Objects without a known stack belong to the root site.
    pub fn site_for_instance(&self, inst: &Instance) -> &Site {
        match inst.stack.and_then(|id| self.graph.stack(id)) {
            Some(stack) => self.sites.lookup(stack.root_to_leaf()),
            None => self.sites.root(),
        }
    }

    /// Objects immediately dominated by the given instance
    pub fn dominated_by(&self, inst: InstanceId) -> &[InstanceId] {
        self.dominated.children_of(inst)
    }

    /// Total size of reachable objects allocated on the given heap
    pub fn heap_size(&self, heap: HeapId) -> u64 {
        self.heap_sizes.get(&heap).copied().unwrap_or(0)
    }

    /// Reachable bytes over all heaps
    pub fn total_size(&self) -> u64 {
        self.heap_sizes.values().fold(0, |acc, s| acc.saturating_add(*s))
    }

    /// Site reached by following the first `depth` frames of a stack.
    /// Returns the root site if the stack is unknown.
    pub fn site(&self, stack_id: StackId, depth: impl Into<Depth>) -> &Site {
        let depth = depth.into();
        match self.graph.stack(stack_id) {
            Some(stack) => self.sites.lookup(stack.root_to_leaf().take(depth.limit())),
            None => self.sites.root(),
        }
    }

    /// Class of `inst`, including labels assigned while indexing
    pub fn class_of(&self, inst: &Instance) -> Option<InstanceId> {
        self.class_fixups.get(&inst.id).copied().or(inst.class)
    }

    /// Display name of the class of `inst`
    pub fn class_name_of(&self, inst: &Instance) -> &str {
        let class = self.class_of(inst).and_then(|id| self.graph.instance(id));
        display_name_of(class)
    }
}

/// Name of the given class object, or `"(class unknown)"` when absent
pub fn display_name_of(class: Option<&Instance>) -> &str {
    class
        .and_then(|c| c.class_name())
        .unwrap_or(UNKNOWN_CLASS_NAME)
}
