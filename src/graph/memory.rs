//! In-memory heap graph loaded from a JSON description.
//!
//! The description is an already-materialized graph (heaps, instances with
//! their dominators, stacks, roots). Loading validates it so the snapshot
//! engine only ever sees a consistent dominator forest.

use super::schema::{CallStack, Heap, HeapId, Instance, InstanceId, InstanceKind, RootObj, StackId};
use super::HeapGraph;
use crate::utils::error::GraphError;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Serialized form of a heap graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Heap names, in index order
    pub heaps: Vec<String>,

    #[serde(default)]
    pub stacks: Vec<CallStack>,

    #[serde(default)]
    pub instances: Vec<InstanceRecord>,

    #[serde(default)]
    pub roots: Vec<RootObj>,
}

/// Serialized form of a single instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: InstanceId,

    pub size: u64,

    /// Heap name, must be listed in `heaps`
    pub heap: String,

    /// Set when this instance is the class object of the named class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defines_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<InstanceId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominator: Option<InstanceId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<StackId>,
}

/// Heap graph held entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryGraph {
    heaps: Vec<Heap>,
    instances: Vec<Instance>,
    by_id: HashMap<InstanceId, usize>,
    /// Per heap: arena indices of class objects, then of other instances
    members: Vec<Vec<usize>>,
    classes: HashMap<String, InstanceId>,
    stacks: HashMap<StackId, CallStack>,
    roots: Vec<RootObj>,
}

impl MemoryGraph {
    /// Load and validate a graph from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        debug!("Loading heap graph from: {}", path.display());

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, GraphError> {
        let document: GraphDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, GraphError> {
        let document = GraphDocument::deserialize(value)?;
        Self::from_document(document)
    }

    /// Build a graph from its serialized form
    ///
    /// # Errors
    /// * `GraphError::DuplicateHeap` / `DuplicateInstance` / `DuplicateStack`
    /// * `GraphError::UnknownHeap` - instance on a heap not listed
    /// * `GraphError::DanglingReference` - class or dominator id not in the graph
    /// * `GraphError::UnknownStack` - stack id not listed
    /// * `GraphError::UnknownRoot` - GC root id not in the graph
    /// * `GraphError::DominatorCycle` - dominator chain loops back on itself
    /// * `GraphError::SizeOverflow` - sum of all sizes does not fit in a `u64`
    pub fn from_document(document: GraphDocument) -> Result<Self, GraphError> {
        let mut heaps = Vec::with_capacity(document.heaps.len());
        let mut heap_ids: HashMap<String, HeapId> = HashMap::new();
        for (index, name) in document.heaps.into_iter().enumerate() {
            let id = HeapId(index);
            if heap_ids.insert(name.clone(), id).is_some() {
                return Err(GraphError::DuplicateHeap(name));
            }
            heaps.push(Heap { id, name });
        }

        let mut stacks = HashMap::with_capacity(document.stacks.len());
        for stack in document.stacks {
            let id = stack.id;
            if stacks.insert(id, stack).is_some() {
                return Err(GraphError::DuplicateStack(id));
            }
        }

        let mut instances = Vec::with_capacity(document.instances.len());
        let mut by_id = HashMap::with_capacity(document.instances.len());
        let mut classes = HashMap::new();
        let mut total_size = 0u64;
        for record in document.instances {
            // every heap and site total is bounded by this sum
            total_size = total_size
                .checked_add(record.size)
                .ok_or(GraphError::SizeOverflow(record.id))?;

            let heap = *heap_ids.get(&record.heap).ok_or_else(|| GraphError::UnknownHeap {
                instance: record.id,
                heap: record.heap.clone(),
            })?;

            if let Some(stack) = record.stack {
                if !stacks.contains_key(&stack) {
                    return Err(GraphError::UnknownStack {
                        instance: record.id,
                        stack,
                    });
                }
            }

            if by_id.insert(record.id, instances.len()).is_some() {
                return Err(GraphError::DuplicateInstance(record.id));
            }

            let kind = match record.defines_class {
                Some(name) => {
                    classes.entry(name.clone()).or_insert(record.id);
                    InstanceKind::Class { name }
                }
                None => InstanceKind::Object,
            };

            instances.push(Instance {
                id: record.id,
                size: record.size,
                heap,
                kind,
                class: record.class,
                dominator: record.dominator,
                stack: record.stack,
            });
        }

        for root in &document.roots {
            if !by_id.contains_key(&root.id) {
                return Err(GraphError::UnknownRoot(root.id));
            }
        }

        let mut members = vec![Vec::new(); heaps.len()];
        for (index, inst) in instances.iter().enumerate().filter(|(_, i)| i.is_class()) {
            members[inst.heap.0].push(index);
        }
        for (index, inst) in instances.iter().enumerate().filter(|(_, i)| !i.is_class()) {
            members[inst.heap.0].push(index);
        }

        let graph = Self {
            heaps,
            instances,
            by_id,
            members,
            classes,
            stacks,
            roots: document.roots,
        };
        graph.validate_references()?;
        graph.validate_dominator_forest()?;

        if graph.instances.is_empty() {
            warn!("Heap graph contains no instances");
        }
        info!(
            "Loaded heap graph: {} heaps, {} instances, {} stacks, {} roots",
            graph.heaps.len(),
            graph.instances.len(),
            graph.stacks.len(),
            graph.roots.len()
        );

        Ok(graph)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Check that class and dominator ids resolve
    ///
    /// **Private** - internal validation
    fn validate_references(&self) -> Result<(), GraphError> {
        for inst in &self.instances {
            if let Some(class) = inst.class {
                if !self.by_id.contains_key(&class) {
                    return Err(GraphError::DanglingReference {
                        instance: inst.id,
                        field: "class",
                        target: class,
                    });
                }
            }
            if let Some(dominator) = inst.dominator {
                if !self.by_id.contains_key(&dominator) {
                    return Err(GraphError::DanglingReference {
                        instance: inst.id,
                        field: "dominator",
                        target: dominator,
                    });
                }
            }
        }
        Ok(())
    }

    /// Check that following dominators always terminates
    ///
    /// **Private** - internal validation
    fn validate_dominator_forest(&self) -> Result<(), GraphError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnPath,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.instances.len()];
        let mut path = Vec::new();

        for start in 0..self.instances.len() {
            let mut current = Some(start);
            while let Some(index) = current {
                match marks[index] {
                    Mark::Done => break,
                    Mark::OnPath => {
                        return Err(GraphError::DominatorCycle(self.instances[start].id));
                    }
                    Mark::Unvisited => {
                        marks[index] = Mark::OnPath;
                        path.push(index);
                        current = self.instances[index]
                            .dominator
                            .and_then(|d| self.by_id.get(&d).copied());
                    }
                }
            }
            for index in path.drain(..) {
                marks[index] = Mark::Done;
            }
        }
        Ok(())
    }
}

impl HeapGraph for MemoryGraph {
    fn heaps(&self) -> &[Heap] {
        &self.heaps
    }

    fn heap_instances<'a>(&'a self, heap: HeapId) -> Box<dyn Iterator<Item = &'a Instance> + 'a> {
        match self.members.get(heap.0) {
            Some(indices) => Box::new(indices.iter().map(move |&i| &self.instances[i])),
            None => Box::new(std::iter::empty()),
        }
    }

    fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.by_id.get(&id).map(|&i| &self.instances[i])
    }

    fn find_class(&self, name: &str) -> Option<&Instance> {
        self.classes.get(name).and_then(|&id| self.instance(id))
    }

    fn stack(&self, id: StackId) -> Option<&CallStack> {
        self.stacks.get(&id)
    }

    fn gc_roots(&self) -> &[RootObj] {
        &self.roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classes_listed_before_objects() {
        let graph = MemoryGraph::from_json(&json!({
            "heaps": ["app"],
            "instances": [
                {"id": 1, "size": 8, "heap": "app"},
                {"id": 2, "size": 16, "heap": "app", "defines_class": "Foo"},
                {"id": 3, "size": 8, "heap": "app", "class": 2}
            ]
        }))
        .unwrap();

        let ids: Vec<InstanceId> = graph.heap_instances(HeapId(0)).map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(graph.find_class("Foo").map(|c| c.id), Some(2));
    }

    #[test]
    fn test_size_overflow_rejected() {
        let half = 1u64 << 63;
        let result = MemoryGraph::from_json(&json!({
            "heaps": ["app"],
            "instances": [
                {"id": 1, "size": 0, "heap": "app"},
                {"id": 2, "size": half, "heap": "app", "dominator": 1},
                {"id": 3, "size": half, "heap": "app", "dominator": 1}
            ]
        }));
        assert!(matches!(result, Err(GraphError::SizeOverflow(3))));
    }

    #[test]
    fn test_largest_total_accepted() {
        let graph = MemoryGraph::from_json(&json!({
            "heaps": ["app"],
            "instances": [
                {"id": 1, "size": 0, "heap": "app"},
                {"id": 2, "size": u64::MAX - 1, "heap": "app", "dominator": 1},
                {"id": 3, "size": 1, "heap": "app", "dominator": 1}
            ]
        }))
        .unwrap();
        assert_eq!(graph.instance_count(), 3);
    }

    #[test]
    fn test_unknown_heap_rejected() {
        let result = MemoryGraph::from_json(&json!({
            "heaps": ["app"],
            "instances": [{"id": 1, "size": 8, "heap": "zygote"}]
        }));
        assert!(matches!(result, Err(GraphError::UnknownHeap { instance: 1, .. })));
    }

    #[test]
    fn test_dangling_dominator_rejected() {
        let result = MemoryGraph::from_json(&json!({
            "heaps": ["app"],
            "instances": [{"id": 1, "size": 8, "heap": "app", "dominator": 99}]
        }));
        assert!(matches!(
            result,
            Err(GraphError::DanglingReference { field: "dominator", target: 99, .. })
        ));
    }

    #[test]
    fn test_dominator_cycle_rejected() {
        let result = MemoryGraph::from_json(&json!({
            "heaps": ["app"],
            "instances": [
                {"id": 1, "size": 8, "heap": "app", "dominator": 2},
                {"id": 2, "size": 8, "heap": "app", "dominator": 3},
                {"id": 3, "size": 8, "heap": "app", "dominator": 1}
            ]
        }));
        assert!(matches!(result, Err(GraphError::DominatorCycle(_))));
    }

    #[test]
    fn test_duplicate_instance_rejected() {
        let result = MemoryGraph::from_json(&json!({
            "heaps": ["app"],
            "instances": [
                {"id": 7, "size": 8, "heap": "app"},
                {"id": 7, "size": 8, "heap": "app"}
            ]
        }));
        assert!(matches!(result, Err(GraphError::DuplicateInstance(7))));
    }

    #[test]
    fn test_unknown_stack_rejected() {
        let result = MemoryGraph::from_json(&json!({
            "heaps": ["app"],
            "instances": [{"id": 1, "size": 8, "heap": "app", "stack": 4}]
        }));
        assert!(matches!(result, Err(GraphError::UnknownStack { instance: 1, stack: 4 })));
    }

    #[test]
    fn test_heap_lookup() {
        let graph = MemoryGraph::from_json(&json!({"heaps": ["zygote", "app"]})).unwrap();
        assert_eq!(graph.heap_by_name("app").map(|h| h.id), Some(HeapId(1)));
        assert_eq!(graph.heap_index(HeapId(1)), Some(1));
        assert!(graph.heap_by_name("image").is_none());
        assert_eq!(graph.heap_instances(HeapId(5)).count(), 0);
    }
}
