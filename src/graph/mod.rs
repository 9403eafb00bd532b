//! Heap graph adapter.
//!
//! This module handles:
//! - The read-only interface the snapshot engine consumes ([`HeapGraph`])
//! - Object graph types (instances, heaps, stacks, GC roots)
//! - An in-memory graph loaded from a JSON description ([`MemoryGraph`])
//!
//! Dominators are expected to be computed already; the adapter only
//! reports them.

pub mod memory;
pub mod schema;

// Re-export main types
pub use memory::{GraphDocument, MemoryGraph};
pub use schema::{
    CallStack, Heap, HeapId, Instance, InstanceId, InstanceKind, RootKind, RootObj, StackFrame,
    StackId,
};

/// Read-only view of a finalized object graph
pub trait HeapGraph {
    /// All heaps, in index order
    fn heaps(&self) -> &[Heap];

    /// Instances allocated on `heap`: class objects first, then the rest
    fn heap_instances<'a>(&'a self, heap: HeapId) -> Box<dyn Iterator<Item = &'a Instance> + 'a>;

    fn instance(&self, id: InstanceId) -> Option<&Instance>;

    /// Class object registered under `name`
    fn find_class(&self, name: &str) -> Option<&Instance>;

    fn stack(&self, id: StackId) -> Option<&CallStack>;

    fn gc_roots(&self) -> &[RootObj];

    fn heap_index(&self, heap: HeapId) -> Option<usize> {
        self.heaps().iter().position(|h| h.id == heap)
    }

    fn heap_by_name(&self, name: &str) -> Option<&Heap> {
        self.heaps().iter().find(|h| h.name == name)
    }
}
