//! Inverse of the immediate-dominator relation.

use crate::graph::InstanceId;
use std::collections::HashMap;

/// Map from an instance to the instances it immediately dominates
#[derive(Debug, Clone, Default)]
pub struct DominatedIndex {
    children: HashMap<InstanceId, Vec<InstanceId>>,
}

impl DominatedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `dominated` to the list of `dominator`
    pub fn record(&mut self, dominator: InstanceId, dominated: InstanceId) {
        self.children.entry(dominator).or_default().push(dominated);
    }

    /// Instances immediately dominated by `instance`, in insertion order.
    /// Empty when it dominates nothing.
    pub fn children_of(&self, instance: InstanceId) -> &[InstanceId] {
        self.children.get(&instance).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of instances that dominate at least one other
    pub fn dominator_count(&self) -> usize {
        self.children.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_in_insertion_order() {
        let mut index = DominatedIndex::new();
        index.record(1, 3);
        index.record(1, 2);
        index.record(2, 4);

        assert_eq!(index.children_of(1), &[3, 2]);
        assert_eq!(index.children_of(2), &[4]);
        assert_eq!(index.dominator_count(), 2);
    }

    #[test]
    fn test_no_entry_for_leaf() {
        let mut index = DominatedIndex::new();
        index.record(1, 2);

        assert!(index.children_of(2).is_empty());
        assert!(index.children_of(42).is_empty());
        assert_eq!(index.dominator_count(), 1);
    }
}
