use heapsnap::graph::{HeapId, Instance, InstanceKind, StackFrame};
use heapsnap::sites::{calculate_hot_sites, Depth, SiteId, SiteTree};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn object(id: u64, size: u64, heap: usize) -> Instance {
    Instance {
        id,
        size,
        heap: HeapId(heap),
        kind: InstanceKind::Object,
        class: None,
        dominator: Some(0),
        stack: None,
    }
}

fn path(methods: &[&str]) -> Vec<StackFrame> {
    methods
        .iter()
        .enumerate()
        .map(|(line, m)| StackFrame::new(*m).at("App.java", line as u32 + 1))
        .collect()
}

fn build_tree() -> SiteTree {
    let mut tree = SiteTree::new();
    let stacks = [
        path(&["main", "load", "readFile"]),
        path(&["main", "load", "parse"]),
        path(&["main", "render"]),
        path(&["worker", "run"]),
        path(&["main", "load", "parse", "intern"]),
    ];

    for (i, stack) in stacks.iter().enumerate() {
        for n in 0..3u64 {
            let id = (i as u64) * 10 + n;
            tree.insert(i as u32 + 1, Depth::Full, stack, &object(id, 8 * (n + 1), (i + n as usize) % 2), None);
        }
    }
    tree
}

#[test]
fn test_ancestor_totals_cover_descendants() {
    let tree = build_tree();

    for site in tree.iter() {
        let children_total: u64 = tree.children(site).map(|c| c.total_size()).sum();
        let own_total: u64 = site
            .objects()
            .iter()
            .map(|id| 8 * (id % 10 + 1))
            .sum();
        assert_eq!(site.total_size(), children_total + own_total, "site {}", site.label());

        for heap in [HeapId(0), HeapId(1)] {
            for child in tree.children(site) {
                assert!(site.size(heap) >= child.size(heap));
            }
        }
    }
}

#[test]
fn test_every_object_listed_once() {
    let tree = build_tree();

    let mut seen = HashSet::new();
    for site in tree.iter() {
        for &id in site.objects() {
            assert!(seen.insert(id), "object {} listed twice", id);
        }
    }
    assert_eq!(seen.len(), 15);
    assert_eq!(tree.root().total_count(), 15);
}

#[test]
fn test_no_duplicate_children() {
    let tree = build_tree();

    for site in tree.iter() {
        let frames: Vec<&StackFrame> = tree.children(site).filter_map(|c| c.frame()).collect();
        let unique: HashSet<&StackFrame> = frames.iter().copied().collect();
        assert_eq!(frames.len(), unique.len());

        for child in tree.children(site) {
            assert_eq!(child.parent(), Some(site.id()));
            assert_eq!(child.depth(), site.depth() + 1);
        }
    }
}

#[test]
fn test_truncated_insert_stays_shallow() {
    let mut tree = SiteTree::new();
    let stack = path(&["a", "b", "c", "d"]);

    for depth in 0..=4 {
        let site = tree.insert(9, Depth::Frames(depth), &stack, &object(depth as u64, 1, 0), None);
        assert_eq!(tree.get(site).unwrap().depth(), depth);
    }

    assert_eq!(tree.site_count(), 5);
    assert!(tree.iter().all(|s| s.depth() <= 4));
    assert_eq!(tree.lookup(&stack).objects(), &[4]);
    assert_eq!(tree.lookup(&stack[..2]).total_count(), 3);
}

#[test]
fn test_lookup_empty_path_is_root() {
    let tree = build_tree();
    assert_eq!(tree.lookup(std::iter::empty()).id(), SiteId::ROOT);
}

#[test]
fn test_hot_sites_ranked_by_size() {
    let tree = build_tree();
    let hot = calculate_hot_sites(&tree, 3);

    assert_eq!(hot.len(), 3);
    assert!(hot[0].size >= hot[1].size && hot[1].size >= hot[2].size);
    assert_eq!(hot[0].path, "main (App.java:1)");
    assert_eq!(hot[0].count, 12);
}
