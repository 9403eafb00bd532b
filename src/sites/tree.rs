//! Allocation-site tree.
//!
//! A prefix tree over call-stack frames, outermost caller at the top.
//! Every node keeps cumulative per-heap totals for all objects allocated at
//! or below it, while the objects themselves are only listed at the exact
//! site they were allocated at.
//!
//! Nodes live in a flat arena and refer to each other by [`SiteId`].

use crate::graph::{HeapId, Instance, InstanceId, StackFrame, StackId};
use crate::utils::config::ROOT_SITE_LABEL;
use std::collections::BTreeMap;

/// Index of a site in its [`SiteTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId(usize);

impl SiteId {
    pub const ROOT: SiteId = SiteId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// How many frames of a stack to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// The whole stack
    Full,

    /// At most this many frames from the outermost caller
    Frames(usize),
}

impl Depth {
    pub(crate) fn limit(self) -> usize {
        match self {
            Depth::Full => usize::MAX,
            Depth::Frames(n) => n,
        }
    }
}

/// Any negative raw depth means the full stack
impl From<i32> for Depth {
    fn from(raw: i32) -> Self {
        usize::try_from(raw).map_or(Depth::Full, Depth::Frames)
    }
}

/// Instance count and bytes for one (heap, class) pair under a site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectsInfo {
    pub heap: HeapId,
    pub class: Option<InstanceId>,
    pub count: u64,
    pub bytes: u64,
}

/// A node of the allocation-site tree
#[derive(Debug, Clone)]
pub struct Site {
    id: SiteId,
    parent: Option<SiteId>,
    frame: Option<StackFrame>,

    /// Stack and depth of the insertion that created this site
    stack_id: StackId,
    depth: usize,

    children: BTreeMap<StackFrame, SiteId>,
    sizes: BTreeMap<HeapId, u64>,
    counts: BTreeMap<HeapId, u64>,
    objects: Vec<InstanceId>,
    objects_infos: Vec<ObjectsInfo>,
}

impl Site {
    fn new(id: SiteId, parent: Option<SiteId>, frame: Option<StackFrame>, stack_id: StackId, depth: usize) -> Self {
        Self {
            id,
            parent,
            frame,
            stack_id,
            depth,
            children: BTreeMap::new(),
            sizes: BTreeMap::new(),
            counts: BTreeMap::new(),
            objects: Vec::new(),
            objects_infos: Vec::new(),
        }
    }

    pub fn id(&self) -> SiteId {
        self.id
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn parent(&self) -> Option<SiteId> {
        self.parent
    }

    /// Frame this site represents; `None` at the root
    pub fn frame(&self) -> Option<&StackFrame> {
        self.frame.as_ref()
    }

    pub fn label(&self) -> String {
        match &self.frame {
            Some(frame) => frame.to_string(),
            None => ROOT_SITE_LABEL.to_string(),
        }
    }

    pub fn stack_id(&self) -> StackId {
        self.stack_id
    }

    /// Number of frames between the root and this site
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn child(&self, frame: &StackFrame) -> Option<SiteId> {
        self.children.get(frame).copied()
    }

    pub fn children(&self) -> impl Iterator<Item = SiteId> + '_ {
        self.children.values().copied()
    }

    /// Bytes allocated on `heap` at or below this site
    pub fn size(&self, heap: HeapId) -> u64 {
        self.sizes.get(&heap).copied().unwrap_or(0)
    }

    /// Objects allocated on `heap` at or below this site
    pub fn count(&self, heap: HeapId) -> u64 {
        self.counts.get(&heap).copied().unwrap_or(0)
    }

    pub fn total_size(&self) -> u64 {
        self.sizes.values().fold(0, |acc, s| acc.saturating_add(*s))
    }

    pub fn total_count(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Per-heap byte totals, for heaps with at least one object
    pub fn sizes(&self) -> impl Iterator<Item = (HeapId, u64)> + '_ {
        self.sizes.iter().map(|(&heap, &bytes)| (heap, bytes))
    }

    /// Objects allocated exactly here, not below
    pub fn objects(&self) -> &[InstanceId] {
        &self.objects
    }

    /// Breakdown by heap and class of everything at or below this site
    pub fn objects_infos(&self) -> &[ObjectsInfo] {
        &self.objects_infos
    }

    fn record(&mut self, heap: HeapId, class: Option<InstanceId>, size: u64) {
        let bytes = self.sizes.entry(heap).or_insert(0);
        *bytes = bytes.saturating_add(size);
        *self.counts.entry(heap).or_insert(0) += 1;

        match self
            .objects_infos
            .iter_mut()
            .find(|info| info.heap == heap && info.class == class)
        {
            Some(info) => {
                info.count += 1;
                info.bytes = info.bytes.saturating_add(size);
            }
            None => self.objects_infos.push(ObjectsInfo {
                heap,
                class,
                count: 1,
                bytes: size,
            }),
        }
    }
}

/// Arena of sites rooted at [`SiteId::ROOT`]
#[derive(Debug, Clone)]
pub struct SiteTree {
    sites: Vec<Site>,
}

impl SiteTree {
    pub fn new() -> Self {
        Self {
            sites: vec![Site::new(SiteId::ROOT, None, None, 0, 0)],
        }
    }

    pub fn root(&self) -> &Site {
        &self.sites[SiteId::ROOT.0]
    }

    pub fn get(&self, id: SiteId) -> Option<&Site> {
        self.sites.get(id.0)
    }

    /// Number of sites, root included
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// All sites in creation order; parents always come before children
    pub fn iter(&self) -> impl Iterator<Item = &Site> {
        self.sites.iter()
    }

    pub fn children<'a>(&'a self, site: &'a Site) -> impl Iterator<Item = &'a Site> + 'a {
        site.children().map(move |id| &self.sites[id.0])
    }

    /// Record `instance` along `path` (outermost frame first)
    ///
    /// **Public** - called once per reachable instance while indexing
    ///
    /// # Arguments
    /// * `stack_id` - Stack the path was taken from, remembered by new sites
    /// * `max_depth` - How many frames of `path` to follow
    /// * `path` - Frames from the outermost caller to the allocating frame
    /// * `instance` - Object being recorded
    /// * `class` - Class to attribute the object to in the breakdown
    ///
    /// # Returns
    /// The deepest site reached, which now lists `instance` as an object
    pub fn insert<'a>(
        &mut self,
        stack_id: StackId,
        max_depth: Depth,
        path: impl IntoIterator<Item = &'a StackFrame>,
        instance: &Instance,
        class: Option<InstanceId>,
    ) -> SiteId {
        let mut current = SiteId::ROOT;
        self.sites[current.0].record(instance.heap, class, instance.size);

        for frame in path.into_iter().take(max_depth.limit()) {
            current = match self.sites[current.0].child(frame) {
                Some(child) => child,
                None => self.add_child(current, frame, stack_id),
            };
            self.sites[current.0].record(instance.heap, class, instance.size);
        }

        self.sites[current.0].objects.push(instance.id);
        current
    }

    fn add_child(&mut self, parent: SiteId, frame: &StackFrame, stack_id: StackId) -> SiteId {
        let id = SiteId(self.sites.len());
        let depth = self.sites[parent.0].depth + 1;
        self.sites
            .push(Site::new(id, Some(parent), Some(frame.clone()), stack_id, depth));
        self.sites[parent.0].children.insert(frame.clone(), id);
        id
    }

    /// Follow `path` (outermost frame first) from the root.
    ///
    /// Stops at the first frame with no matching child and returns the
    /// deepest site reached, so an empty or unknown path yields the root.
    pub fn lookup<'a>(&self, path: impl IntoIterator<Item = &'a StackFrame>) -> &Site {
        let mut site = self.root();
        for frame in path {
            match site.child(frame) {
                Some(child) => site = &self.sites[child.0],
                None => break,
            }
        }
        site
    }

    /// Frames from the root down to `site`
    pub fn path_of<'a>(&'a self, site: &'a Site) -> Vec<&'a StackFrame> {
        let mut frames = Vec::with_capacity(site.depth);
        let mut current = Some(site);
        while let Some(node) = current {
            if let Some(frame) = node.frame() {
                frames.push(frame);
            }
            current = node.parent.map(|p| &self.sites[p.0]);
        }
        frames.reverse();
        frames
    }
}

impl Default for SiteTree {
    fn default() -> Self {
        Self::new()
    }
}
