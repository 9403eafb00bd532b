//! Object graph types shared by the adapter and the snapshot engine.
//!
//! Instances never point at each other directly: dominators, classes and
//! stacks are referenced by id and resolved through a [`HeapGraph`](super::HeapGraph).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of an instance (object address in the dump)
pub type InstanceId = u64;

/// Serial number of an allocation call stack
pub type StackId = u32;

/// Position of a heap in the graph's heap list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeapId(pub usize);

/// A named partition of the object graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heap {
    pub id: HeapId,
    pub name: String,
}

/// What an instance is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceKind {
    /// Regular object or array
    Object,

    /// The class object of the named class
    Class { name: String },
}

/// An allocated object in the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: InstanceId,

    /// Shallow size in bytes
    pub size: u64,

    /// Heap the instance was allocated on
    pub heap: HeapId,

    pub kind: InstanceKind,

    /// Class object this instance is an instance of, if known
    pub class: Option<InstanceId>,

    /// Immediate dominator; `None` for root-level objects
    pub dominator: Option<InstanceId>,

    /// Allocation stack, if recorded
    pub stack: Option<StackId>,
}

impl Instance {
    pub fn is_class(&self) -> bool {
        matches!(self.kind, InstanceKind::Class { .. })
    }

    /// Name of the class this instance defines, for class objects only
    pub fn class_name(&self) -> Option<&str> {
        match &self.kind {
            InstanceKind::Class { name } => Some(name.as_str()),
            InstanceKind::Object => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.dominator.is_some()
    }
}

/// One frame of an allocation call stack.
///
/// The frame value itself is the key used by the allocation-site tree,
/// so two frames with the same method, signature, file and line are the
/// same site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StackFrame {
    pub method: String,

    #[serde(default)]
    pub signature: String,

    #[serde(default)]
    pub file: String,

    #[serde(default)]
    pub line: Option<u32>,
}

impl StackFrame {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            signature: String::new(),
            file: String::new(),
            line: None,
        }
    }

    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = file.into();
        self.line = Some(line);
        self
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.method, self.signature)?;
        match (self.file.is_empty(), self.line) {
            (true, _) => Ok(()),
            (false, Some(line)) => write!(f, " ({}:{})", self.file, line),
            (false, None) => write!(f, " ({})", self.file),
        }
    }
}

/// An allocation call stack, innermost frame first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStack {
    pub id: StackId,
    pub frames: Vec<StackFrame>,
}

impl CallStack {
    /// Frames from the outermost caller down to the allocating frame
    pub fn root_to_leaf(&self) -> impl Iterator<Item = &StackFrame> {
        self.frames.iter().rev()
    }
}

/// Why an instance is a GC root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootKind {
    JniGlobal,
    JniLocal,
    JavaFrame,
    NativeStack,
    StickyClass,
    ThreadBlock,
    MonitorUsed,
    ThreadObject,
    InternedString,
    VmInternal,
    #[serde(other)]
    Unknown,
}

/// A GC root entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootObj {
    /// The rooted instance
    pub id: InstanceId,

    #[serde(default = "default_root_kind")]
    pub kind: RootKind,
}

fn default_root_kind() -> RootKind {
    RootKind::Unknown
}
