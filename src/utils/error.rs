//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Queries on a built snapshot never fail: missing data is reported through
//! defaults. Errors only come from loading a graph or writing output.

use thiserror::Error;

/// Errors that can occur while loading or validating a heap graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read graph: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate heap name: {0}")]
    DuplicateHeap(String),

    #[error("Duplicate instance id: {0:#x}")]
    DuplicateInstance(u64),

    #[error("Duplicate stack id: {0}")]
    DuplicateStack(u32),

    #[error("Instance {instance:#x} refers to unknown heap {heap}")]
    UnknownHeap { instance: u64, heap: String },

    #[error("Instance {instance:#x} has {field} {target:#x} which is not in the graph")]
    DanglingReference {
        instance: u64,
        field: &'static str,
        target: u64,
    },

    #[error("Instance {instance:#x} refers to unknown stack {stack}")]
    UnknownStack { instance: u64, stack: u32 },

    #[error("GC root refers to unknown instance {0:#x}")]
    UnknownRoot(u64),

    #[error("Dominator chain starting at {0:#x} contains a cycle")]
    DominatorCycle(u64),

    #[error("Instance sizes overflow a 64-bit total at instance {0:#x}")]
    SizeOverflow(u64),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
