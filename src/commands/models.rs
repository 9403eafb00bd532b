use crate::utils::config::{DEFAULT_TOP_SITES, FULL_DEPTH};
use std::path::PathBuf;

/// Arguments for the summary command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct SummaryArgs {
    /// Path to the JSON graph description
    pub graph: PathBuf,

    /// Number of hot sites to include
    pub top_sites: usize,

    /// Output path for JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Print hot sites to stdout
    pub print_sites: bool,
}

impl Default for SummaryArgs {
    fn default() -> Self {
        Self {
            graph: PathBuf::from("graph.json"),
            top_sites: DEFAULT_TOP_SITES,
            output_json: None,
            print_sites: true,
        }
    }
}

/// Arguments for the site command
#[derive(Debug, Clone)]
pub struct SiteArgs {
    pub graph: PathBuf,

    /// Allocation stack serial number
    pub stack_id: u32,

    /// Frames to follow; negative means the whole stack
    pub depth: i32,
}

impl Default for SiteArgs {
    fn default() -> Self {
        Self {
            graph: PathBuf::from("graph.json"),
            stack_id: 0,
            depth: FULL_DEPTH,
        }
    }
}

/// Arguments for the dominated command
#[derive(Debug, Clone)]
pub struct DominatedArgs {
    pub graph: PathBuf,

    /// Instance whose dominated objects are listed
    pub instance: u64,
}
