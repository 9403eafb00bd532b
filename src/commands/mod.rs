//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod inspect;
pub mod models;
pub mod summary;
pub mod utils;

// Re-export main command functions
pub use inspect::{execute_dominated, execute_site};
pub use models::{DominatedArgs, SiteArgs, SummaryArgs};
pub use summary::{execute_summary, load_index, validate_args};
pub use utils::{display_version, validate_report_file};
