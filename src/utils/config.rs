//! Configuration and constants for the snapshot engine and CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Name of the class every class object is an instance of.
/// Class objects missing a class are labelled with it during indexing.
pub const ROOT_CLASS_NAME: &str = "java.lang.Class";

/// Display name used when an instance has no known class
pub const UNKNOWN_CLASS_NAME: &str = "(class unknown)";

/// Label of the allocation-site tree root
pub const ROOT_SITE_LABEL: &str = "ROOT";

/// Raw depth sentinel meaning "use the whole stack"
pub const FULL_DEPTH: i32 = -1;

// Limits for the summary command
pub const DEFAULT_TOP_SITES: usize = 20;
pub const MAX_TOP_SITES: usize = 1000;
