//! heapsnap CLI
//!
//! Indexes a heap graph with precomputed dominators and reports reachable
//! sizes, allocation sites and dominator-tree children.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use heapsnap::commands::{
    display_version, execute_dominated, execute_site, execute_summary, validate_args,
    validate_report_file, DominatedArgs, SiteArgs, SummaryArgs,
};
use heapsnap::utils::config::{DEFAULT_TOP_SITES, FULL_DEPTH};

/// heapsnap - heap snapshot analysis
#[derive(Parser, Debug)]
#[command(name = "heapsnap")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize reachable sizes and the largest allocation sites
    Summary {
        /// JSON graph description
        #[arg(short, long, env = "HEAPSNAP_GRAPH")]
        graph: PathBuf,

        /// Number of top allocation sites to include
        #[arg(long, default_value_t = DEFAULT_TOP_SITES)]
        top: usize,

        /// Output path for JSON report (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not print allocation sites
        #[arg(long)]
        no_sites: bool,
    },

    /// Show the allocation site reached by a stack
    Site {
        /// JSON graph description
        #[arg(short, long, env = "HEAPSNAP_GRAPH")]
        graph: PathBuf,

        /// Stack serial number
        #[arg(short, long)]
        stack: u32,

        /// Frames to follow from the outermost caller (-1 = whole stack)
        #[arg(short, long, default_value_t = FULL_DEPTH, allow_negative_numbers = true)]
        depth: i32,
    },

    /// List the objects an instance immediately dominates
    Dominated {
        /// JSON graph description
        #[arg(short, long, env = "HEAPSNAP_GRAPH")]
        graph: PathBuf,

        /// Instance id (decimal or 0x-prefixed hex)
        #[arg(short, long, value_parser = parse_instance_id)]
        id: u64,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Summary {
            graph,
            top,
            output,
            no_sites,
        } => {
            let args = SummaryArgs {
                graph,
                top_sites: top,
                output_json: output,
                print_sites: !no_sites,
            };

            validate_args(&args)?;
            execute_summary(args)?;
        }

        Commands::Site {
            graph,
            stack,
            depth,
        } => {
            execute_site(SiteArgs {
                graph,
                stack_id: stack,
                depth,
            })?;
        }

        Commands::Dominated { graph, id } => {
            execute_dominated(DominatedArgs { graph, instance: id })?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Parse an instance id given in decimal or hex
///
/// **Private** - clap value parser
fn parse_instance_id(value: &str) -> Result<u64, String> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    }
    .map_err(|e| format!("Invalid instance id '{}': {}", value, e))
}
