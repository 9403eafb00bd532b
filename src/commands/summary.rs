//! Summary command implementation.
//!
//! The summary command:
//! 1. Loads and validates the heap graph
//! 2. Builds the snapshot index
//! 3. Calculates heap distribution and hot sites
//! 4. Writes the JSON report (if requested)

use super::models::SummaryArgs;
use crate::graph::MemoryGraph;
use crate::output::{to_report, validate_path, write_report};
use crate::sites::calculate_heap_distribution;
use crate::snapshot::SnapshotIndex;
use crate::utils::config::MAX_TOP_SITES;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

/// Load a graph file and index it
///
/// **Public** - shared by every command that inspects a graph
pub fn load_index(path: &Path) -> Result<SnapshotIndex<MemoryGraph>> {
    let start_time = Instant::now();

    let graph = MemoryGraph::load(path)
        .with_context(|| format!("Failed to load heap graph from {}", path.display()))?;
    let index = SnapshotIndex::new(graph);

    debug!("Indexed graph in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(index)
}

/// Execute the summary command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Graph file missing or malformed
/// * Report write errors
pub fn execute_summary(args: SummaryArgs) -> Result<()> {
    info!("Step 1/3: Loading heap graph: {}", args.graph.display());
    let index = load_index(&args.graph)?;

    info!("Step 2/3: Calculating heap distribution...");
    let distribution = calculate_heap_distribution(&index);
    info!("Heap distribution: {}", distribution.summary());

    let report = to_report(&index, args.top_sites);

    if let Some(output) = &args.output_json {
        info!("Step 3/3: Writing report...");
        write_report(&report, output).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", output.display());
    } else {
        info!("Step 3/3: Skipping report (not requested)");
    }

    println!("\n{}", "=".repeat(80));
    println!("SNAPSHOT SUMMARY");
    println!("{}", "=".repeat(80));
    for heap in &report.heaps {
        println!("{:<16} {:>14} bytes  {:>5.1}%", heap.name, heap.size, heap.percentage);
    }
    println!("{:<16} {:>14} bytes", "total", report.total_size);
    println!("GC roots: {}   Allocation sites: {}", report.gc_root_count, report.site_count);

    if args.print_sites && !report.hot_sites.is_empty() {
        println!("\nTop {} allocation sites:", report.hot_sites.len());
        for (i, site) in report.hot_sites.iter().enumerate() {
            println!(
                "{:>3}. {:>12} bytes {:>5.1}% {:>8} objs  {}",
                i + 1,
                site.size,
                site.percentage,
                site.count,
                site.path
            );
        }
    }
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Validate summary arguments
///
/// **Public** - can be called before execute_summary for early validation
pub fn validate_args(args: &SummaryArgs) -> Result<()> {
    if args.graph.as_os_str().is_empty() {
        anyhow::bail!("Graph path cannot be empty");
    }

    if !args.graph.is_file() {
        anyhow::bail!("Graph file not found: {}", args.graph.display());
    }

    if args.top_sites == 0 {
        anyhow::bail!("top_sites must be greater than 0");
    }

    if args.top_sites > MAX_TOP_SITES {
        anyhow::bail!("top_sites is too large (max {})", MAX_TOP_SITES);
    }

    if let Some(output) = &args.output_json {
        validate_path(output).context("Invalid report path")?;
    }

    Ok(())
}
