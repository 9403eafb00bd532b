//! Drill-down commands: a single allocation site, or the objects an
//! instance immediately dominates.

use super::models::{DominatedArgs, SiteArgs};
use super::summary::load_index;
use crate::graph::{HeapGraph, InstanceId};
use crate::sites::Depth;
use crate::snapshot::{display_name_of, SnapshotIndex};
use anyhow::Result;
use log::{info, warn};

/// Execute the site command
///
/// Unknown stacks fall back to the root site rather than failing.
pub fn execute_site(args: SiteArgs) -> Result<()> {
    let index = load_index(&args.graph)?;

    if index.graph().stack(args.stack_id).is_none() {
        warn!("Stack {} not found, showing root site", args.stack_id);
    }

    let site = index.site(args.stack_id, Depth::from(args.depth));
    let tree = index.sites();
    info!("Site depth {} created by stack {}", site.depth(), site.stack_id());

    println!("Site: {}", site.label());
    for (depth, frame) in tree.path_of(site).iter().enumerate() {
        println!("  {:>3}: {}", depth + 1, frame);
    }

    for heap in index.heaps() {
        let size = site.size(heap.id);
        if size > 0 {
            println!("{:<16} {:>12} bytes {:>8} objs", heap.name, size, site.count(heap.id));
        }
    }

    if !site.objects_infos().is_empty() {
        println!("\nBy class:");
        for info in site.objects_infos() {
            let class = info.class.and_then(|id| index.find_instance(id));
            let heap = index
                .heaps()
                .get(info.heap.0)
                .map_or("?", |h| h.name.as_str());
            println!(
                "  {:<40} {:<12} {:>8} objs {:>12} bytes",
                display_name_of(class),
                heap,
                info.count,
                info.bytes
            );
        }
    }

    let children: Vec<_> = tree.children(site).collect();
    if !children.is_empty() {
        println!("\nCallees:");
        for child in children {
            println!("  {:>12} bytes  {}", child.total_size(), child.label());
        }
    }

    println!("\nObjects allocated here: {}", site.objects().len());
    Ok(())
}

/// Execute the dominated command
pub fn execute_dominated(args: DominatedArgs) -> Result<()> {
    let index = load_index(&args.graph)?;

    let Some(inst) = index.find_instance(args.instance) else {
        anyhow::bail!("Instance {:#x} not found", args.instance);
    };

    println!(
        "{} {:#x} ({} bytes)",
        index.class_name_of(inst),
        inst.id,
        inst.size
    );

    let dominated = index.dominated_by(args.instance);
    if dominated.is_empty() {
        println!("Dominates no objects");
        return Ok(());
    }

    println!("Immediately dominates {} objects:", dominated.len());
    for &id in dominated {
        print_instance(&index, id);
    }

    Ok(())
}

fn print_instance<G: HeapGraph>(index: &SnapshotIndex<G>, id: InstanceId) {
    if let Some(inst) = index.find_instance(id) {
        println!(
            "  {:#010x} {:>10} bytes  {}",
            inst.id,
            inst.size,
            index.class_name_of(inst)
        );
    }
}
