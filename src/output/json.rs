//! JSON report output writer.
//!
//! Builds SnapshotReport structs from an index and writes them to JSON files.

use super::schema::SnapshotReport;
use crate::graph::HeapGraph;
use crate::sites::{calculate_heap_distribution, calculate_hot_sites};
use crate::snapshot::SnapshotIndex;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Convert an indexed snapshot to the report format
///
/// **Public** - used by commands to create final output
pub fn to_report<G: HeapGraph>(index: &SnapshotIndex<G>, top_sites: usize) -> SnapshotReport {
    let distribution = calculate_heap_distribution(index);

    SnapshotReport {
        version: SCHEMA_VERSION.to_string(),
        total_size: distribution.total,
        heaps: distribution.heaps,
        gc_root_count: index.gc_roots().len(),
        site_count: index.sites().site_count(),
        hot_sites: calculate_hot_sites(index.sites(), top_sites),
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &SnapshotReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
            })?;
        }
    }

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;

    info!(
        "Report written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a report to a pretty JSON string
pub fn report_to_string(report: &SnapshotReport) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Validate that output path is writable
///
/// **Public** - also used by argument validation
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a report from a JSON file
///
/// **Public** - useful for validation and testing
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<SnapshotReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path)?;
    let report: SnapshotReport = serde_json::from_reader(file)?;

    debug!(
        "Report loaded: version {}, {} heaps, {} hot sites",
        report.version,
        report.heaps.len(),
        report.hot_sites.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryGraph;
    use serde_json::json;
    use tempfile::NamedTempFile;

    fn create_test_index() -> SnapshotIndex<MemoryGraph> {
        let graph = MemoryGraph::from_json(&json!({
            "heaps": ["app"],
            "stacks": [{"id": 3, "frames": [{"method": "alloc"}]}],
            "instances": [
                {"id": 1, "size": 4, "heap": "app"},
                {"id": 2, "size": 40, "heap": "app", "dominator": 1, "stack": 3}
            ],
            "roots": [{"id": 1, "kind": "jni_global"}]
        }))
        .unwrap();
        SnapshotIndex::new(graph)
    }

    #[test]
    fn test_to_report() {
        let report = to_report(&create_test_index(), 10);

        assert_eq!(report.version, SCHEMA_VERSION);
        assert_eq!(report.total_size, 40);
        assert_eq!(report.gc_root_count, 1);
        assert_eq!(report.site_count, 2);
        assert_eq!(report.hot_sites.len(), 1);
        assert_eq!(report.hot_sites[0].path, "alloc");
    }

    #[test]
    fn test_write_and_read_report() {
        let report = to_report(&create_test_index(), 10);
        let temp_file = NamedTempFile::new().unwrap();

        write_report(&report, temp_file.path()).unwrap();
        let loaded = read_report(temp_file.path()).unwrap();

        assert_eq!(loaded.version, report.version);
        assert_eq!(loaded.heaps, report.heaps);
        assert_eq!(loaded.hot_sites, report.hot_sites);
    }

    #[test]
    fn test_written_file_is_complete() {
        let report = to_report(&create_test_index(), 10);
        let temp_file = NamedTempFile::new().unwrap();

        write_report(&report, temp_file.path()).unwrap();

        // every buffered byte reaches disk before write_report returns
        let written = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(written, report_to_string(&report).unwrap());
    }

    #[test]
    fn test_validate_path_empty() {
        assert!(validate_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_report_to_string() {
        let report = to_report(&create_test_index(), 10);
        let text = report_to_string(&report).unwrap();
        assert!(text.contains("\"hot_sites\""));
    }
}
