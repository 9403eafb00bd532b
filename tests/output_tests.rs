use heapsnap::graph::MemoryGraph;
use heapsnap::output::{read_report, to_report, validate_path, write_report};
use heapsnap::snapshot::SnapshotIndex;
use serde_json::json;
use std::path::Path;
use tempfile::NamedTempFile;

fn create_test_index() -> SnapshotIndex<MemoryGraph> {
    let graph = MemoryGraph::from_json(&json!({
        "heaps": ["zygote", "app"],
        "stacks": [
            {"id": 1, "frames": [{"method": "newArray", "file": "Util.java", "line": 40}, {"method": "main"}]}
        ],
        "instances": [
            {"id": 1, "size": 16, "heap": "zygote"},
            {"id": 2, "size": 100, "heap": "app", "dominator": 1, "stack": 1},
            {"id": 3, "size": 300, "heap": "zygote", "dominator": 1}
        ],
        "roots": [{"id": 1, "kind": "java_frame"}]
    }))
    .unwrap();
    SnapshotIndex::new(graph)
}

#[test]
fn test_write_and_read_report() {
    let report = to_report(&create_test_index(), 5);
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    write_report(&report, path).unwrap();
    let loaded = read_report(path).unwrap();

    assert_eq!(loaded.version, report.version);
    assert_eq!(loaded.total_size, 400);
    assert_eq!(loaded.heaps[0].size, 300);
    assert_eq!(loaded.heaps[1].size, 100);
    assert_eq!(loaded.hot_sites[0].path, "main");
    assert_eq!(loaded.hot_sites[1].path, "main;newArray (Util.java:40)");
    assert_eq!(loaded.hot_sites[1].stack_id, 1);
}

#[test]
fn test_validate_output_path_empty() {
    let result = validate_path(Path::new(""));
    assert!(result.is_err());
}

#[test]
fn test_validate_output_path_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let result = validate_path(temp_dir.path());
    assert!(result.is_err());
}

#[test]
fn test_write_creates_parent_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested_path = temp_dir.path().join("nested/dirs/report.json");

    let report = to_report(&create_test_index(), 5);
    write_report(&report, &nested_path).unwrap();

    assert!(nested_path.exists());
}

#[test]
fn test_read_report_missing_file() {
    assert!(read_report("does/not/exist.json").is_err());
}
