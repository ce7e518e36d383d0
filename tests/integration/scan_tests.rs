use dupefinder::duplicates::{find_duplicates, DuplicateGrouper, FinderConfig};
use dupefinder::scanner::{FileEntry, IoOp, Walker, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn walk(root: &Path, recursive: bool) -> Vec<FileEntry> {
    let config = WalkerConfig {
        recursive,
        ..Default::default()
    };
    Walker::new(root, config).walk().collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let result = find_duplicates(walk(dir.path(), true), None);

    assert!(result.groups.is_empty());
    assert!(result.errors.is_empty());
    assert_eq!(result.stats.grouping.total_files, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"content a");
    write(&dir.path().join("b.txt"), b"content b");
    write(&dir.path().join("c.txt"), b"content c");

    let result = find_duplicates(walk(dir.path(), false), None);

    assert!(result.groups.is_empty());
    assert_eq!(result.stats.grouping.total_files, 3);
}

#[test]
fn test_hello_hello_world() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"hello");
    write(&dir.path().join("b.txt"), b"hello");
    write(&dir.path().join("c.txt"), b"world");

    let result = find_duplicates(walk(dir.path(), false), None);

    assert_eq!(result.groups.len(), 1);
    let group = result.groups.values().next().unwrap();
    assert_eq!(group.original.file_name().unwrap(), "a.txt");
    assert_eq!(group.duplicates.len(), 1);
    assert_eq!(group.duplicates[0].file_name().unwrap(), "b.txt");
    assert!(!group.contains(&dir.path().join("c.txt")));
}

#[test]
fn test_scan_nested_directories_only_when_recursive() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    fs::create_dir(&sub).unwrap();
    write(&dir.path().join("a.txt"), b"nested duplicate");
    write(&sub.join("b.txt"), b"nested duplicate");

    let flat = find_duplicates(walk(dir.path(), false), None);
    assert!(flat.groups.is_empty());
    assert_eq!(flat.stats.grouping.total_files, 1);

    let deep = find_duplicates(walk(dir.path(), true), None);
    assert_eq!(deep.groups.len(), 1);
    let group = deep.groups.values().next().unwrap();
    assert!(group.contains(&sub.join("b.txt")));
}

#[test]
fn test_vanished_file_among_duplicates() {
    let dir = tempdir().unwrap();
    for name in ["a.txt", "b.txt", "c.txt", "d.txt"] {
        write(&dir.path().join(name), b"same bytes");
    }
    let entries = walk(dir.path(), false);

    // Removed after enumeration, so hashing it fails
    let gone = dir.path().join("b.txt");
    fs::remove_file(&gone).unwrap();

    let result = find_duplicates(entries, None);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, gone);
    let err = result.errors[0].error.as_ref().unwrap();
    assert_eq!(err.op, IoOp::Open);
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);

    assert_eq!(result.groups.len(), 1);
    let group = result.groups.values().next().unwrap();
    assert_eq!(group.len(), 3);
    assert!(!group.contains(&gone));
    assert_eq!(group.original, dir.path().join("a.txt"));
}

#[test]
fn test_large_duplicates_with_shared_prefix() {
    let dir = tempdir().unwrap();
    let mut base = vec![0x5au8; 200_000];
    write(&dir.path().join("one.bin"), &base);
    write(&dir.path().join("two.bin"), &base);
    base[150_000] = 0;
    write(&dir.path().join("three.bin"), &base);

    let result = find_duplicates(walk(dir.path(), false), None);

    assert_eq!(result.groups.len(), 1);
    let (key, group) = result.groups.iter().next().unwrap();
    assert_eq!(key.size, 200_000);
    assert_eq!(group.original, dir.path().join("one.bin"));
    assert_eq!(group.duplicates, vec![dir.path().join("two.bin")]);
    assert_eq!(result.stats.full_digests, 3);
}

#[test]
fn test_multiple_groups_in_key_order() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("big1"), &[1u8; 5000]);
    write(&dir.path().join("big2"), &[1u8; 5000]);
    write(&dir.path().join("small1"), b"xy");
    write(&dir.path().join("small2"), b"xy");

    let result = find_duplicates(walk(dir.path(), false), None);

    let sizes: Vec<u64> = result.groups.keys().map(|k| k.size).collect();
    assert_eq!(sizes, vec![2, 5000]);
    assert_eq!(result.reclaimable_space(), 5002);
}

#[test]
fn test_rescan_is_identical() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        let content = format!("content {}", i % 4);
        write(&dir.path().join(format!("f{:02}.txt", i)), content.as_bytes());
    }

    let grouper = DuplicateGrouper::new(FinderConfig::default().with_io_threads(3));
    let first = grouper.find_duplicates(walk(dir.path(), false), None);
    let second = grouper.find_duplicates(walk(dir.path(), false), None);

    assert_eq!(first.groups, second.groups);
    assert_eq!(first.groups.len(), 4);
}

#[test]
fn test_engine_never_modifies_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"keep me");
    write(&dir.path().join("b"), b"keep me");

    let result = find_duplicates(walk(dir.path(), false), None);

    assert_eq!(result.groups.len(), 1);
    assert_eq!(fs::read(dir.path().join("a")).unwrap(), b"keep me");
    assert_eq!(fs::read(dir.path().join("b")).unwrap(), b"keep me");
}
