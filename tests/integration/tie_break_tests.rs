use dupefinder::duplicates::{find_duplicates, DuplicateGrouper, FinderConfig, TieBreakPolicy};
use dupefinder::scanner::{Digest, Digester, FileEntry, IoError, IoOp};
use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_with_mtime(dir: &Path, name: &str, content: &[u8], mtime: i64) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(mtime, 0)).unwrap();
    path
}

fn entry(path: &Path) -> FileEntry {
    FileEntry::new(path.to_path_buf(), fs::metadata(path).unwrap().len())
}

#[test]
fn test_by_last_modified_keeps_oldest() {
    let dir = tempdir().unwrap();
    let new = write_with_mtime(dir.path(), "new.txt", b"x", 1_700_000_000);
    let old = write_with_mtime(dir.path(), "old.txt", b"x", 1_500_000_000);

    // new.txt is enumerated first
    let result = find_duplicates(
        vec![entry(&new), entry(&old)],
        Some(TieBreakPolicy::ByLastModified),
    );

    let group = result.groups.values().next().unwrap();
    assert_eq!(group.original, old);
    assert_eq!(group.duplicates, vec![new]);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_without_policy_first_found_wins() {
    let dir = tempdir().unwrap();
    let new = write_with_mtime(dir.path(), "new.txt", b"x", 1_700_000_000);
    let old = write_with_mtime(dir.path(), "old.txt", b"x", 1_500_000_000);

    let result = find_duplicates(vec![entry(&new), entry(&old)], None);

    let group = result.groups.values().next().unwrap();
    assert_eq!(group.original, new);
}

#[test]
fn test_by_name_original_is_smallest_member() {
    let dir = tempdir().unwrap();
    let names = ["m.txt", "z.txt", "b.txt", "q.txt"];
    let paths: Vec<PathBuf> = names
        .iter()
        .map(|n| write_with_mtime(dir.path(), n, b"same", 1_000))
        .collect();

    let result = find_duplicates(
        paths.iter().map(|p| entry(p)),
        Some(TieBreakPolicy::ByName),
    );

    let group = result.groups.values().next().unwrap();
    assert_eq!(group.original, dir.path().join("b.txt"));
    // Remaining members keep enumeration order
    assert_eq!(
        group.duplicates,
        vec![
            dir.path().join("m.txt"),
            dir.path().join("z.txt"),
            dir.path().join("q.txt"),
        ]
    );
    assert!(group.members().all(|p| group.original <= *p));
}

#[test]
fn test_global_minimum_regardless_of_arrival() {
    // Incremental swapping would visit b, c, a; the result must not depend on it
    let dir = tempdir().unwrap();
    let b = write_with_mtime(dir.path(), "b", b"dup", 3_000);
    let c = write_with_mtime(dir.path(), "c", b"dup", 2_000);
    let a = write_with_mtime(dir.path(), "a", b"dup", 1_000);

    let by_name = find_duplicates(
        vec![entry(&b), entry(&c), entry(&a)],
        Some(TieBreakPolicy::ByName),
    );
    let by_time = find_duplicates(
        vec![entry(&b), entry(&c), entry(&a)],
        Some(TieBreakPolicy::ByLastModified),
    );

    let name_group = by_name.groups.values().next().unwrap();
    let time_group = by_time.groups.values().next().unwrap();
    assert_eq!(name_group.original, a);
    assert_eq!(name_group.duplicates, vec![b.clone(), c.clone()]);
    assert_eq!(time_group.original, a);
    assert_eq!(time_group.duplicates, vec![b, c]);
}

#[test]
fn test_tie_break_preserves_group_size() {
    let dir = tempdir().unwrap();
    let paths: Vec<PathBuf> = (0..6)
        .map(|i| write_with_mtime(dir.path(), &format!("f{}", 5 - i), b"zz", 10_000 - i))
        .collect();

    for policy in [TieBreakPolicy::ByName, TieBreakPolicy::ByLastModified] {
        let result = find_duplicates(paths.iter().map(|p| entry(p)), Some(policy));
        let group = result.groups.values().next().unwrap();

        assert_eq!(group.len(), 6, "{}", policy);
        for path in &paths {
            assert_eq!(group.members().filter(|m| *m == path).count(), 1);
        }
    }
}

/// Every file hashes the same without being opened.
struct ConstantDigester;

impl Digester for ConstantDigester {
    fn partial_digest(&self, _path: &Path) -> Result<Digest, IoError> {
        Ok([7u8; 32])
    }

    fn full_digest(&self, _path: &Path) -> Result<Digest, IoError> {
        Ok([7u8; 32])
    }
}

#[test]
fn test_unreadable_mtime_is_reported_and_ranks_oldest() {
    let dir = tempdir().unwrap();
    let old = write_with_mtime(dir.path(), "old.txt", b"x", 1_000);
    let ghost = dir.path().join("ghost.txt");
    let entries = vec![
        FileEntry::new(old.clone(), 1),
        FileEntry::new(ghost.clone(), 1),
    ];

    let grouper = DuplicateGrouper::with_digester(FinderConfig::default(), ConstantDigester);
    let result = grouper.find_duplicates(entries, Some(TieBreakPolicy::ByLastModified));

    let group = result.groups.values().next().unwrap();
    assert_eq!(group.original, ghost);
    assert_eq!(group.duplicates, vec![old]);
    assert!(result.errors.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].op, IoOp::Modified);
    assert_eq!(result.warnings[0].path, ghost);
}
