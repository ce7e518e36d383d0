use dupefinder::duplicates::{find_duplicates, TieBreakPolicy};
use dupefinder::scanner::{MultiWalker, WalkerConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn config(recursive: bool) -> WalkerConfig {
    WalkerConfig {
        recursive,
        ..Default::default()
    }
}

#[test]
fn test_duplicates_across_two_roots() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    fs::write(second.path().join("copy.txt"), "shared content").unwrap();
    fs::write(first.path().join("orig.txt"), "shared content").unwrap();
    fs::write(second.path().join("other.txt"), "something else").unwrap();

    let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
    let entries = MultiWalker::new(roots, config(false)).collect();
    let result = find_duplicates(entries, None);

    assert_eq!(result.groups.len(), 1);
    let group = result.groups.values().next().unwrap();
    // The first root is enumerated first
    assert_eq!(group.original, first.path().join("orig.txt"));
    assert_eq!(group.duplicates, vec![second.path().join("copy.txt")]);
}

#[test]
fn test_root_order_decides_first_found() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    fs::write(first.path().join("a.txt"), "same").unwrap();
    fs::write(second.path().join("a.txt"), "same").unwrap();

    let forward = MultiWalker::new(
        vec![first.path().to_path_buf(), second.path().to_path_buf()],
        config(false),
    )
    .collect();
    let backward = MultiWalker::new(
        vec![second.path().to_path_buf(), first.path().to_path_buf()],
        config(false),
    )
    .collect();

    let forward = find_duplicates(forward, None);
    let backward = find_duplicates(backward, None);

    assert_eq!(
        forward.groups.values().next().unwrap().original,
        first.path().join("a.txt")
    );
    assert_eq!(
        backward.groups.values().next().unwrap().original,
        second.path().join("a.txt")
    );
}

#[test]
fn test_nested_root_not_counted_twice() {
    let dir = tempdir().unwrap();
    let inner = dir.path().join("inner");
    fs::create_dir(&inner).unwrap();
    fs::write(dir.path().join("top.txt"), "dup").unwrap();
    fs::write(inner.join("deep.txt"), "dup").unwrap();

    for roots in [
        vec![dir.path().to_path_buf(), inner.clone()],
        vec![inner.clone(), dir.path().to_path_buf()],
    ] {
        let entries = MultiWalker::new(roots, config(true)).collect();
        assert_eq!(entries.len(), 2);

        let result = find_duplicates(entries, None);
        let group = result.groups.values().next().unwrap();
        assert_eq!(group.len(), 2);
        assert_ne!(group.original, group.duplicates[0]);
    }
}

#[test]
fn test_nested_root_walked_when_flat() {
    let dir = tempdir().unwrap();
    let inner = dir.path().join("inner");
    fs::create_dir(&inner).unwrap();
    fs::write(dir.path().join("top.txt"), "dup").unwrap();
    fs::write(inner.join("deep.txt"), "dup").unwrap();

    let walker = MultiWalker::new(vec![dir.path().to_path_buf(), inner.clone()], config(false));
    assert_eq!(walker.effective_roots().len(), 2);

    let result = find_duplicates(walker.collect(), None);
    assert_eq!(result.groups.len(), 1);
}

#[test]
fn test_repeated_root_is_walked_once() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "x").unwrap();
    fs::write(dir.path().join("b"), "y").unwrap();

    let root = dir.path().to_path_buf();
    let entries = MultiWalker::new(vec![root.clone(), root], config(false)).collect();

    assert_eq!(entries.len(), 2);
    assert!(find_duplicates(entries, None).groups.is_empty());
}

#[test]
fn test_by_name_across_roots() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let names: Vec<PathBuf> = vec![
        first.path().join("zz.bin"),
        second.path().join("aa.bin"),
    ];
    for path in &names {
        fs::write(path, [9u8; 2048]).unwrap();
    }

    let entries = MultiWalker::new(
        vec![first.path().to_path_buf(), second.path().to_path_buf()],
        config(false),
    )
    .collect();
    let result = find_duplicates(entries, Some(TieBreakPolicy::ByName));

    let group = result.groups.values().next().unwrap();
    let expected = names.iter().min().unwrap();
    assert_eq!(&group.original, expected);
}
