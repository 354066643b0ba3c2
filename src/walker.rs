//! Recursive enumeration of the regular files under a monitored root

use crate::error::MonitorError;
use globset::GlobSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// The outcome of one traversal. `files` holds every regular file found;
/// enumeration order is unspecified and callers must not rely on it.
/// `skipped` records per-entry traversal errors (an unreadable
/// subdirectory, a vanished entry) that were skipped rather than aborting
/// the walk.
#[derive(Debug)]
pub struct WalkedTree {
    /// Canonical form of the requested root.
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    pub skipped: Vec<walkdir::Error>,
}

/// Enumerate every regular file under `root`, pruning entries matched by
/// `excludes` (patterns are tested against root-relative paths; matching
/// a directory prunes its whole subtree).
///
/// Symbolic links are neither followed nor emitted. Directories are
/// descended into but never appear in `files`. A missing root or a root
/// that is not a directory fails with `InvalidRoot` before anything is
/// read.
pub fn walk_tree(root: &Path, excludes: &GlobSet) -> Result<WalkedTree, MonitorError> {
    let invalid_root = || MonitorError::InvalidRoot {
        path: root.to_path_buf(),
    };

    let root = fs::canonicalize(root).map_err(|_| invalid_root())?;
    if !root.is_dir() {
        return Err(invalid_root());
    }

    let mut files = Vec::new();
    let mut skipped = Vec::new();

    let entries = WalkDir::new(&root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, &root, excludes));

    for entry in entries {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(err) => skipped.push(err),
        }
    }

    Ok(WalkedTree {
        root,
        files,
        skipped,
    })
}

fn is_excluded(entry: &DirEntry, root: &Path, excludes: &GlobSet) -> bool {
    // Never filter the root itself; its relative path is empty.
    if entry.depth() == 0 || excludes.is_empty() {
        return false;
    }
    let relative = entry.path().strip_prefix(root).unwrap_or_else(|_| entry.path());
    excludes.is_match(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use globset::{Glob, GlobSetBuilder};
    use tempfile::TempDir;

    fn no_excludes() -> GlobSet {
        GlobSet::empty()
    }

    fn excludes(patterns: &[&str]) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern).unwrap());
        }
        builder.build().unwrap()
    }

    fn file_names(tree: &WalkedTree) -> Vec<String> {
        let mut names: Vec<String> = tree
            .files
            .iter()
            .map(|p| {
                p.strip_prefix(&tree.root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_walks_nested_regular_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir_all(temp_dir.path().join("sub/deep")).unwrap();
        fs::write(temp_dir.path().join("sub/b.txt"), "b").unwrap();
        fs::write(temp_dir.path().join("sub/deep/c.txt"), "c").unwrap();

        let tree = walk_tree(temp_dir.path(), &no_excludes()).unwrap();
        assert_eq!(file_names(&tree), vec!["a.txt", "sub/b.txt", "sub/deep/c.txt"]);
        assert!(tree.skipped.is_empty());
    }

    #[test]
    fn test_directories_are_descended_but_not_emitted() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("only/dirs/here")).unwrap();

        let tree = walk_tree(temp_dir.path(), &no_excludes()).unwrap();
        assert!(tree.files.is_empty());
    }

    #[test]
    fn test_files_are_reported_under_the_canonical_root() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();

        let tree = walk_tree(temp_dir.path(), &no_excludes()).unwrap();
        assert!(tree.files.iter().all(|f| f.starts_with(&tree.root)));
    }

    #[test]
    fn test_missing_root_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let gone = temp_dir.path().join("nope");

        let err = walk_tree(&gone, &no_excludes()).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidRoot { .. }));
    }

    #[test]
    fn test_file_as_root_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "not a dir").unwrap();

        let err = walk_tree(&file, &no_excludes()).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidRoot { .. }));
    }

    #[test]
    fn test_excluded_directory_is_pruned_with_its_subtree() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("keep.txt"), "k").unwrap();
        fs::create_dir_all(temp_dir.path().join("logs/deep")).unwrap();
        fs::write(temp_dir.path().join("logs/app.log"), "l").unwrap();
        fs::write(temp_dir.path().join("logs/deep/old.log"), "l").unwrap();

        let tree = walk_tree(temp_dir.path(), &excludes(&["logs"])).unwrap();
        assert_eq!(file_names(&tree), vec!["keep.txt"]);
    }

    #[test]
    fn test_excluded_glob_drops_matching_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("keep.txt"), "k").unwrap();
        fs::create_dir_all(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("sub/trace.log"), "l").unwrap();

        let tree = walk_tree(temp_dir.path(), &excludes(&["**/*.log"])).unwrap();
        assert_eq!(file_names(&tree), vec!["keep.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed_or_emitted() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("real.txt"), "r").unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("real.txt"),
            temp_dir.path().join("link.txt"),
        )
        .unwrap();

        let tree = walk_tree(temp_dir.path(), &no_excludes()).unwrap();
        assert_eq!(file_names(&tree), vec!["real.txt"]);
    }
}
