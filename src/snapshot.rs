//! Snapshot of a directory tree and its persistent store
//!
//! A snapshot maps every regular file under the monitored root (as a
//! root-relative key) to the hex digest of its content. The persisted
//! form is a flat, pretty-printed JSON object so the baseline stays
//! human-inspectable with nothing but a pager.

use crate::error::MonitorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Path -> digest mapping for one point in time.
///
/// Backed by a `BTreeMap` so iteration, reports and the persisted JSON
/// are all deterministically sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the persisted snapshot.
    ///
    /// A missing file is the normal first-run state and yields an empty
    /// snapshot. A present-but-unparseable file is a hard error: a
    /// corrupt baseline must never be silently treated as empty.
    pub fn load(store_path: &Path) -> Result<Self, MonitorError> {
        match fs::read_to_string(store_path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| MonitorError::CorruptStore {
                path: store_path.to_path_buf(),
                source,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Snapshot::new()),
            Err(source) => Err(MonitorError::StoreUnreadable {
                path: store_path.to_path_buf(),
                source,
            }),
        }
    }

    /// Write this snapshot to the store, replacing any prior content.
    /// Parent directories are created as needed.
    pub fn save(&self, store_path: &Path) -> Result<(), MonitorError> {
        let persist_failure = |source| MonitorError::PersistFailure {
            path: store_path.to_path_buf(),
            source,
        };

        if let Some(parent) = store_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(persist_failure)?;
            }
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| persist_failure(io::Error::new(io::ErrorKind::Other, e)))?;
        fs::write(store_path, json).map_err(persist_failure)
    }

    pub fn insert(&mut self, path: String, digest: String) {
        self.entries.insert(path, digest);
    }

    pub fn digest(&self, path: &str) -> Option<&String> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in sorted path order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }

    /// Paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }
}

impl FromIterator<(String, String)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Derive the store key for a file: its path relative to the canonical
/// root, with forward slashes on every platform so baselines stay
/// comparable across runs.
pub fn path_key(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn sample() -> Snapshot {
        [
            ("a.txt".to_string(), "1111".to_string()),
            ("sub/b.txt".to_string(), "2222".to_string()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_load_missing_store_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = temp_dir.path().join("snapshot.json");

        let snapshot = Snapshot::load(&store).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = temp_dir.path().join("snapshot.json");

        let snapshot = sample();
        snapshot.save(&store).unwrap();
        let loaded = Snapshot::load(&store).unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_empty_snapshot_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = temp_dir.path().join("snapshot.json");

        Snapshot::new().save(&store).unwrap();
        let loaded = Snapshot::load(&store).unwrap();

        assert!(loaded.is_empty());
    }

    #[test]
    fn test_corrupt_store_is_not_treated_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = temp_dir.path().join("snapshot.json");
        fs::write(&store, "{{{ definitely not json").unwrap();

        let err = Snapshot::load(&store).unwrap_err();
        assert!(matches!(err, MonitorError::CorruptStore { .. }));
    }

    #[test]
    fn test_truncated_store_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let store = temp_dir.path().join("snapshot.json");
        fs::write(&store, "").unwrap();

        let err = Snapshot::load(&store).unwrap_err();
        assert!(matches!(err, MonitorError::CorruptStore { .. }));
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let store = temp_dir.path().join("snapshot.json");
        fs::write(&store, r#"["a.txt", "b.txt"]"#).unwrap();

        let err = Snapshot::load(&store).unwrap_err();
        assert!(matches!(err, MonitorError::CorruptStore { .. }));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let store = temp_dir.path().join("nested").join("deep").join("snapshot.json");

        sample().save(&store).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_persisted_form_is_a_flat_string_map() {
        let temp_dir = TempDir::new().unwrap();
        let store = temp_dir.path().join("snapshot.json");
        sample().save(&store).unwrap();

        let text = fs::read_to_string(&store).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.values().all(|v| v.is_string()));
    }

    #[test]
    fn test_path_key_is_root_relative_with_forward_slashes() {
        let root = PathBuf::from("/monitored/root");
        let file = root.join("sub").join("file.txt");

        assert_eq!(path_key(&file, &root), "sub/file.txt");
    }

    #[test]
    fn test_path_key_outside_root_falls_back_to_full_path() {
        let root = PathBuf::from("/monitored/root");
        let file = PathBuf::from("/elsewhere/file.txt");

        assert_eq!(path_key(&file, &root), "/elsewhere/file.txt");
    }
}
