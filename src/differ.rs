//! Change classification between two snapshots

use crate::snapshot::Snapshot;

/// The three disjoint change classes between two snapshots. Unchanged
/// paths appear in none of them. Each list is sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    /// Present in both runs with differing digests.
    pub modified: Vec<String>,
    /// Present in the current run only.
    pub added: Vec<String>,
    /// Present in the previous run only.
    pub deleted: Vec<String>,
}

impl ChangeReport {
    pub fn is_empty(&self) -> bool {
        self.modified.is_empty() && self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Classify every path across `previous` and `current`.
///
/// Digest equality is only consulted for paths present in both snapshots;
/// membership alone decides added and deleted. O(n) over the combined
/// path count, and deterministic because snapshots iterate sorted.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> ChangeReport {
    let mut report = ChangeReport::default();

    for (path, digest) in current.iter() {
        match previous.digest(path) {
            Some(old_digest) if old_digest != digest => report.modified.push(path.clone()),
            Some(_) => {}
            None => report.added.push(path.clone()),
        }
    }

    for path in previous.paths() {
        if !current.contains(path) {
            report.deleted.push(path.clone());
        }
    }

    report
}
