//! Fatal error taxonomy for a monitor run
//!
//! Per-file read failures are deliberately not here: they are non-fatal,
//! handled at the hasher boundary (see [`crate::hasher::ReadFailure`]).

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run. The CLI maps each variant to a distinct
/// process exit code so scripts can tell the failure classes apart.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The monitored root does not exist or is not a directory.
    #[error("invalid root directory: {}", .path.display())]
    InvalidRoot { path: PathBuf },

    /// The snapshot store exists but does not parse. Never treated as an
    /// empty baseline: a damaged store must fail loudly, not mask a prior
    /// state.
    #[error("snapshot store {} is corrupt: {source}", .path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot store exists but cannot be read at all.
    #[error("cannot read snapshot store {}: {source}", .path.display())]
    StoreUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the new baseline failed. Raised after the report has
    /// already been shown.
    #[error("failed to persist snapshot to {}: {source}", .path.display())]
    PersistFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MonitorError {
    /// Exit code for this failure class (0 is success, 1 is reserved for
    /// generic errors such as bad CLI input).
    pub fn exit_code(&self) -> u8 {
        match self {
            MonitorError::InvalidRoot { .. } => 2,
            MonitorError::CorruptStore { .. } | MonitorError::StoreUnreadable { .. } => 3,
            MonitorError::PersistFailure { .. } => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io;

    #[test]
    fn test_exit_codes_are_distinct_per_class() {
        let invalid = MonitorError::InvalidRoot {
            path: PathBuf::from("/nope"),
        };
        let corrupt = MonitorError::CorruptStore {
            path: PathBuf::from("/store.json"),
            source: serde_json::from_str::<BTreeMap<String, String>>("not json").unwrap_err(),
        };
        let unreadable = MonitorError::StoreUnreadable {
            path: PathBuf::from("/store.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let persist = MonitorError::PersistFailure {
            path: PathBuf::from("/store.json"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };

        assert_eq!(invalid.exit_code(), 2);
        assert_eq!(corrupt.exit_code(), 3);
        assert_eq!(unreadable.exit_code(), 3);
        assert_eq!(persist.exit_code(), 4);
    }

    #[test]
    fn test_messages_name_the_path() {
        let err = MonitorError::InvalidRoot {
            path: PathBuf::from("/missing/dir"),
        };
        assert!(err.to_string().contains("/missing/dir"));
    }
}
