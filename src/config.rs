//! Resolution of the monitored root and the snapshot store location

use std::path::PathBuf;

/// Environment variable consulted when `--store` is not given.
pub const STORE_ENV_VAR: &str = "VIGIL_STORE";

/// Resolved settings for one scan: which directory to monitor and where
/// its baseline snapshot lives.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory to scan, as given on the command line (canonicalized
    /// later, when the walk starts).
    pub root: PathBuf,
    /// File the baseline snapshot is loaded from and saved to.
    pub store_path: PathBuf,
}

impl Config {
    pub fn new(root: PathBuf, store: Option<PathBuf>) -> Self {
        Self {
            root,
            store_path: resolve_store(store),
        }
    }
}

/// Pick the store path: an explicit `--store` wins, then a non-empty
/// `VIGIL_STORE` environment variable, then the per-user default.
pub fn resolve_store(cli: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli {
        return path;
    }
    if let Ok(value) = std::env::var(STORE_ENV_VAR) {
        if !value.is_empty() {
            return PathBuf::from(value);
        }
    }
    default_store_path()
}

/// Per-user default store location: `%LOCALAPPDATA%\vigil\snapshot.json`
/// on Windows, `~/.local/share/vigil/snapshot.json` elsewhere, falling
/// back to the current directory when the relevant variables are unset.
pub fn default_store_path() -> PathBuf {
    let base_dir = if cfg!(windows) {
        std::env::var("LOCALAPPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Fallback to %USERPROFILE%\AppData\Local
                std::env::var("USERPROFILE")
                    .map(|p| PathBuf::from(p).join("AppData").join("Local"))
                    .unwrap_or_else(|_| PathBuf::from("."))
            })
    } else {
        // Unix: ~/.local/share
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".local").join("share"))
            .unwrap_or_else(|_| PathBuf::from("."))
    };

    base_dir.join("vigil").join("snapshot.json")
}
