//! Streaming content digests for single files

use blake3::Hasher;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Files are read and fed to the hasher in chunks of this size, so memory
/// use stays bounded regardless of file size.
const CHUNK_SIZE: usize = 8192;

/// A file could not be opened or read. Non-fatal: the scanner skips the
/// path, warns, and leaves it out of the current snapshot.
#[derive(Debug, Error)]
#[error("failed to read {}: {source}", .path.display())]
pub struct ReadFailure {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Compute the BLAKE3 digest of a file's content as a lowercase hex
/// string (64 characters).
///
/// The file is streamed through the hasher chunk by chunk rather than
/// loaded whole, so arbitrarily large files hash in constant memory.
pub fn hash_file(path: &Path) -> Result<String, ReadFailure> {
    let fail = |source| ReadFailure {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(fail)?;
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(fail)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}
