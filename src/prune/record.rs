use sha2::{Digest, Sha256};
use std::cell::OnceCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// A regular file seen during pruning
///
/// The content digest is computed on first access and cached for the
/// lifetime of the record. A failed computation is not cached, so a later
/// call retries the read.
#[derive(Debug)]
pub struct FileRecord {
    path: PathBuf,
    len: u64,
    digest: OnceCell<String>,
}

impl FileRecord {
    pub fn new(path: PathBuf, len: u64) -> Self {
        Self {
            path,
            len,
            digest: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Hex-encoded SHA-256 of the full file content
    pub fn digest(&self) -> io::Result<&str> {
        if let Some(digest) = self.digest.get() {
            return Ok(digest.as_str());
        }

        let computed = hash_file(&self.path)?;
        Ok(self.digest.get_or_init(|| computed).as_str())
    }
}

/// Streams a file through SHA-256
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
