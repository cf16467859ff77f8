//! Atomic file replacement for the index and record files.

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `content` to `path` through a temp file in the same directory and
/// an atomic rename. The target is either fully replaced or left alone.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no parent directory"))?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;

    // persist consumes the temp file; on error it is dropped and removed
    temp_file.persist(path).map_err(|e| e.error)?;

    Ok(())
}
