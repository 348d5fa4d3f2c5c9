use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Atomically write `bytes` to `path`.
///
/// The content is written to a temporary file in the target directory and
/// then renamed into place, so readers never observe a partially written
/// output and an interrupted run leaves nothing behind at `path`.
///
/// Returns `Ok(false)` without touching the filesystem when `overwrite` is
/// disabled and the target already exists.
pub fn write_atomic(path: &Path, bytes: &[u8], overwrite: bool) -> Result<bool> {
    if !overwrite && path.exists() {
        return Ok(false);
    }

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .ok_or_else(|| Error::msg(format!("output path has no parent directory: {}", path.display())))?;

    // The temp file must live on the same filesystem as the target for the
    // rename to be atomic; creating it next to the target guarantees that.
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;

    tmp.persist(path).map_err(|persist_err| Error::Io(persist_err.error))?;
    Ok(true)
}
