//! Timestamp-based staleness checks.

use std::fs;
use std::path::Path;

use crate::builder::errors::{BuildError, BuildResult};

/// Whether `object` must be rebuilt from `source`.
///
/// Missing objects are stale. Otherwise the object is stale unless it is
/// strictly newer than the source; equal timestamps count as stale.
pub fn is_stale(source: &Path, object: &Path) -> BuildResult<bool> {
    let object_meta = match fs::metadata(object) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(BuildError::io(object, e)),
    };

    let src = fs::metadata(source)
        .and_then(|m| m.modified())
        .map_err(|e| BuildError::io(source, e))?;
    let obj = object_meta.modified().map_err(|e| BuildError::io(object, e))?;

    Ok(src >= obj)
}

/// Decide whether a source has to be handed to the compiler.
///
/// Outside quick mode every file is recompiled; in quick mode only stale ones.
pub fn needs_compile(quick: bool, source: &Path, object: &Path) -> BuildResult<bool> {
    if !quick {
        return Ok(true);
    }
    is_stale(source, object)
}
