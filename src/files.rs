//! Whole-file load and save.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, Result};

/// Read `path` as UTF-8 text.
///
/// # Errors
/// Returns [`EngineError::Io`] if the file cannot be read.
pub fn load(path: &Path) -> Result<String> {
    let _scope = crate::perf::scope("files.load");
    fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the contents of `path` with `text`.
///
/// # Errors
/// Returns [`EngineError::Io`] if the file cannot be written.
pub fn save(path: &Path, text: &str) -> Result<()> {
    let _scope = crate::perf::scope("files.save");
    fs::write(path, text).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "document saved");
    Ok(())
}
