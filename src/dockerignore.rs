//! Default `.dockerignore` generation.

use crate::error::{AuditError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DOCKERIGNORE: &str = "\
# Generated by docker-audit
**/node_modules
**/__pycache__
*.log
.git
.env
Dockerfile.dev
";

/// Write a default `.dockerignore` into `dir` unless one already exists.
/// Returns the path when a file was written, `None` when one was present.
pub fn write_default(dir: &Path) -> Result<Option<PathBuf>> {
    let path = dir.join(".dockerignore");
    if path.exists() {
        return Ok(None);
    }
    fs::write(&path, DEFAULT_DOCKERIGNORE).map_err(|source| AuditError::WriteError {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(path))
}
