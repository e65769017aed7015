//! Removal of bundler output directories.

use crate::targets::{BUILD_DIR, DIST_DIR};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors from cleaning.
#[derive(Debug)]
pub enum CleanError {
    Remove { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for CleanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanError::Remove { path, source } => {
                write!(f, "failed to remove {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for CleanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CleanError::Remove { source, .. } => Some(source),
        }
    }
}

/// Remove the build and dist directories. Returns the paths removed.
///
/// Unlike the finalizer's build-directory cleanup, a failure here is an
/// error: the caller asked for the removal explicitly.
pub fn run(project_dir: &Path) -> Result<Vec<PathBuf>, CleanError> {
    let mut removed = Vec::new();
    for dir in [BUILD_DIR, DIST_DIR] {
        let path = project_dir.join(dir);
        if path.exists() {
            fs::remove_dir_all(&path).map_err(|e| CleanError::Remove {
                path: path.clone(),
                source: e,
            })?;
            removed.push(path);
        }
    }
    Ok(removed)
}
