//! Post-build finalization.
//!
//! Renames the fresh bundler output to its versioned name, records size and
//! checksum, and clears the intermediate build directory. If the bundler
//! produced nothing, nothing is touched: the previous versioned artifact
//! stays in place.

use crate::targets::{self, BUILD_DIR, DIST_DIR};
use crate::utils::hash;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors from finalization.
#[derive(Debug)]
pub enum FinalizeError {
    /// The bundler did not produce the expected output.
    ArtifactMissing(PathBuf),
    /// Failed to delete the previous versioned artifact.
    RemovePrior { path: PathBuf, source: io::Error },
    /// Failed to rename the fresh output.
    Rename { from: PathBuf, to: PathBuf, source: io::Error },
    /// Failed to read the finalized artifact.
    Inspect { path: PathBuf, source: io::Error },
    /// Failed to write the checksum file.
    ChecksumWrite { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for FinalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinalizeError::ArtifactMissing(path) => {
                write!(f, "bundler output not found at {}", path.display())
            }
            FinalizeError::RemovePrior { path, source } => {
                write!(
                    f,
                    "failed to remove previous artifact {}: {}",
                    path.display(),
                    source
                )
            }
            FinalizeError::Rename { from, to, source } => {
                write!(
                    f,
                    "failed to rename {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
            FinalizeError::Inspect { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            FinalizeError::ChecksumWrite { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for FinalizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FinalizeError::ArtifactMissing(_) => None,
            FinalizeError::RemovePrior { source, .. } => Some(source),
            FinalizeError::Rename { source, .. } => Some(source),
            FinalizeError::Inspect { source, .. } => Some(source),
            FinalizeError::ChecksumWrite { source, .. } => Some(source),
        }
    }
}

/// What finalization produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeReport {
    /// Path of the versioned artifact
    pub artifact: PathBuf,
    pub size_bytes: u64,
    /// SHA-256 of the artifact (single-file builds only)
    pub checksum: Option<String>,
}

/// Finalize the bundler output for `name` at `version`.
///
/// Single-file builds rename `dist/<name><suffix>`; folder builds rename the
/// `dist/<name>` directory. Any previous artifact with the same versioned
/// name is replaced.
pub fn run(
    project_dir: &Path,
    name: &str,
    version: &str,
    onefile: bool,
) -> Result<FinalizeReport, FinalizeError> {
    let dist = project_dir.join(DIST_DIR);
    let (fresh, versioned) = if onefile {
        (
            dist.join(targets::artifact_name(name)),
            dist.join(targets::versioned_artifact_name(name, version)),
        )
    } else {
        (dist.join(name), dist.join(format!("{}_v{}", name, version)))
    };

    if !fresh.exists() {
        return Err(FinalizeError::ArtifactMissing(fresh));
    }

    if versioned.exists() {
        let removed = if versioned.is_dir() {
            fs::remove_dir_all(&versioned)
        } else {
            fs::remove_file(&versioned)
        };
        removed.map_err(|e| FinalizeError::RemovePrior {
            path: versioned.clone(),
            source: e,
        })?;
    }

    fs::rename(&fresh, &versioned).map_err(|e| FinalizeError::Rename {
        from: fresh.clone(),
        to: versioned.clone(),
        source: e,
    })?;

    let (size_bytes, checksum) = if onefile {
        let metadata = fs::metadata(&versioned).map_err(|e| FinalizeError::Inspect {
            path: versioned.clone(),
            source: e,
        })?;
        let digest = hash::hash_file(&versioned).map_err(|e| FinalizeError::Inspect {
            path: versioned.clone(),
            source: e,
        })?;
        write_checksum_file(&versioned, &digest)?;
        (metadata.len(), Some(digest))
    } else {
        let size = dir_size(&versioned).map_err(|e| FinalizeError::Inspect {
            path: versioned.clone(),
            source: e,
        })?;
        (size, None)
    };

    // Best-effort: the release is already complete at this point.
    let build_dir = project_dir.join(BUILD_DIR);
    if build_dir.exists() {
        if let Err(e) = fs::remove_dir_all(&build_dir) {
            eprintln!("Warning: failed to remove {}: {}", build_dir.display(), e);
        }
    }

    Ok(FinalizeReport {
        artifact: versioned,
        size_bytes,
        checksum,
    })
}

/// Write `<artifact>.sha256` in sha256sum format.
fn write_checksum_file(artifact: &Path, digest: &str) -> Result<(), FinalizeError> {
    let mut os_name = artifact.as_os_str().to_os_string();
    os_name.push(".sha256");
    let checksum_path = PathBuf::from(os_name);

    let file_name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    fs::write(&checksum_path, format!("{}  {}\n", digest, file_name)).map_err(|e| {
        FinalizeError::ChecksumWrite {
            path: checksum_path.clone(),
            source: e,
        }
    })
}

fn dir_size(dir: &Path) -> io::Result<u64> {
    let mut total = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            total += dir_size(&entry.path())?;
        } else {
            total += metadata.len();
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn dist_path(project: &Path) -> PathBuf {
        let dist = project.join(DIST_DIR);
        fs::create_dir_all(&dist).unwrap();
        dist
    }

    #[test]
    fn renames_output_and_replaces_prior_artifact() {
        let project = tempdir().unwrap();
        let dist = dist_path(project.path());
        fs::write(dist.join(targets::artifact_name("App")), b"new build").unwrap();
        fs::write(
            dist.join(targets::versioned_artifact_name("App", "1.0.0")),
            b"old build",
        )
        .unwrap();

        let report = run(project.path(), "App", "1.0.0", true).unwrap();

        let versioned = dist.join(targets::versioned_artifact_name("App", "1.0.0"));
        assert_eq!(report.artifact, versioned);
        assert_eq!(fs::read(&versioned).unwrap(), b"new build");
        assert!(!dist.join(targets::artifact_name("App")).exists());
        assert_eq!(report.size_bytes, b"new build".len() as u64);
    }

    #[test]
    fn checksum_file_matches_artifact_bytes() {
        let project = tempdir().unwrap();
        let dist = dist_path(project.path());
        fs::write(dist.join(targets::artifact_name("App")), b"payload").unwrap();

        let report = run(project.path(), "App", "2.0.0", true).unwrap();

        let digest = report.checksum.unwrap();
        assert_eq!(digest, hash::hash_bytes(b"payload"));

        let mut checksum_name = report.artifact.as_os_str().to_os_string();
        checksum_name.push(".sha256");
        let content = fs::read_to_string(PathBuf::from(checksum_name)).unwrap();
        assert!(content.starts_with(&digest));
        assert!(content.contains(&targets::versioned_artifact_name("App", "2.0.0")));
    }

    #[test]
    fn missing_output_leaves_prior_artifact_alone() {
        let project = tempdir().unwrap();
        let dist = dist_path(project.path());
        let prior = dist.join(targets::versioned_artifact_name("App", "1.0.0"));
        fs::write(&prior, b"old build").unwrap();

        let result = run(project.path(), "App", "1.0.0", true);

        assert!(matches!(result, Err(FinalizeError::ArtifactMissing(_))));
        assert_eq!(fs::read(&prior).unwrap(), b"old build");
    }

    #[test]
    fn second_run_yields_single_artifact() {
        let project = tempdir().unwrap();
        let dist = dist_path(project.path());

        fs::write(dist.join(targets::artifact_name("App")), b"first").unwrap();
        run(project.path(), "App", "1.0.0", true).unwrap();

        fs::write(dist.join(targets::artifact_name("App")), b"second").unwrap();
        run(project.path(), "App", "1.0.0", true).unwrap();

        let versioned = dist.join(targets::versioned_artifact_name("App", "1.0.0"));
        assert_eq!(fs::read(&versioned).unwrap(), b"second");

        let artifacts: Vec<_> = fs::read_dir(&dist)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|n| !n.ends_with(".sha256"))
            .collect();
        assert_eq!(artifacts.len(), 1);
    }

    #[test]
    fn build_directory_is_removed() {
        let project = tempdir().unwrap();
        let dist = dist_path(project.path());
        fs::write(dist.join(targets::artifact_name("App")), b"bin").unwrap();

        let build = project.path().join(BUILD_DIR);
        fs::create_dir_all(build.join("work")).unwrap();
        fs::write(build.join("work/tmp.o"), b"intermediate").unwrap();

        run(project.path(), "App", "1.0.0", true).unwrap();
        assert!(!build.exists());
    }

    #[test]
    fn folder_build_renames_directory() {
        let project = tempdir().unwrap();
        let dist = dist_path(project.path());
        let fresh = dist.join("App");
        fs::create_dir_all(fresh.join("lib")).unwrap();
        fs::write(fresh.join(targets::artifact_name("App")), b"binary").unwrap();
        fs::write(fresh.join("lib/dep.so"), b"library code").unwrap();

        let report = run(project.path(), "App", "1.0.0", false).unwrap();

        let versioned = dist.join("App_v1.0.0");
        assert!(versioned.is_dir());
        assert!(!fresh.exists());
        assert_eq!(
            report.size_bytes,
            (b"binary".len() + b"library code".len()) as u64
        );
        assert_eq!(report.checksum, None);
    }
}
