//! Application version extraction.
//!
//! The app exports its version as a single constant; the bundle spec carries
//! the command that prints it. The captured string gates the rest of the
//! pipeline: the bundler never runs with an empty or malformed version.

use crate::spec::BundleSpec;
use std::io;
use std::path::Path;
use std::process::Command;

/// Errors from version extraction.
#[derive(Debug)]
pub enum VersionError {
    /// The bundle spec has no version command.
    NotConfigured,
    /// The version command could not be started.
    SpawnFailed { program: String, source: io::Error },
    /// The version command exited with a failure.
    CommandFailed { exit_code: Option<i32>, stderr: String },
    /// The version command printed nothing.
    EmptyOutput,
    /// The captured string does not look like a version.
    InvalidVersion(String),
}

impl std::fmt::Display for VersionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionError::NotConfigured => {
                write!(f, "no version command configured in the bundle spec")
            }
            VersionError::SpawnFailed { program, source } => {
                write!(f, "failed to run '{}': {}", program, source)
            }
            VersionError::CommandFailed { exit_code, stderr } => match exit_code {
                Some(code) => {
                    write!(f, "version command failed (exit code {}): {}", code, stderr)
                }
                None => write!(f, "version command terminated by signal: {}", stderr),
            },
            VersionError::EmptyOutput => write!(f, "version command produced no output"),
            VersionError::InvalidVersion(s) => {
                write!(f, "'{}' does not look like a version string", s)
            }
        }
    }
}

impl std::error::Error for VersionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VersionError::SpawnFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Run the spec's version command and return the validated version string.
pub fn run(project_dir: &Path, spec: &BundleSpec) -> Result<String, VersionError> {
    let (program, args) = spec
        .version_command
        .split_first()
        .ok_or(VersionError::NotConfigured)?;

    let output = Command::new(program)
        .args(args)
        .current_dir(project_dir)
        .output()
        .map_err(|e| VersionError::SpawnFailed {
            program: program.clone(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(VersionError::CommandFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout.lines().next().unwrap_or("").trim().to_string();
    if version.is_empty() {
        return Err(VersionError::EmptyOutput);
    }
    if !is_valid_version(&version) {
        return Err(VersionError::InvalidVersion(version));
    }

    Ok(version)
}

/// A plausible version starts with a digit and contains only alphanumerics,
/// dots, and hyphens (covers pre-release tags like `2.0.0-beta.1`).
fn is_valid_version(s: &str) -> bool {
    let starts_with_digit = s.chars().next().is_some_and(|c| c.is_ascii_digit());
    starts_with_digit && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}
