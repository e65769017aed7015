//! Bundler invocation.
//!
//! Translates the declarative bundle spec into an argument list and runs the
//! external bundler in the project directory. The bundler is responsible for
//! producing `dist/<name>`; this module only supplies configuration and
//! checks the exit status.

use crate::spec::BundleSpec;
use std::io;
use std::path::Path;
use std::process::Command;

/// Errors from running the bundler.
#[derive(Debug)]
pub enum BundlerError {
    /// The bundler executable could not be started.
    SpawnFailed { program: String, source: io::Error },
    /// The bundler exited with a failure.
    BundlerFailed { exit_code: Option<i32>, stderr: String },
}

impl std::fmt::Display for BundlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BundlerError::SpawnFailed { program, source } => {
                write!(f, "failed to run '{}': {}", program, source)
            }
            BundlerError::BundlerFailed { exit_code, stderr } => match exit_code {
                Some(code) => write!(f, "bundler exited with code {}: {}", code, stderr),
                None => write!(f, "bundler terminated by signal: {}", stderr),
            },
        }
    }
}

impl std::error::Error for BundlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BundlerError::SpawnFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Separator between source and dest in `--add-data` entries.
fn data_separator() -> char {
    if cfg!(target_os = "windows") { ';' } else { ':' }
}

/// Build the bundler argument list from a spec. The entry script goes last.
pub fn bundler_args(spec: &BundleSpec) -> Vec<String> {
    let mut args = vec![
        "--noconfirm".to_string(),
        "--clean".to_string(),
        "--name".to_string(),
        spec.name.clone(),
    ];

    args.push(if spec.windowed { "--windowed" } else { "--console" }.to_string());
    args.push(if spec.onefile { "--onefile" } else { "--onedir" }.to_string());

    if let Some(icon) = &spec.icon {
        args.push("--icon".to_string());
        args.push(icon.target.clone());
    }

    for data in &spec.data {
        args.push("--add-data".to_string());
        args.push(format!("{}{}{}", data.source, data_separator(), data.dest));
    }
    for module in &spec.hidden_imports {
        args.push("--hidden-import".to_string());
        args.push(module.clone());
    }
    for module in &spec.excludes {
        args.push("--exclude-module".to_string());
        args.push(module.clone());
    }

    args.push(spec.entry.clone());
    args
}

/// Run the bundler in the project directory and wait for it to finish.
pub fn run(project_dir: &Path, spec: &BundleSpec) -> Result<(), BundlerError> {
    let output = Command::new(&spec.bundler_program)
        .args(bundler_args(spec))
        .current_dir(project_dir)
        .output()
        .map_err(|e| BundlerError::SpawnFailed {
            program: spec.bundler_program.clone(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(BundlerError::BundlerFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(())
}
