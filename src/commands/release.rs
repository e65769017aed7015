//! The full release pipeline.
//!
//! Stages run strictly in sequence, each blocking on the previous one; the
//! first failure aborts the run. Version extraction happens before the
//! bundler so a bad version can never end up in an artifact name.

use crate::commands::bundle;
use crate::commands::finalize::{self, FinalizeReport};
use crate::commands::icon::{self, IconOutcome};
use crate::commands::version;
use crate::error::ReleaseError;
use crate::spec::BundleSpec;
use std::io::{self, Write};
use std::path::Path;

/// Run the release pipeline for the project in `project_dir`.
///
/// `force_console` builds a console-subsystem executable regardless of the
/// bundle spec (the debug build of the original tooling).
pub fn run(project_dir: &Path, force_console: bool) -> Result<FinalizeReport, ReleaseError> {
    // 1. Load and validate the bundle spec
    let mut spec = BundleSpec::load_from_project(project_dir).map_err(ReleaseError::Spec)?;
    spec.validate(project_dir).map_err(ReleaseError::Spec)?;
    if force_console {
        spec.windowed = false;
    }

    println!("Building {} release", spec.name);

    // 2. Prepare the application icon
    if let Some(icon_spec) = &spec.icon {
        print!("Preparing icon... ");
        io::stdout().flush().ok();
        let outcome = icon::run(
            &project_dir.join(&icon_spec.source),
            &project_dir.join(&icon_spec.target),
        )
        .map_err(ReleaseError::Icon)?;
        match outcome {
            IconOutcome::Created => println!("done"),
            IconOutcome::AlreadyExists => println!("already present"),
        }
    }

    // 3. Extract the application version
    print!("Reading application version... ");
    io::stdout().flush().ok();
    let app_version = version::run(project_dir, &spec).map_err(ReleaseError::Version)?;
    println!("{}", app_version);

    // 4. Run the bundler
    println!("Running {}...", spec.bundler_program);
    bundle::run(project_dir, &spec).map_err(ReleaseError::Bundler)?;

    // 5. Finalize the artifact
    print!("Finalizing artifact... ");
    io::stdout().flush().ok();
    let report = finalize::run(project_dir, &spec.name, &app_version, spec.onefile)
        .map_err(ReleaseError::Finalize)?;
    println!("done");

    println!();
    println!(
        "Created: {} ({} bytes)",
        report.artifact.display(),
        report.size_bytes
    );
    if let Some(checksum) = &report.checksum {
        println!("SHA-256: {}", checksum);
    }

    Ok(report)
}
