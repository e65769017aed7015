use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use crosstrans_build::commands::icon::IconOutcome;
use crosstrans_build::commands::{clean, icon, release, version};
use crosstrans_build::spec::{BundleSpec, SPEC_FILENAME};

#[derive(Parser)]
#[command(name = "crosstrans-build")]
#[command(about = "Release pipeline for the CrossTrans desktop app")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full release pipeline (icon, version, bundle, finalize)
    Release {
        /// Project directory containing bundle.json
        #[arg(default_value = ".")]
        project_dir: PathBuf,

        /// Build a console executable regardless of the bundle spec
        #[arg(long)]
        console: bool,
    },
    /// Remove the build and dist directories
    Clean {
        /// Project directory containing bundle.json
        #[arg(default_value = ".")]
        project_dir: PathBuf,
    },
    /// Convert a PNG into a multi-resolution application icon
    Icon {
        /// Source PNG image
        png: PathBuf,
        /// Target ICO path
        ico: PathBuf,
    },
    /// Extract and print the application version
    Version {
        /// Project directory containing bundle.json
        #[arg(default_value = ".")]
        project_dir: PathBuf,
    },
    /// Load and validate the bundle spec without building
    Check {
        /// Project directory containing bundle.json
        #[arg(default_value = ".")]
        project_dir: PathBuf,
    },
    /// Write a starter bundle.json into the project directory
    Init {
        /// Project directory to initialize
        #[arg(default_value = ".")]
        project_dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Release {
            project_dir,
            console,
        } => match release::run(&project_dir, console) {
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(e.exit_code());
            }
        },
        Commands::Clean { project_dir } => match clean::run(&project_dir) {
            Ok(removed) => {
                if removed.is_empty() {
                    println!("Nothing to remove");
                }
                for path in removed {
                    println!("Removed {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Commands::Icon { png, ico } => match icon::run(&png, &ico) {
            Ok(IconOutcome::Created) => {
                println!("Created {}", ico.display());
            }
            Ok(IconOutcome::AlreadyExists) => {
                println!("{} already exists, leaving it untouched", ico.display());
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(3);
            }
        },
        Commands::Version { project_dir } => {
            let spec = match BundleSpec::load_from_project(&project_dir) {
                Ok(spec) => spec,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(2);
                }
            };
            match version::run(&project_dir, &spec) {
                Ok(app_version) => {
                    println!("{}", app_version);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(4);
                }
            }
        }
        Commands::Check { project_dir } => {
            let result = BundleSpec::load_from_project(&project_dir)
                .and_then(|spec| spec.validate(&project_dir).map(|()| spec));
            match result {
                Ok(spec) => {
                    println!(
                        "Spec OK: {} (entry {}, {} data dirs, {} hidden imports, {} excludes)",
                        spec.name,
                        spec.entry,
                        spec.data.len(),
                        spec.hidden_imports.len(),
                        spec.excludes.len()
                    );
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(2);
                }
            }
        }
        Commands::Init { project_dir } => {
            let path = project_dir.join(SPEC_FILENAME);
            if path.exists() {
                eprintln!("Error: {} already exists", path.display());
                process::exit(2);
            }
            match BundleSpec::default().save(&path) {
                Ok(()) => {
                    println!("Wrote {}", path.display());
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(2);
                }
            }
        }
    }
}
