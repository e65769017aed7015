use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Filename of the bundle spec within a project directory
pub const SPEC_FILENAME: &str = "bundle.json";

/// A data directory embedded into the bundled application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataDir {
    /// Source path, relative to the project directory
    pub source: String,
    /// Destination path inside the bundle
    pub dest: String,
}

/// Icon paths for the bundled application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSpec {
    /// Source PNG image
    pub source: String,
    /// Target ICO file handed to the bundler
    pub target: String,
}

/// Declarative description of one bundler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSpec {
    /// Base name of the output artifact
    pub name: String,
    /// Entry script handed to the bundler
    pub entry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<DataDir>,
    /// Modules the bundler's static analysis cannot discover
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden_imports: Vec<String>,
    /// Modules excluded from the bundle for size
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
    /// Windowed (no console) subsystem
    #[serde(default = "default_true")]
    pub windowed: bool,
    /// Single-file output instead of a single-folder tree
    #[serde(default = "default_true")]
    pub onefile: bool,
    /// Command that prints the application version on stdout
    pub version_command: Vec<String>,
    #[serde(default = "default_bundler")]
    pub bundler_program: String,
}

fn default_true() -> bool {
    true
}

fn default_bundler() -> String {
    "pyinstaller".to_string()
}

/// Errors from loading or validating a bundle spec.
#[derive(Debug)]
pub enum SpecError {
    /// No bundle.json in the project directory
    NotFound(PathBuf),
    /// The spec file could not be read or parsed
    Parse { path: PathBuf, reason: String },
    /// The artifact name is empty
    EmptyName,
    /// No version command configured
    EmptyVersionCommand,
    /// Entry script does not exist
    EntryMissing(PathBuf),
    /// Icon source PNG does not exist (and no generated icon is present)
    IconSourceMissing(PathBuf),
    /// A data source directory does not exist
    DataSourceMissing(PathBuf),
    /// A module is listed twice in the same list
    DuplicateModule(String),
    /// A module is both hidden-imported and excluded
    ConflictingModule(String),
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::NotFound(path) => {
                write!(f, "bundle spec not found: {}", path.display())
            }
            SpecError::Parse { path, reason } => {
                write!(f, "failed to load {}: {}", path.display(), reason)
            }
            SpecError::EmptyName => write!(f, "artifact name is empty"),
            SpecError::EmptyVersionCommand => write!(f, "no version command configured"),
            SpecError::EntryMissing(path) => {
                write!(f, "entry script not found: {}", path.display())
            }
            SpecError::IconSourceMissing(path) => {
                write!(f, "icon source not found: {}", path.display())
            }
            SpecError::DataSourceMissing(path) => {
                write!(f, "data directory not found: {}", path.display())
            }
            SpecError::DuplicateModule(module) => {
                write!(f, "module '{}' is listed twice", module)
            }
            SpecError::ConflictingModule(module) => {
                write!(
                    f,
                    "module '{}' is both hidden-imported and excluded",
                    module
                )
            }
        }
    }
}

impl std::error::Error for SpecError {}

impl BundleSpec {
    pub fn load(path: &Path) -> io::Result<BundleSpec> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)
    }

    /// Load the bundle spec from `<project_dir>/bundle.json`.
    pub fn load_from_project(project_dir: &Path) -> Result<BundleSpec, SpecError> {
        let path = project_dir.join(SPEC_FILENAME);
        if !path.exists() {
            return Err(SpecError::NotFound(path));
        }
        BundleSpec::load(&path).map_err(|e| SpecError::Parse {
            path,
            reason: e.to_string(),
        })
    }

    /// Check that the spec is internally consistent and its inputs exist.
    pub fn validate(&self, project_dir: &Path) -> Result<(), SpecError> {
        if self.name.trim().is_empty() {
            return Err(SpecError::EmptyName);
        }
        if self.version_command.is_empty() {
            return Err(SpecError::EmptyVersionCommand);
        }

        let entry = project_dir.join(&self.entry);
        if !entry.exists() {
            return Err(SpecError::EntryMissing(entry));
        }

        if let Some(icon) = &self.icon {
            let source = project_dir.join(&icon.source);
            // A previously generated icon satisfies the build without its source.
            if !source.exists() && !project_dir.join(&icon.target).exists() {
                return Err(SpecError::IconSourceMissing(source));
            }
        }

        for data in &self.data {
            let source = project_dir.join(&data.source);
            if !source.exists() {
                return Err(SpecError::DataSourceMissing(source));
            }
        }

        for (i, module) in self.hidden_imports.iter().enumerate() {
            if self.hidden_imports[..i].contains(module) {
                return Err(SpecError::DuplicateModule(module.clone()));
            }
        }
        for (i, module) in self.excludes.iter().enumerate() {
            if self.excludes[..i].contains(module) {
                return Err(SpecError::DuplicateModule(module.clone()));
            }
        }
        for module in &self.hidden_imports {
            if self.excludes.contains(module) {
                return Err(SpecError::ConflictingModule(module.clone()));
            }
        }

        Ok(())
    }
}

impl Default for BundleSpec {
    fn default() -> Self {
        BundleSpec {
            name: "CrossTrans".to_string(),
            entry: "main.py".to_string(),
            icon: Some(IconSpec {
                source: "assets/icon.png".to_string(),
                target: "assets/icon.ico".to_string(),
            }),
            data: vec![DataDir {
                source: "resources".to_string(),
                dest: "resources".to_string(),
            }],
            hidden_imports: Vec::new(),
            excludes: Vec::new(),
            windowed: true,
            onefile: true,
            version_command: vec![
                "python".to_string(),
                "-c".to_string(),
                "from version import __version__; print(__version__)".to_string(),
            ],
            bundler_program: "pyinstaller".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn minimal_spec() -> BundleSpec {
        BundleSpec {
            name: "App".to_string(),
            entry: "main.py".to_string(),
            icon: None,
            data: Vec::new(),
            hidden_imports: Vec::new(),
            excludes: Vec::new(),
            windowed: true,
            onefile: true,
            version_command: vec!["python".to_string(), "version.py".to_string()],
            bundler_program: "pyinstaller".to_string(),
        }
    }

    #[test]
    fn load_from_json_string() {
        let json = r#"{
            "name": "CrossTrans",
            "entry": "main.py",
            "icon": {"source": "assets/icon.png", "target": "assets/icon.ico"},
            "data": [{"source": "resources", "dest": "resources"}],
            "hidden_imports": ["keyboard"],
            "excludes": ["tkinter"],
            "version_command": ["python", "-c", "print('x')"]
        }"#;

        let dir = tempdir().unwrap();
        let path = dir.path().join(SPEC_FILENAME);
        fs::write(&path, json).unwrap();

        let spec = BundleSpec::load(&path).unwrap();
        assert_eq!(spec.name, "CrossTrans");
        assert_eq!(spec.data.len(), 1);
        assert_eq!(spec.hidden_imports, vec!["keyboard".to_string()]);
        // Defaults applied for fields absent from the file
        assert!(spec.windowed);
        assert!(spec.onefile);
        assert_eq!(spec.bundler_program, "pyinstaller");
    }

    #[test]
    fn save_then_load_preserves_spec() {
        let spec = BundleSpec::default();
        let dir = tempdir().unwrap();
        let path = dir.path().join(SPEC_FILENAME);

        spec.save(&path).unwrap();
        let loaded = BundleSpec::load(&path).unwrap();

        assert_eq!(spec, loaded);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let result = BundleSpec::load(Path::new("/nonexistent/bundle.json"));
        assert!(result.is_err());
    }

    #[test]
    fn load_malformed_json_returns_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SPEC_FILENAME);
        fs::write(&path, "not valid json").unwrap();

        let result = BundleSpec::load(&path);
        assert!(result.is_err());
    }

    #[test]
    fn load_from_project_reports_missing_spec() {
        let dir = tempdir().unwrap();
        let result = BundleSpec::load_from_project(dir.path());
        assert!(matches!(result, Err(SpecError::NotFound(_))));
    }

    #[test]
    fn validate_accepts_complete_project() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.py"), "print('hi')").unwrap();

        let spec = minimal_spec();
        assert!(spec.validate(dir.path()).is_ok());
    }

    #[test]
    fn validate_rejects_empty_name() {
        let dir = tempdir().unwrap();
        let mut spec = minimal_spec();
        spec.name = "  ".to_string();

        let result = spec.validate(dir.path());
        assert!(matches!(result, Err(SpecError::EmptyName)));
    }

    #[test]
    fn validate_rejects_missing_entry() {
        let dir = tempdir().unwrap();
        let spec = minimal_spec();

        let result = spec.validate(dir.path());
        assert!(matches!(result, Err(SpecError::EntryMissing(_))));
    }

    #[test]
    fn validate_rejects_empty_version_command() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.py"), "").unwrap();
        let mut spec = minimal_spec();
        spec.version_command.clear();

        let result = spec.validate(dir.path());
        assert!(matches!(result, Err(SpecError::EmptyVersionCommand)));
    }

    #[test]
    fn validate_rejects_missing_data_source() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.py"), "").unwrap();
        let mut spec = minimal_spec();
        spec.data.push(DataDir {
            source: "resources".to_string(),
            dest: "resources".to_string(),
        });

        let result = spec.validate(dir.path());
        assert!(matches!(result, Err(SpecError::DataSourceMissing(_))));
    }

    #[test]
    fn validate_rejects_duplicate_module() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.py"), "").unwrap();
        let mut spec = minimal_spec();
        spec.hidden_imports = vec!["keyboard".to_string(), "keyboard".to_string()];

        let result = spec.validate(dir.path());
        assert!(matches!(result, Err(SpecError::DuplicateModule(_))));
    }

    #[test]
    fn validate_rejects_module_in_both_lists() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.py"), "").unwrap();
        let mut spec = minimal_spec();
        spec.hidden_imports = vec!["requests".to_string()];
        spec.excludes = vec!["requests".to_string()];

        let result = spec.validate(dir.path());
        assert!(matches!(result, Err(SpecError::ConflictingModule(_))));
    }

    #[test]
    fn validate_accepts_generated_icon_without_source() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.py"), "").unwrap();
        fs::write(dir.path().join("icon.ico"), "stub").unwrap();

        let mut spec = minimal_spec();
        spec.icon = Some(IconSpec {
            source: "icon.png".to_string(),
            target: "icon.ico".to_string(),
        });

        assert!(spec.validate(dir.path()).is_ok());
    }
}
