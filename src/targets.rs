//! Artifact layout and naming for bundler outputs.

/// Directory the bundler writes finished artifacts to
pub const DIST_DIR: &str = "dist";
/// Intermediate working directory created by the bundler
pub const BUILD_DIR: &str = "build";

/// Executable suffix on the current platform.
pub fn artifact_suffix() -> &'static str {
    if cfg!(target_os = "windows") {
        ".exe"
    } else {
        ""
    }
}

/// Name of the fresh bundler output for an app.
pub fn artifact_name(name: &str) -> String {
    format!("{}{}", name, artifact_suffix())
}

/// Name of the finalized artifact with the version stamped in.
pub fn versioned_artifact_name(name: &str, version: &str) -> String {
    format!("{}_v{}{}", name, version, artifact_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_name_uses_platform_suffix() {
        let name = artifact_name("CrossTrans");
        if cfg!(target_os = "windows") {
            assert_eq!(name, "CrossTrans.exe");
        } else {
            assert_eq!(name, "CrossTrans");
        }
    }

    #[test]
    fn versioned_name_embeds_version() {
        let name = versioned_artifact_name("CrossTrans", "2.1.0");
        if cfg!(target_os = "windows") {
            assert_eq!(name, "CrossTrans_v2.1.0.exe");
        } else {
            assert_eq!(name, "CrossTrans_v2.1.0");
        }
    }
}
