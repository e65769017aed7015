use crate::commands::bundle::BundlerError;
use crate::commands::finalize::FinalizeError;
use crate::commands::icon::IconError;
use crate::commands::version::VersionError;
use crate::spec::SpecError;
use std::fmt;

/// Errors from the release pipeline, one variant per stage.
#[derive(Debug)]
pub enum ReleaseError {
    Spec(SpecError),
    Icon(IconError),
    Version(VersionError),
    Bundler(BundlerError),
    Finalize(FinalizeError),
}

impl ReleaseError {
    /// Process exit code for this failure. Each stage maps to a distinct
    /// code so CI can tell failure kinds apart.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::Spec(_) => 2,
            ReleaseError::Icon(_) => 3,
            ReleaseError::Version(_) => 4,
            ReleaseError::Bundler(_) => 5,
            ReleaseError::Finalize(_) => 6,
        }
    }
}

impl fmt::Display for ReleaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseError::Spec(e) => write!(f, "bundle spec error: {}", e),
            ReleaseError::Icon(e) => write!(f, "icon preparation failed: {}", e),
            ReleaseError::Version(e) => write!(f, "version extraction failed: {}", e),
            ReleaseError::Bundler(e) => write!(f, "bundler failed: {}", e),
            ReleaseError::Finalize(e) => write!(f, "finalization failed: {}", e),
        }
    }
}

impl std::error::Error for ReleaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReleaseError::Spec(e) => Some(e),
            ReleaseError::Icon(e) => Some(e),
            ReleaseError::Version(e) => Some(e),
            ReleaseError::Bundler(e) => Some(e),
            ReleaseError::Finalize(e) => Some(e),
        }
    }
}
