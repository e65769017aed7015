//! Application icon preparation.
//!
//! Converts the source PNG into a multi-resolution ICO file. An existing
//! icon file is left untouched, so a hand-tuned icon survives rebuilds.

use image::imageops::FilterType;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Square pixel sizes embedded in the generated icon.
pub const ICON_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

/// Errors from icon preparation.
#[derive(Debug)]
pub enum IconError {
    /// Failed to open or decode the source image.
    ReadImage { path: PathBuf, source: image::ImageError },
    /// Failed to encode an icon entry.
    Encode(io::Error),
    /// Failed to write the icon file.
    Write { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for IconError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IconError::ReadImage { path, source } => {
                write!(f, "failed to read image {}: {}", path.display(), source)
            }
            IconError::Encode(e) => write!(f, "failed to encode icon entry: {}", e),
            IconError::Write { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for IconError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IconError::ReadImage { source, .. } => Some(source),
            IconError::Encode(e) => Some(e),
            IconError::Write { source, .. } => Some(source),
        }
    }
}

/// Result of an icon preparation run.
#[derive(Debug, PartialEq, Eq)]
pub enum IconOutcome {
    /// The icon was generated from the source image.
    Created,
    /// The target already exists and was not touched.
    AlreadyExists,
}

/// Generate a multi-resolution icon from a source PNG.
///
/// Does nothing if `target` already exists.
pub fn run(source: &Path, target: &Path) -> Result<IconOutcome, IconError> {
    if target.exists() {
        return Ok(IconOutcome::AlreadyExists);
    }

    let img = image::open(source).map_err(|e| IconError::ReadImage {
        path: source.to_path_buf(),
        source: e,
    })?;

    let mut icon_dir = ico::IconDir::new(ico::ResourceType::Icon);
    for &size in &ICON_SIZES {
        let resized = img.resize_exact(size, size, FilterType::Lanczos3).to_rgba8();
        let entry_image = ico::IconImage::from_rgba_data(size, size, resized.into_raw());
        let entry = ico::IconDirEntry::encode(&entry_image).map_err(IconError::Encode)?;
        icon_dir.add_entry(entry);
    }

    let file = File::create(target).map_err(|e| IconError::Write {
        path: target.to_path_buf(),
        source: e,
    })?;
    icon_dir.write(file).map_err(|e| IconError::Write {
        path: target.to_path_buf(),
        source: e,
    })?;

    Ok(IconOutcome::Created)
}
