//! Image source: directory listing and decoding into [`SourceImage`]s.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageError, ImageReader};
use tracing::trace;
use walkdir::WalkDir;

use crate::config::SortOrder;
use crate::error::{GridPackerError, Result};
use crate::model::SourceImage;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Decodes `path` into an RGBA source image keyed by its path.
pub fn load_image(path: &Path) -> Result<SourceImage> {
    let decode_err = |source: ImageError| GridPackerError::ImageDecode {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;
    trace!(path = %path.display(), w = img.width(), h = img.height(), "decoded");
    let key = path.to_string_lossy().replace('\\', "/");
    Ok(SourceImage::new(key, img.to_rgba8()))
}

/// Decodes every path, preserving order. Any failure aborts the batch.
pub fn load_images(paths: &[PathBuf]) -> Result<Vec<SourceImage>> {
    #[cfg(feature = "parallel")]
    {
        paths.par_iter().map(|p| load_image(p)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        paths.iter().map(|p| load_image(p)).collect()
    }
}

/// Regular files directly inside `dir`.
pub fn list_files(dir: &Path, sort: SortOrder) -> Result<Vec<PathBuf>> {
    list_entries(dir, sort, |p| p.is_file())
}

/// Subdirectories directly inside `dir`.
pub fn list_dirs(dir: &Path, sort: SortOrder) -> Result<Vec<PathBuf>> {
    list_entries(dir, sort, |p| p.is_dir())
}

fn list_entries(dir: &Path, sort: SortOrder, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(GridPackerError::PathNotFound {
            path: dir.to_path_buf(),
        });
    }
    let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1);
    if sort == SortOrder::NameAsc {
        walker = walker.sort_by_file_name();
    }
    let mut list = Vec::new();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if keep(entry.path()) {
            list.push(entry.into_path());
        }
    }
    Ok(list)
}

/// Absolute form of `path` for identity checks.
///
/// Existing paths are canonicalized. A path that does not exist yet resolves
/// through its parent directory; if that fails too, `path` is returned as is.
pub(crate) fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(p) = fs::canonicalize(path) {
        return p;
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// File name of `p` as UTF-8, if it has one.
pub(crate) fn file_name(p: &Path) -> Option<&str> {
    p.file_name().and_then(|s| s.to_str())
}
