use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use tracing::info;

use crate::error::{GridPackerError, Result};

/// Encodes `rgba` as PNG and atomically replaces `path` with it.
///
/// The image is written to a temporary file in the destination directory and
/// renamed over `path`, so an existing file is either fully replaced or left
/// untouched.
pub fn write_png_atomic(rgba: &RgbaImage, path: &Path) -> Result<()> {
    let write_err = |source: std::io::Error| GridPackerError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".grid-packer-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_err)?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        rgba.write_to(&mut w, ImageFormat::Png)
            .map_err(|e| write_err(std::io::Error::other(e)))?;
        w.flush().map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    info!(path = %path.display(), w = rgba.width(), h = rgba.height(), "wrote image");
    Ok(())
}
