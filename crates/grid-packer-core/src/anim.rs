//! UV animation sheet assembly.

use tracing::{debug, instrument};

use crate::compositing::TileTransform;
use crate::config::AnimSpec;
use crate::error::{GridPackerError, Result};
use crate::grid::SlotGrid;
use crate::model::{PackSummary, PackedImage, SourceImage};
use crate::output::write_png_atomic;
use crate::packer::compose;
use crate::source::{list_files, load_images};

/// Lays `frames` into a `num_rows × num_rows` sheet without rotation.
///
/// Cell size is taken from the first frame; every later frame must match it.
/// `frames.len()` must equal `spec.frame_count`.
pub fn assemble_frames(frames: &[SourceImage], spec: &AnimSpec) -> Result<PackedImage> {
    spec.validate()?;
    let required = spec.frame_count as usize;
    if frames.len() < required {
        return Err(GridPackerError::InsufficientFrames {
            found: frames.len(),
            required,
        });
    }
    let frames = &frames[..required];
    let expected = frames[0].dimensions();
    for (index, frame) in frames.iter().enumerate().skip(1) {
        if frame.dimensions() != expected {
            return Err(GridPackerError::DimensionMismatch {
                index,
                expected,
                actual: frame.dimensions(),
            });
        }
    }
    let grid = SlotGrid::new(spec.num_rows(), expected.0, expected.1);
    Ok(compose(frames, &grid, TileTransform::Identity))
}

/// Reads up to `frame_count` files from the source folder, assembles the
/// sheet and writes it to `source_folder/output_name`.
///
/// The frame count is validated before touching the filesystem. Files past
/// `frame_count` are ignored; the output file itself is never read as a frame.
#[instrument(skip_all, fields(folder = %spec.source_folder.display(), frames = spec.frame_count))]
pub fn assemble_sheet(spec: &AnimSpec) -> Result<PackSummary> {
    spec.validate()?;
    let output_path = spec.output_path();
    let required = spec.frame_count as usize;

    let mut paths = list_files(&spec.source_folder, spec.sort_order)?;
    paths.retain(|p| p.file_name() != output_path.file_name());
    if paths.len() < required {
        return Err(GridPackerError::InsufficientFrames {
            found: paths.len(),
            required,
        });
    }
    if paths.len() > required {
        debug!(ignored = paths.len() - required, "extra files beyond frame count");
        paths.truncate(required);
    }

    let frames = load_images(&paths)?;
    let packed = assemble_frames(&frames, spec)?;
    write_png_atomic(&packed.rgba, &output_path)?;
    Ok(PackSummary::new(&output_path, packed.layout))
}
