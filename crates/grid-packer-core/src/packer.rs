//! Grid atlas packer: equal square tiles into a fixed square atlas.

use std::path::Path;

use image::RgbaImage;
use tracing::{debug, instrument};

use crate::compositing::{TileTransform, blit_tile};
use crate::config::{AtlasSpec, SortOrder};
use crate::error::{GridPackerError, Result};
use crate::grid::SlotGrid;
use crate::model::{GridLayout, PackSummary, PackedImage, Slot, SourceImage};
use crate::output::write_png_atomic;
use crate::source::{list_files, load_images, resolve_path};

/// Packs `images` into one `atlas_size × atlas_size` RGBA atlas.
///
/// Slot `i` sits at `row = i / n`, `col = i % n` with `n = atlas_size / element_size`,
/// and each tile is written with [`TileTransform::QuarterTurn`]. Unused slots stay
/// fully transparent.
///
/// Errors:
/// - `InvalidConfig` when `spec` breaks its size invariants
/// - `CapacityExceeded` when there are more images than slots
/// - `DimensionMismatch` for the first image that is not `element_size` square
pub fn pack_grid(images: &[SourceImage], spec: &AtlasSpec) -> Result<PackedImage> {
    spec.validate()?;
    let capacity = spec.capacity();
    if images.len() > capacity {
        return Err(GridPackerError::CapacityExceeded {
            provided: images.len(),
            capacity,
        });
    }
    let expected = (spec.element_size, spec.element_size);
    for (index, img) in images.iter().enumerate() {
        if img.dimensions() != expected {
            return Err(GridPackerError::DimensionMismatch {
                index,
                expected,
                actual: img.dimensions(),
            });
        }
    }
    let grid = SlotGrid::new(spec.slots_per_side(), spec.element_size, spec.element_size);
    Ok(compose(images, &grid, TileTransform::QuarterTurn))
}

/// Packs `images` and writes the atlas atomically to `spec.output_path`.
///
/// Nothing is written when validation fails.
#[instrument(skip_all, fields(out = %spec.output_path.display(), n = images.len()))]
pub fn pack_to_file(images: &[SourceImage], spec: &AtlasSpec) -> Result<PackSummary> {
    let packed = pack_grid(images, spec)?;
    write_png_atomic(&packed.rgba, &spec.output_path)?;
    Ok(PackSummary::new(&spec.output_path, packed.layout))
}

/// Loads every file in `folder` as a tile and packs them into one atlas.
#[instrument(skip_all, fields(folder = %folder.display()))]
pub fn pack_folder(folder: &Path, spec: &AtlasSpec, sort: SortOrder) -> Result<PackSummary> {
    spec.validate()?;
    let mut paths = list_files(folder, sort)?;
    // a previous atlas written into the same folder is not a tile
    let output = resolve_path(&spec.output_path);
    paths.retain(|p| resolve_path(p) != output);
    if paths.len() > spec.capacity() {
        return Err(GridPackerError::CapacityExceeded {
            provided: paths.len(),
            capacity: spec.capacity(),
        });
    }
    let images = load_images(&paths)?;
    pack_to_file(&images, spec)
}

/// Composes `images` into a fresh canvas sized by `grid`. Callers have
/// already checked capacity and tile sizes.
pub(crate) fn compose(images: &[SourceImage], grid: &SlotGrid, transform: TileTransform) -> PackedImage {
    let (width, height) = grid.dimensions();
    let mut canvas = RgbaImage::new(width, height);
    let mut slots = Vec::with_capacity(images.len());
    for (index, img) in images.iter().enumerate() {
        let frame = grid.slot_rect(index);
        let (row, col) = grid.cell(index);
        blit_tile(&img.rgba, &mut canvas, frame.x, frame.y, transform);
        debug!(index, row, col, key = %img.key, "placed");
        slots.push(Slot {
            index,
            key: img.key.clone(),
            row,
            col,
            frame,
            rotated: transform == TileTransform::QuarterTurn,
        });
    }
    PackedImage {
        layout: GridLayout {
            width,
            height,
            cell_width: grid.cell_width,
            cell_height: grid.cell_height,
            slots_per_side: grid.slots_per_side,
            slots,
        },
        rgba: canvas,
    }
}
