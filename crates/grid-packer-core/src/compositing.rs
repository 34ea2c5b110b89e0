use image::RgbaImage;

/// Pixel transform applied while copying a tile into its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileTransform {
    /// `canvas(dx + x, dy + y) = src(x, y)`.
    Identity,
    /// Quarter turn for square tiles of side `n`:
    /// `canvas(dx + x, dy + y) = src(n - 1 - y, x)`.
    QuarterTurn,
}

/// Blit `src` into `canvas` with its top-left corner at (dx, dy).
///
/// Pixels that would land outside the canvas are skipped; callers size the
/// canvas so that never happens for valid slots. `QuarterTurn` expects a
/// square `src`.
pub fn blit_tile(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, transform: TileTransform) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();

    match transform {
        TileTransform::Identity => {
            for y in 0..sh {
                for x in 0..sw {
                    if dx + x < cw && dy + y < ch {
                        canvas.put_pixel(dx + x, dy + y, *src.get_pixel(x, y));
                    }
                }
            }
        }
        TileTransform::QuarterTurn => {
            let n = sw.min(sh);
            for y in 0..n {
                for x in 0..n {
                    if dx + x < cw && dy + y < ch {
                        canvas.put_pixel(dx + x, dy + y, *src.get_pixel(n - 1 - y, x));
                    }
                }
            }
        }
    }
}
