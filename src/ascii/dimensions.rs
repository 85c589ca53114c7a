//! Grid geometry for aspect-corrected nearest-neighbor rendering.

use super::grid::RenderError;

/// Fixed output width in cells.
pub const TARGET_WIDTH: u32 = 100;

/// Default terminal character aspect ratio.
/// Terminal characters are typically ~2x taller than wide, so the row count
/// is divided by this to keep the picture's proportions.
pub const DEFAULT_CHAR_ASPECT_RATIO: f64 = 2.0;

/// Output grid size and the pixel strides used to walk the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    /// Cells per row
    pub target_width: u32,
    /// Number of rows (may be 0 for very wide images)
    pub target_height: u32,
    /// Source pixels skipped per column
    pub x_stride: u32,
    /// Source pixels skipped per row (0 when there are no rows)
    pub y_stride: u32,
}

impl GridGeometry {
    /// Total number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.target_width as usize * self.target_height as usize
    }

    /// Source pixel sampled for grid cell `(col, row)`.
    #[inline]
    pub fn source_pixel(&self, col: u32, row: u32) -> (u32, u32) {
        (col * self.x_stride, row * self.y_stride)
    }
}

/// Calculate the grid geometry for an image at the fixed target width.
///
/// `target_height = floor(height / width / 2.0 * target_width)`.
///
/// # Errors
/// Returns `RenderError::ZeroWidth` when `img_width` is 0.
///
/// # Example
/// ```ignore
/// let geometry = calculate_geometry(200, 100)?;
/// assert_eq!(geometry.target_height, 25);
/// ```
pub fn calculate_geometry(img_width: u32, img_height: u32) -> Result<GridGeometry, RenderError> {
    calculate_geometry_with_aspect(img_width, img_height, TARGET_WIDTH, DEFAULT_CHAR_ASPECT_RATIO)
}

/// Calculate the grid geometry with a custom target width and character aspect ratio.
pub fn calculate_geometry_with_aspect(
    img_width: u32,
    img_height: u32,
    target_width: u32,
    char_aspect: f64,
) -> Result<GridGeometry, RenderError> {
    if img_width == 0 {
        return Err(RenderError::ZeroWidth);
    }

    let target_height =
        (img_height as f64 / img_width as f64 / char_aspect * target_width as f64) as u32;

    let x_stride = if target_width > 0 { img_width / target_width } else { 0 };
    let y_stride = if target_height > 0 { img_height / target_height } else { 0 };

    Ok(GridGeometry {
        target_width,
        target_height,
        x_stride,
        y_stride,
    })
}
