//! Grid rendering: downsample a decoded image into a text frame.

use super::charset::RESET;
use super::dimensions::{calculate_geometry, GridGeometry};
use super::mode::RenderMode;
use super::sampler::SampleFn;
use crate::raster::PixelImage;

/// Errors that can occur while rendering a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("image has zero width")]
    ZeroWidth,
}

/// A fully rendered frame, ready to be written to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    text: String,
    geometry: GridGeometry,
}

impl Grid {
    /// The rendered payload: every row followed by a reset and a newline.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the grid and return its payload.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Geometry the grid was rendered with.
    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    /// Number of rows in the grid.
    pub fn rows(&self) -> u32 {
        self.geometry.target_height
    }

    /// Number of cells in every row.
    pub fn columns(&self) -> u32 {
        self.geometry.target_width
    }

    /// Returns true if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.geometry.target_height == 0
    }
}

/// Render an image into a grid using the sampler for `mode`.
///
/// # Errors
/// Returns `RenderError::ZeroWidth` for images without columns.
pub fn render_grid(image: &PixelImage, mode: RenderMode) -> Result<Grid, RenderError> {
    render_grid_with(image, mode.sampler())
}

/// Render an image into a grid with an explicit cell sampler.
///
/// Walks the image with nearest-neighbor strides: cell `(col, row)` is the
/// pixel at `(col * x_stride, row * y_stride)`. No averaging is done.
pub fn render_grid_with(image: &PixelImage, sample: SampleFn) -> Result<Grid, RenderError> {
    let geometry = calculate_geometry(image.width(), image.height())?;

    // Rough upper bound for truecolor cells ("\x1b[38;2;255;255;255m█" is 22 bytes)
    let row_capacity = geometry.target_width as usize * 22 + RESET.len() + 1;
    let mut text = String::with_capacity(row_capacity * geometry.target_height as usize);

    for row in 0..geometry.target_height {
        for col in 0..geometry.target_width {
            let (x, y) = geometry.source_pixel(col, row);
            sample(image, x, y, &mut text);
        }
        text.push_str(RESET);
        text.push('\n');
    }

    Ok(Grid { text, geometry })
}
