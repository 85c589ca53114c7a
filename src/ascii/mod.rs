//! Terminal grid renderer for decoded images.
//!
//! This module turns a [`PixelImage`](crate::raster::PixelImage) into the
//! text frame streamed back to clients:
//!
//! 1. **Geometry** - fixed 100-column grid, rows derived from the aspect ratio
//!    with a 2:1 terminal cell correction
//! 2. **Downsampling** - nearest-neighbor strides, one source pixel per cell
//! 3. **Sampling** - each pixel becomes a shade glyph or a truecolor block,
//!    depending on the connection's [`RenderMode`]
//!
//! Every row ends with an SGR reset and a newline.

mod charset;
mod dimensions;
mod grid;
mod lightness;
mod mode;
mod sampler;

pub use charset::{blank, densest, FULL_BLOCK, RESET, SHADE_RAMP};
pub use dimensions::{
    calculate_geometry, calculate_geometry_with_aspect, GridGeometry, DEFAULT_CHAR_ASPECT_RATIO,
    TARGET_WIDTH,
};
pub use grid::{render_grid, render_grid_with, Grid, RenderError};
pub use lightness::{lightness, normalize, shade_level, CHANNEL_MAX};
pub use mode::RenderMode;
pub use sampler::{sample_shade, sample_truecolor, shade_glyph, to_rgb8, SampleFn};
