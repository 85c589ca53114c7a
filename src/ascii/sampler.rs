//! Pixel sampling: one source pixel to one terminal cell.

use std::fmt::Write;

use super::charset::{FULL_BLOCK, SHADE_RAMP};
use super::lightness::{lightness, normalize, shade_level};
use crate::raster::PixelImage;

/// Signature shared by every cell sampler.
///
/// Appends exactly one cell's worth of output for the pixel at `(x, y)`.
/// Callers guarantee the coordinates are in bounds.
pub type SampleFn = fn(&PixelImage, u32, u32, &mut String);

/// Append the shade-ramp glyph for the pixel at `(x, y)`.
pub fn sample_shade(image: &PixelImage, x: u32, y: u32, out: &mut String) {
    out.push(shade_glyph(image.rgb(x, y)));
}

/// Append a 24-bit foreground escape and a full block for the pixel at `(x, y)`.
///
/// No reset is written here; the grid renderer resets once per row.
pub fn sample_truecolor(image: &PixelImage, x: u32, y: u32, out: &mut String) {
    let [r, g, b] = to_rgb8(image.rgb(x, y));
    // Writing into a String cannot fail
    let _ = write!(out, "\x1b[38;2;{};{};{}m{}", r, g, b, FULL_BLOCK);
}

/// Shade glyph for an RGB triple.
pub fn shade_glyph(rgb: [u16; 3]) -> char {
    SHADE_RAMP[shade_level(lightness(rgb), SHADE_RAMP.len())]
}

/// Scale 16-bit channels to 0-255, truncating.
pub fn to_rgb8(rgb: [u16; 3]) -> [u8; 3] {
    rgb.map(|c| (normalize(c) * 255.0) as u8)
}
