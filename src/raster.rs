//! Decoded raster images.
//!
//! Wraps the `image` crate behind a small [`PixelImage`] type with a 16-bit
//! RGB accessor. Alpha is dropped at decode time; only R, G and B are sampled.

use image::{ImageBuffer, ImageFormat, Rgb};

/// Errors that can occur when decoding image bytes.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("no image data")]
    EmptyInput,

    #[error("unsupported or corrupt image: {0}")]
    Image(#[from] image::ImageError),
}

/// An immutable decoded image with 16 bits per RGB channel.
#[derive(Debug, Clone)]
pub struct PixelImage {
    pixels: ImageBuffer<Rgb<u16>, Vec<u16>>,
    format: Option<ImageFormat>,
}

impl PixelImage {
    /// Build an image by evaluating `f` at every coordinate.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> [u16; 3],
    {
        Self {
            pixels: ImageBuffer::from_fn(width, height, |x, y| Rgb(f(x, y))),
            format: None,
        }
    }

    /// Build an image filled with a single color.
    pub fn uniform(width: u32, height: u32, rgb: [u16; 3]) -> Self {
        Self {
            pixels: ImageBuffer::from_pixel(width, height, Rgb(rgb)),
            format: None,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Raw channel values (0-65535) at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn rgb(&self, x: u32, y: u32) -> [u16; 3] {
        self.pixels.get_pixel(x, y).0
    }

    /// Container format the image was decoded from, if known.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }
}

/// Decode PNG, JPEG or WebP bytes into a [`PixelImage`].
///
/// The format is detected from the data itself, not from any URL or header.
/// 8-bit sources are widened so that `v` becomes `v * 257`.
///
/// # Errors
/// Returns `DecodeError::EmptyInput` for an empty buffer and
/// `DecodeError::Image` when the bytes are not a supported image.
pub fn decode(bytes: &[u8]) -> Result<PixelImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let format = image::guess_format(bytes).ok();
    let decoded = image::load_from_memory(bytes)?;

    Ok(PixelImage {
        pixels: decoded.into_rgb16(),
        format,
    })
}
