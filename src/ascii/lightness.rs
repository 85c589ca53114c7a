//! Perceptual lightness using the ITU-R BT.709 luma coefficients.

/// Largest raw channel value produced by [`crate::raster::PixelImage`].
pub const CHANNEL_MAX: f64 = u16::MAX as f64;

/// Normalize a raw 16-bit channel to [0, 1].
#[inline]
pub fn normalize(channel: u16) -> f64 {
    channel as f64 / CHANNEL_MAX
}

/// Compute perceptual lightness of an RGB triple.
///
/// The formula is: L = 0.2126*R + 0.7152*G + 0.0722*B
/// with every channel normalized to [0, 1] first, so L is in [0, 1].
pub fn lightness(rgb: [u16; 3]) -> f64 {
    let [r, g, b] = rgb;
    0.2126 * normalize(r) + 0.7152 * normalize(g) + 0.0722 * normalize(b)
}

/// Quantize a lightness value to an index into a ramp of `levels` glyphs.
///
/// Uses `floor(L * levels) - 1`, clamped to `[0, levels - 1]`. The `-1`
/// keeps everything up to the first quartile on the blank glyph.
pub fn shade_level(lightness: f64, levels: usize) -> usize {
    if levels == 0 {
        return 0;
    }
    let raw = (lightness * levels as f64).floor() as i64 - 1;
    raw.clamp(0, levels as i64 - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lightness_black_and_white() {
        assert_eq!(lightness([0, 0, 0]), 0.0);
        assert_eq!(lightness([u16::MAX, u16::MAX, u16::MAX]), 1.0);
    }

    #[test]
    fn test_lightness_green_dominates() {
        let red = lightness([u16::MAX, 0, 0]);
        let green = lightness([0, u16::MAX, 0]);
        let blue = lightness([0, 0, u16::MAX]);
        assert!(green > red);
        assert!(red > blue);
    }

    #[test]
    fn test_shade_level_bias() {
        // Everything below 0.5 stays blank because of the -1 bias
        assert_eq!(shade_level(0.0, 4), 0);
        assert_eq!(shade_level(0.26, 4), 0);
        assert_eq!(shade_level(0.49, 4), 0);
        assert_eq!(shade_level(0.5, 4), 1);
        assert_eq!(shade_level(0.75, 4), 2);
        assert_eq!(shade_level(1.0, 4), 3);
    }

    #[test]
    fn test_shade_level_clamps() {
        assert_eq!(shade_level(-3.0, 4), 0);
        assert_eq!(shade_level(7.0, 4), 3);
        assert_eq!(shade_level(0.5, 0), 0);
    }
}
