//! Glyph and escape-sequence definitions for grid rendering.

/// Monochrome shade ramp (4 levels).
/// Characters ordered from least to most intense.
pub const SHADE_RAMP: &[char] = &[' ', '░', '▒', '▓'];

/// Solid block drawn in the active foreground color in truecolor mode.
pub const FULL_BLOCK: char = '█';

/// SGR sequence that resets all formatting. Emitted once at the end of every row.
pub const RESET: &str = "\x1b[0m";

/// Blank glyph (lowest shade level).
pub fn blank() -> char {
    SHADE_RAMP[0]
}

/// Densest glyph (highest shade level).
pub fn densest() -> char {
    SHADE_RAMP[SHADE_RAMP.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_has_four_levels() {
        assert_eq!(SHADE_RAMP.len(), 4);
        assert_eq!(blank(), ' ');
        assert_eq!(densest(), '▓');
    }

    #[test]
    fn test_reset_is_sgr_zero() {
        assert_eq!(RESET.as_bytes(), b"\x1b[0m");
    }
}
