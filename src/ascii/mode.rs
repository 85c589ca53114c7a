//! Per-connection rendering mode.

use super::sampler::{sample_shade, sample_truecolor, SampleFn};

/// Output style for rendered grids.
///
/// Each connection holds exactly one of these and switches it with the
/// `color` / `bw` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Single-glyph grayscale from the shade ramp
    Monochrome,
    /// 24-bit foreground color escape followed by a solid block
    #[default]
    TrueColor,
}

impl RenderMode {
    /// Parse a mode-switch command token.
    ///
    /// Only the exact literals `color` and `bw` are recognized; anything else
    /// is not a mode command.
    pub fn from_command(token: &str) -> Option<Self> {
        match token {
            "color" => Some(RenderMode::TrueColor),
            "bw" => Some(RenderMode::Monochrome),
            _ => None,
        }
    }

    /// The command token that selects this mode.
    pub fn command(&self) -> &'static str {
        match self {
            RenderMode::TrueColor => "color",
            RenderMode::Monochrome => "bw",
        }
    }

    /// Line sent back to the client after switching to this mode.
    pub fn confirmation(&self) -> &'static str {
        match self {
            RenderMode::TrueColor => "Using RGB.\n",
            RenderMode::Monochrome => "Using BW.\n",
        }
    }

    /// Cell sampler for this mode.
    pub fn sampler(&self) -> SampleFn {
        match self {
            RenderMode::Monochrome => sample_shade,
            RenderMode::TrueColor => sample_truecolor,
        }
    }

    /// Get a human-readable name for the mode.
    pub fn name(&self) -> &'static str {
        match self {
            RenderMode::Monochrome => "monochrome",
            RenderMode::TrueColor => "truecolor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_truecolor() {
        assert_eq!(RenderMode::default(), RenderMode::TrueColor);
    }

    #[test]
    fn test_from_command_exact_tokens() {
        assert_eq!(RenderMode::from_command("color"), Some(RenderMode::TrueColor));
        assert_eq!(RenderMode::from_command("bw"), Some(RenderMode::Monochrome));
        assert_eq!(RenderMode::from_command("BW"), None);
        assert_eq!(RenderMode::from_command("colour"), None);
        assert_eq!(RenderMode::from_command(""), None);
    }

    #[test]
    fn test_command_round_trips() {
        for mode in [RenderMode::Monochrome, RenderMode::TrueColor] {
            assert_eq!(RenderMode::from_command(mode.command()), Some(mode));
        }
    }

    #[test]
    fn test_confirmation_lines() {
        assert_eq!(RenderMode::TrueColor.confirmation(), "Using RGB.\n");
        assert_eq!(RenderMode::Monochrome.confirmation(), "Using BW.\n");
    }
}
