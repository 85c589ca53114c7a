//! Line protocol: request grammar and fixed server messages.

use crate::ascii::RenderMode;

/// Sent once when a client connects.
pub const WELCOME: &str =
    "Welcome! Paste an image URL to view. Commands 'color' and 'bw' can be used to alter the output.\n";

/// Sent before closing when the image could not be retrieved.
pub const FETCH_FAILED: &str = "Could not fetch that URL.\n";

/// Sent before closing when the bytes were not a supported image.
pub const DECODE_FAILED: &str = "Could not decode that image.\n";

/// Sent before closing when the image could not be turned into a grid.
pub const RENDER_FAILED: &str = "Could not render that image.\n";

/// Sent before closing when a request line exceeds the configured limit.
pub const LINE_TOO_LONG: &str = "Request line too long.\n";

/// One parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `color` or `bw`
    SetMode(RenderMode),
    /// Anything else, taken verbatim as an image URL
    Render(String),
}

impl Request {
    /// Parse a raw line. Surrounding whitespace (including the newline) is trimmed.
    ///
    /// # Example
    /// ```ignore
    /// assert_eq!(Request::parse("bw\r\n"), Request::SetMode(RenderMode::Monochrome));
    /// ```
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match RenderMode::from_command(trimmed) {
            Some(mode) => Request::SetMode(mode),
            None => Request::Render(trimmed.to_string()),
        }
    }
}
