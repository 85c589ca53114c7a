//! Line-oriented TCP image service.
//!
//! The [`Server`] accepts connections and runs one [`Session`] per client.
//! Clients send one request per line:
//!
//! - `color` switches the connection to truecolor blocks (the default)
//! - `bw` switches it to shade glyphs
//! - anything else is fetched as an image URL and rendered as a grid
//!
//! Mode changes only affect the connection that sent them.

mod listener;
mod protocol;
mod session;

pub use listener::{Server, ServerError};
pub use protocol::{
    Request, DECODE_FAILED, FETCH_FAILED, LINE_TOO_LONG, RENDER_FAILED, WELCOME,
};
pub use session::{Session, SessionError, SessionLimits};
