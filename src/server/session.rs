//! Connection session: the per-client protocol loop.
//!
//! A session owns its stream and exactly one piece of state, the current
//! [`RenderMode`]. It reads one request line at a time, switches mode or runs
//! the fetch -> decode -> render pipeline, and writes the result back in
//! request order. Any pipeline failure is reported with a single line and
//! ends the session.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufStream};

use super::protocol::{
    Request, DECODE_FAILED, FETCH_FAILED, LINE_TOO_LONG, RENDER_FAILED, WELCOME,
};
use crate::ascii::{render_grid, Grid, RenderError, RenderMode};
use crate::config::{ServerConfig, DEFAULT_MAX_LINE_BYTES};
use crate::fetch::{FetchError, ImageFetcher};
use crate::raster::{decode, DecodeError};

/// Input limits applied to every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Longest accepted request line in bytes, newline excluded
    pub max_line_bytes: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

impl From<&ServerConfig> for SessionLimits {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_line_bytes: config.max_line_bytes,
        }
    }
}

/// Errors that end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("request line longer than {limit} bytes")]
    LineTooLong { limit: usize },

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("render worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl SessionError {
    /// Line to send the client before closing, if the client can still hear us.
    pub fn client_message(&self) -> Option<&'static str> {
        match self {
            SessionError::Read(_) | SessionError::Write(_) => None,
            SessionError::LineTooLong { .. } => Some(LINE_TOO_LONG),
            SessionError::Fetch(_) => Some(FETCH_FAILED),
            SessionError::Decode(_) => Some(DECODE_FAILED),
            SessionError::Render(_) | SessionError::Worker(_) => Some(RENDER_FAILED),
        }
    }
}

/// Server-side state for one client connection.
pub struct Session<S> {
    stream: BufStream<S>,
    mode: RenderMode,
    fetcher: ImageFetcher,
    limits: SessionLimits,
    peer: String,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a freshly accepted stream. The mode starts as TrueColor.
    pub fn new(stream: S, peer: impl Into<String>, fetcher: ImageFetcher, limits: SessionLimits) -> Self {
        Self {
            stream: BufStream::new(stream),
            mode: RenderMode::default(),
            fetcher,
            limits,
            peer: peer.into(),
        }
    }

    /// Current rendering mode.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Peer label used in log lines.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Drive the session until the peer disconnects or a request fails.
    ///
    /// Returns `Ok(())` on a clean end-of-stream. On failure the matching
    /// client message (if any) has already been written when this returns.
    pub async fn run(mut self) -> Result<(), SessionError> {
        let result = match self.send(WELCOME).await {
            Ok(()) => self.serve().await,
            Err(e) => Err(e),
        };

        let message = result.as_ref().err().and_then(SessionError::client_message);
        if let Some(message) = message {
            if let Err(write_err) = self.send(message).await {
                log::debug!("[{}] could not report failure: {}", self.peer, write_err);
            }
        }

        // The peer may already be gone
        let _ = self.stream.shutdown().await;
        result
    }

    async fn serve(&mut self) -> Result<(), SessionError> {
        while let Some(line) = self.read_request_line().await? {
            match Request::parse(&line) {
                Request::SetMode(mode) => {
                    log::debug!("[{}] mode -> {}", self.peer, mode.name());
                    self.mode = mode;
                    self.send(mode.confirmation()).await?;
                }
                Request::Render(url) => {
                    let grid = self.render_url(&url).await?;
                    self.send(grid.as_str()).await?;
                }
            }
        }
        log::debug!("[{}] end of stream", self.peer);
        Ok(())
    }

    /// Fetch, decode and render one image with the current mode.
    pub async fn render_url(&self, url: &str) -> Result<Grid, SessionError> {
        log::debug!("[{}] fetching {}", self.peer, url);
        let bytes = self.fetcher.fetch(url).await?;
        log::debug!("[{}] fetched {} bytes", self.peer, bytes.len());

        let mode = self.mode;
        let peer = self.peer.clone();
        let grid = tokio::task::spawn_blocking(move || -> Result<Grid, SessionError> {
            let image = decode(&bytes)?;
            log::debug!(
                "[{}] decoded {}x{} {:?}",
                peer,
                image.width(),
                image.height(),
                image.format()
            );
            Ok(render_grid(&image, mode)?)
        })
        .await??;

        log::debug!(
            "[{}] rendered {}x{} grid ({})",
            self.peer,
            grid.columns(),
            grid.rows(),
            mode.name()
        );
        Ok(grid)
    }

    /// Read one newline-terminated line.
    ///
    /// Returns `Ok(None)` at end of stream, including when the stream ends
    /// in the middle of a line.
    async fn read_request_line(&mut self) -> Result<Option<String>, SessionError> {
        let limit = self.limits.max_line_bytes;
        let mut buf = Vec::new();

        let read = (&mut self.stream)
            .take(limit as u64 + 1)
            .read_until(b'\n', &mut buf)
            .await
            .map_err(SessionError::Read)?;

        if read == 0 {
            return Ok(None);
        }

        if buf.last() != Some(&b'\n') {
            if buf.len() > limit {
                return Err(SessionError::LineTooLong { limit });
            }
            log::debug!("[{}] stream ended mid-line, dropping {} bytes", self.peer, buf.len());
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    async fn send(&mut self, text: &str) -> Result<(), SessionError> {
        self.stream
            .write_all(text.as_bytes())
            .await
            .map_err(SessionError::Write)?;
        self.stream.flush().await.map_err(SessionError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

    /// Run a session against `input` and return everything it wrote plus its result.
    async fn run_session(input: &[u8], limits: SessionLimits) -> (String, Result<(), SessionError>) {
        let (mut client, server) = duplex(1024 * 1024);
        let fetcher = ImageFetcher::new().unwrap();
        let handle = tokio::spawn(Session::new(server, "test", fetcher, limits).run());

        client.write_all(input).await.unwrap();
        client.shutdown().await.unwrap();

        let mut output = String::new();
        client.read_to_string(&mut output).await.unwrap();
        (output, handle.await.unwrap())
    }

    #[tokio::test]
    async fn test_welcome_then_clean_eof() {
        let (output, result) = run_session(b"", SessionLimits::default()).await;
        assert_eq!(output, WELCOME);
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_mode_commands_are_acknowledged_in_order() {
        let (output, result) =
            run_session(b"bw\ncolor\n  bw  \r\n", SessionLimits::default()).await;
        assert!(result.is_ok());
        assert_eq!(
            output,
            format!("{}Using BW.\nUsing RGB.\nUsing BW.\n", WELCOME)
        );
    }

    #[tokio::test]
    async fn test_invalid_url_reports_and_closes() {
        let (output, result) =
            run_session(b"not a url\nbw\n", SessionLimits::default()).await;
        assert_eq!(output, format!("{}{}", WELCOME, FETCH_FAILED));
        assert!(matches!(result, Err(SessionError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_blank_line_is_a_failed_fetch() {
        let (output, result) = run_session(b"\n", SessionLimits::default()).await;
        assert_eq!(output, format!("{}{}", WELCOME, FETCH_FAILED));
        assert!(matches!(result, Err(SessionError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_line_too_long_reports_and_closes() {
        let limits = SessionLimits { max_line_bytes: 8 };
        let (output, result) = run_session(b"bw\n0123456789abcdef\n", limits).await;
        assert_eq!(output, format!("{}Using BW.\n{}", WELCOME, LINE_TOO_LONG));
        assert!(matches!(result, Err(SessionError::LineTooLong { limit: 8 })));
    }

    #[tokio::test]
    async fn test_line_at_limit_is_accepted() {
        let limits = SessionLimits { max_line_bytes: 5 };
        let (output, result) = run_session(b"color\n", limits).await;
        assert!(result.is_ok());
        assert_eq!(output, format!("{}Using RGB.\n", WELCOME));
    }

    #[tokio::test]
    async fn test_partial_line_at_eof_is_ignored() {
        let (output, result) = run_session(b"bw\ncolor", SessionLimits::default()).await;
        assert!(result.is_ok());
        assert_eq!(output, format!("{}Using BW.\n", WELCOME));
    }

    #[test]
    fn test_client_messages() {
        assert_eq!(
            SessionError::LineTooLong { limit: 1 }.client_message(),
            Some(LINE_TOO_LONG)
        );
        assert_eq!(
            SessionError::Render(RenderError::ZeroWidth).client_message(),
            Some(RENDER_FAILED)
        );
        assert_eq!(
            SessionError::Decode(DecodeError::EmptyInput).client_message(),
            Some(DECODE_FAILED)
        );
        let eof = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
        assert_eq!(SessionError::Read(eof).client_message(), None);
    }

    #[test]
    fn test_new_session_starts_in_truecolor() {
        let (_client, server) = duplex(64);
        let session = Session::new(server, "peer", ImageFetcher::new().unwrap(), SessionLimits::default());
        assert_eq!(session.mode(), RenderMode::TrueColor);
        assert_eq!(session.peer(), "peer");
    }
}
