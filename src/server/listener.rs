//! TCP listener: accepts connections and spawns one session task each.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};

use super::session::{Session, SessionLimits};
use crate::config::ServerConfig;
use crate::fetch::ImageFetcher;

/// Pause after a failed accept before trying again.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Errors that can occur while starting or running the listener.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A bound listener ready to serve clients.
///
/// Sessions share nothing but the fetcher's connection pool and the global logger.
/// There is no cap on concurrent sessions.
pub struct Server {
    listener: TcpListener,
    fetcher: ImageFetcher,
    limits: SessionLimits,
}

impl Server {
    /// Bind the address from `config`.
    pub async fn bind(config: &ServerConfig, fetcher: ImageFetcher) -> Result<Self, ServerError> {
        let addr = config.listen_addr();
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(source) => return Err(ServerError::Bind { addr, source }),
        };

        Ok(Self {
            listener,
            fetcher,
            limits: SessionLimits::from(config),
        })
    }

    /// Address actually bound (useful when the configured port is 0).
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Sessions already running are left to finish on their own.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        log::info!("Listening on {}", self.local_addr()?);
        tokio::pin!(shutdown);

        let mut next_id: u64 = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("Shutting down listener");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        next_id += 1;
                        self.spawn_session(next_id, stream, addr);
                    }
                    Err(e) => {
                        log::error!("Accept failed: {}", e);
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                },
            }
        }
    }

    fn spawn_session(&self, id: u64, stream: TcpStream, addr: SocketAddr) {
        log::info!("Connection #{} from {}", id, addr);
        if let Err(e) = stream.set_nodelay(true) {
            log::debug!("Connection #{}: set_nodelay failed: {}", id, e);
        }

        let peer = format!("#{} {}", id, addr);
        let session = Session::new(stream, peer, self.fetcher.clone(), self.limits);
        tokio::spawn(async move {
            match session.run().await {
                Ok(()) => log::info!("Connection #{} closed", id),
                Err(e) => log::warn!("Connection #{} ended: {}", id, e),
            }
        });
    }
}
