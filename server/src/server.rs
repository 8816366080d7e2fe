//! Serial accept loop.
//!
//! One connection is accepted, read, routed, answered and closed before the
//! next is accepted. A client gets [`DEFAULT_READ_TIMEOUT`] to deliver its
//! whole request; after that it is answered with 408 and dropped.

use std::net::SocketAddr;
use std::time::Duration;

use http::StatusCode;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::error::ServerError;
use crate::protocol::{read_request, HttpError, Response};
use crate::router::Router;

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpServer {
    listener: TcpListener,
    router: Router,
    read_timeout: Duration,
}

impl HttpServer {
    pub async fn bind(addr: &str, router: Router) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        Ok(Self {
            listener,
            router,
            read_timeout: DEFAULT_READ_TIMEOUT,
        })
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the listener fails.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!(addr = %self.local_addr()?, "Listening");
        loop {
            let (stream, peer) = self.listener.accept().await?;
            if let Err(e) = self.handle_connection(stream).await {
                tracing::warn!(%peer, error = %e, "Connection failed");
            }
        }
    }

    #[tracing::instrument(skip_all)]
    async fn handle_connection(&self, stream: TcpStream) -> Result<(), ServerError> {
        let mut reader = BufReader::new(stream);
        let read = tokio::time::timeout(self.read_timeout, read_request(&mut reader)).await;
        let response = match read {
            Ok(Ok(request)) => self.router.route(&request).await,
            Ok(Err(HttpError::Closed)) => return Ok(()),
            Ok(Err(HttpError::Io(e))) => return Err(e.into()),
            Ok(Err(e @ HttpError::Malformed(_))) => {
                tracing::debug!(error = %e, "Rejected request");
                Response::text(StatusCode::BAD_REQUEST, e.to_string())
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.read_timeout, "Request not received in time");
                Response::text(StatusCode::REQUEST_TIMEOUT, "Request timed out")
            }
        };

        let mut stream = reader.into_inner();
        response.write_to(&mut stream).await?;
        stream.shutdown().await?;
        Ok(())
    }
}
