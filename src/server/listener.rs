use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::info;

use crate::config::{Config, ServerConfig};
use crate::http::connection::Connection;
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::site::Site;

/// Opens the document root, binds the listen address and serves forever.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let site = Site::from_config(&cfg.site)
        .await
        .context("failed to open document root")?;
    info!("Serving {}", site.root().path().display());

    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.listen_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, Arc::new(site), &cfg.server).await
}

/// Accept loop. Each connection gets its own task, up to
/// `max_connections` at once; past that, peers are answered 503 and closed.
pub async fn serve(
    listener: TcpListener,
    site: Arc<Site>,
    cfg: &ServerConfig,
) -> anyhow::Result<()> {
    let permits = Arc::new(Semaphore::new(cfg.max_connections));
    let read_timeout = cfg.read_timeout_secs.map(Duration::from_secs);

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!("Failed to accept connection: {}", e);
                continue;
            }
        };

        let Ok(permit) = Arc::clone(&permits).try_acquire_owned() else {
            tracing::warn!("Connection limit reached, rejecting {}", peer);
            tokio::spawn(reject(socket));
            continue;
        };

        info!("Accepted connection from {}", peer);

        let site = Arc::clone(&site);
        tokio::spawn(async move {
            let _permit = permit;
            let mut conn = Connection::new(socket, site, read_timeout);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}

/// How long a rejected peer gets to finish sending its request.
const REJECT_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Answers a connection turned away at capacity with 503.
///
/// The request is read off the socket first: closing with unread data
/// makes the kernel send RST, and the peer would never see the 503.
pub async fn reject<S>(mut socket: S)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let _ = tokio::time::timeout(REJECT_DRAIN_TIMEOUT, drain_head(&mut socket)).await;

    let mut writer = ResponseWriter::new(&Response::service_unavailable());
    if let Err(e) = writer.write_to_stream(&mut socket).await {
        tracing::debug!("Failed to send 503: {}", e);
        return;
    }

    if let Err(e) = socket.shutdown().await {
        tracing::debug!("Failed to close rejected connection: {}", e);
    }
}

/// Reads until the header block is complete, the peer stops sending, or
/// the head grows past the parser's limit.
async fn drain_head<S>(socket: &mut S)
where
    S: AsyncRead + Unpin,
{
    let mut buffer = BytesMut::with_capacity(1024);

    loop {
        match parse_http_request(&buffer) {
            Err(ParseError::Incomplete) => {}
            _ => return,
        }

        match socket.read_buf(&mut buffer).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
    }
}
