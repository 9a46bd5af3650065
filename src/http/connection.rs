use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::parser::{ParseError, parse_http_request, parse_request_head};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::site::Site;

/// Handles one accepted connection: one request, one response, then close.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    site: Arc<Site>,
    read_timeout: Option<Duration>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

/// How reading the header block ended.
pub enum ReadOutcome {
    Request(Request),
    Malformed(ParseError),
    TimedOut,
    /// Peer closed without sending anything.
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, site: Arc<Site>, read_timeout: Option<Duration>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            site,
            read_timeout,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = match self.read_with_timeout().await? {
                        ReadOutcome::Request(req) => ConnectionState::Processing(req),
                        ReadOutcome::Malformed(e) => {
                            tracing::warn!(error = %e, "Malformed request");
                            ConnectionState::Writing(ResponseWriter::new(&Response::bad_request()))
                        }
                        ReadOutcome::TimedOut => {
                            tracing::warn!("Timed out waiting for request header");
                            ConnectionState::Writing(ResponseWriter::new(
                                &Response::request_timeout(),
                            ))
                        }
                        ReadOutcome::Closed => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = self.site.respond(req).await;

                    tracing::info!(
                        method = ?req.method,
                        path = %req.target,
                        status = response.status.as_u16(),
                        "Served request"
                    );

                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    // No keep-alive: one response per connection.
                    self.stream.shutdown().await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    async fn read_with_timeout(&mut self) -> anyhow::Result<ReadOutcome> {
        match self.read_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.read_request()).await {
                Ok(outcome) => outcome,
                Err(_) => Ok(ReadOutcome::TimedOut),
            },
            None => self.read_request().await,
        }
    }

    pub async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    tracing::debug!(
                        head = %String::from_utf8_lossy(&self.buffer[..consumed]),
                        "Received request header"
                    );
                    return Ok(ReadOutcome::Request(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Ok(ReadOutcome::Malformed(e)),
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(ReadOutcome::Closed);
                }

                // End of stream ends the header block.
                return Ok(match parse_request_head(&self.buffer) {
                    Ok(request) => ReadOutcome::Request(request),
                    Err(e) => ReadOutcome::Malformed(e),
                });
            }
        }
    }
}
