/// HTTP status codes the server emits.
///
/// - `Ok` (200): file or listing served
/// - `BadRequest` (400): malformed request line
/// - `NotFound` (404): nothing matched the target
/// - `RequestTimeout` (408): the peer did not finish its header block in time
/// - `ServiceUnavailable` (503): connection limit reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 408 Request Timeout
    RequestTimeout,
    /// 503 Service Unavailable
    ServiceUnavailable,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::RequestTimeout => 408,
            StatusCode::ServiceUnavailable => 503,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }
}

/// Response headers in insertion order, one value per name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing an existing value in place so the original
    /// position is kept.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// `body` is `None` for HEAD responses, which end after the header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Protocol token for the status line, echoed from the request
    pub protocol: String,
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers in the order they are written
    pub headers: Headers,
    /// Response body as bytes
    pub body: Option<Vec<u8>>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use docserve::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body(b"hello".to_vec())
///     .build();
/// assert_eq!(response.protocol, "HTTP/1.1");
/// ```
pub struct ResponseBuilder {
    protocol: String,
    status: StatusCode,
    headers: Headers,
    body: Option<Vec<u8>>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            protocol: DEFAULT_PROTOCOL.to_string(),
            status,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Sets the protocol token written at the start of the status line.
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn build(self) -> Response {
        Response {
            protocol: self.protocol,
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// Protocol token used when the request never told us one.
pub const DEFAULT_PROTOCOL: &str = "HTTP/1.1";

impl Response {
    /// 400 for a request line that could not be parsed.
    pub fn bad_request() -> Self {
        Self::plain_error(StatusCode::BadRequest)
    }

    /// 408 for a peer that stalled before finishing its header block.
    pub fn request_timeout() -> Self {
        Self::plain_error(StatusCode::RequestTimeout)
    }

    /// 503 for a connection turned away at capacity.
    pub fn service_unavailable() -> Self {
        Self::plain_error(StatusCode::ServiceUnavailable)
    }

    fn plain_error(status: StatusCode) -> Self {
        let body = format!(
            "<html>\n    <head>\n        <title>{code} {reason}</title>\n    </head>\n    <body>\n       {code} {reason}\n   </body>\n</html>",
            code = status.as_u16(),
            reason = status.reason_phrase(),
        );

        ResponseBuilder::new(status)
            .header("Content-Type", "text/html")
            .body(body.into_bytes())
            .build()
    }
}
