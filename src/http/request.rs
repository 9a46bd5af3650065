/// HTTP request methods.
///
/// The server distinguishes only the methods it behaves differently for.
/// Everything else is `Other` and is answered like a GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    Get,
    /// HEAD - Like GET but without the response body
    Head,
    /// Any other method token
    Other,
}

/// Represents a parsed HTTP request line.
///
/// Header lines following the request line are drained off the stream but
/// not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The request target exactly as received (e.g., "/index.html")
    pub target: String,
    /// Protocol token (typically "HTTP/1.1"), echoed in the status line
    pub protocol: String,
}

impl Method {
    /// Classifies a method token by prefix.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Method::Get);
    /// assert_eq!(Method::from_token("HEAD"), Method::Head);
    /// assert_eq!(Method::from_token("POST"), Method::Other);
    /// ```
    pub fn from_token(token: &str) -> Self {
        if token.starts_with("GET") {
            Method::Get
        } else if token.starts_with("HEAD") {
            Method::Head
        } else {
            Method::Other
        }
    }

    /// Whether a response to this method carries a body.
    pub fn wants_body(self) -> bool {
        self != Method::Head
    }
}

impl Request {
    pub fn new(method: Method, target: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            protocol: protocol.into(),
        }
    }
}
