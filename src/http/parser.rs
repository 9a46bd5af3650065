use std::fmt;

use crate::http::request::{Method, Request};

/// Upper bound on a buffered header block.
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The request line did not have exactly three tokens.
    MalformedRequestLine { tokens: usize },
    InvalidEncoding,
    HeadersTooLarge,
    Incomplete,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRequestLine { tokens } => {
                write!(f, "request line has {} tokens, expected 3", tokens)
            }
            Self::InvalidEncoding => write!(f, "header block is not valid UTF-8"),
            Self::HeadersTooLarge => {
                write!(f, "header block exceeds {} bytes", MAX_HEAD_SIZE)
            }
            Self::Incomplete => write!(f, "header block is incomplete"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses a request from the front of `buf`.
///
/// Returns the request and the number of bytes making up the header block,
/// or `ParseError::Incomplete` while no blank line has arrived yet.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let Some(head_end) = find_headers_end(buf) else {
        if buf.len() > MAX_HEAD_SIZE {
            return Err(ParseError::HeadersTooLarge);
        }
        return Err(ParseError::Incomplete);
    };

    let request = parse_request_head(&buf[..head_end])?;
    Ok((request, head_end))
}

/// Parses a complete header block.
///
/// Used directly when the peer closed its side before sending the blank
/// line: whatever arrived counts as the header block.
pub fn parse_request_head(head: &[u8]) -> Result<Request, ParseError> {
    let head = std::str::from_utf8(head).map_err(|_| ParseError::InvalidEncoding)?;

    // Everything past the request line is drained, not interpreted.
    let request_line = head.lines().next().unwrap_or("");
    let tokens: Vec<&str> = request_line.split_whitespace().collect();

    let [method, target, protocol] = tokens[..] else {
        return Err(ParseError::MalformedRequestLine {
            tokens: tokens.len(),
        });
    };

    Ok(Request::new(Method::from_token(method), target, protocol))
}

/// Finds the end of the header block: just past the first empty line,
/// accepting both CRLF and bare LF line endings.
fn find_headers_end(buf: &[u8]) -> Option<usize> {
    let mut line_start = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if byte != b'\n' {
            continue;
        }

        let line = &buf[line_start..i];
        if line.is_empty() || line == b"\r" {
            return Some(i + 1);
        }
        line_start = i + 1;
    }

    None
}
