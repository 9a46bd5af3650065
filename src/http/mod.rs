//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.x server: one request per connection, no
//! request bodies, no keep-alive.
//!
//! # Architecture
//!
//! - **`connection`**: per-connection state machine
//! - **`parser`**: turns the buffered header block into a [`request::Request`]
//! - **`request`**: method, target and protocol token
//! - **`respond`**: builds a response from a request and its resolved resource
//! - **`response`**: status codes, ordered headers, response builder
//! - **`writer`**: serializes and writes responses
//! - **`mime`**: content type selection from the request target
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer bytes until the blank line (or EOF)
//!        └──────┬──────┘
//!               │ Request parsed          (malformed → 400, stalled → 408)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Resolve target, build response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response, shut down the stream
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod respond;
pub mod response;
pub mod writer;
