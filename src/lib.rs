//! docserve - a small static document server
//!
//! Answers GET and HEAD requests from a document root with file contents,
//! generated directory listings, or a not-found page.

pub mod config;
pub mod http;
pub mod server;
pub mod site;
