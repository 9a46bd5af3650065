//! Document root serving.
//!
//! [`Site`] ties the resolver to the response builder: it resolves a
//! request's target, degrades read failures to not-found, and hands the
//! resulting [`Resource`] to [`compose_response`].

pub mod listing;
pub mod not_found;
pub mod resolver;

pub use resolver::{DocumentRoot, Resource, ResolveError};

use crate::config::SiteConfig;
use crate::http::request::Request;
use crate::http::respond::{StatusPolicy, compose_response};
use crate::http::response::Response;

/// Everything a connection needs to answer requests. Shared read-only.
#[derive(Debug, Clone)]
pub struct Site {
    root: DocumentRoot,
    policy: StatusPolicy,
}

impl Site {
    pub fn new(root: DocumentRoot, policy: StatusPolicy) -> Self {
        Self { root, policy }
    }

    pub async fn from_config(cfg: &SiteConfig) -> Result<Self, ResolveError> {
        let root = DocumentRoot::open(&cfg.document_root, cfg.index_file.clone()).await?;
        let policy = if cfg.legacy_status {
            StatusPolicy::Legacy
        } else {
            StatusPolicy::Strict
        };

        Ok(Self::new(root, policy))
    }

    pub fn root(&self) -> &DocumentRoot {
        &self.root
    }

    /// Resolves the request target. A read failure is logged and served
    /// as not-found.
    pub async fn resolve(&self, target: &str) -> Resource {
        or_not_found(target, self.root.resolve(target).await)
    }

    pub async fn respond(&self, request: &Request) -> Response {
        let resource = self.resolve(&request.target).await;
        compose_response(request, resource, self.policy)
    }
}

/// Degrades a failed resolution to not-found, logging the failure.
pub fn or_not_found(target: &str, resolved: Result<Resource, ResolveError>) -> Resource {
    match resolved {
        Ok(resource) => resource,
        Err(e) => {
            tracing::error!(request_target = %target, error = %e, "Failed to read resource");
            Resource::NotFound {
                target: target.to_string(),
            }
        }
    }
}
