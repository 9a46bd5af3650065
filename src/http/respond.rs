use crate::http::mime::content_type_for;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::site::Resource;

/// How the status line reflects the resolved resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// 200 for files and listings, 404 for not-found.
    #[default]
    Strict,
    /// Always 200, even for the not-found page.
    Legacy,
}

impl StatusPolicy {
    pub fn status_for(self, resource: &Resource) -> StatusCode {
        match self {
            StatusPolicy::Legacy => StatusCode::Ok,
            StatusPolicy::Strict if resource.is_found() => StatusCode::Ok,
            StatusPolicy::Strict => StatusCode::NotFound,
        }
    }
}

/// Builds the response for a request from what its target resolved to.
///
/// The content type is picked from the request target, not from the file
/// that was served. HEAD responses carry no body.
pub fn compose_response(request: &Request, resource: Resource, policy: StatusPolicy) -> Response {
    let builder = ResponseBuilder::new(policy.status_for(&resource))
        .protocol(request.protocol.clone())
        .header("Content-Type", content_type_for(&request.target));

    if request.method.wants_body() {
        builder.body(resource.into_body()).build()
    } else {
        builder.build()
    }
}
