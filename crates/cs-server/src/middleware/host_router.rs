//! Host routing middleware.
//!
//! Applies [`route_request`] to every request before route matching: state
//! and city subdomains are rewritten into their internal namespaces, direct
//! requests for those namespaces get a 404.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::uri::PathAndQuery;
use axum::http::{StatusCode, Uri, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;
use crate::routing::{RouteDecision, route_request};
use crate::state::AppState;

/// Rewrite the request path according to its `Host`.
pub(crate) async fn route_by_host(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()));
    let path = req.uri().path();

    match route_request(host, path, &state.root_domain) {
        RouteDecision::Pass => next.run(req).await,
        RouteDecision::Reject => {
            tracing::debug!(path = %path, "Rejected direct internal path");
            ServerError::InternalPath(path.to_owned()).into_response()
        }
        RouteDecision::Rewrite(target) => {
            tracing::debug!(host = ?host, from = %path, to = %target, "Rewrote request");
            match rewrite_uri(req.uri(), &target) {
                Ok(uri) => {
                    *req.uri_mut() = uri;
                    next.run(req).await
                }
                Err(e) => {
                    tracing::warn!(to = %target, error = %e, "Invalid rewritten URI");
                    StatusCode::BAD_REQUEST.into_response()
                }
            }
        }
    }
}

/// Replace the path of `uri`, keeping its scheme, authority, and query.
fn rewrite_uri(uri: &Uri, path: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_owned(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}
