//! Static file serving.
//!
//! Allowlisted asset paths are served from the public directory; every other
//! unmatched path is a JSON 404.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;

use crate::error::ServerError;
use crate::routing::is_static_asset;
use crate::state::AppState;

/// Fallback handler for paths no route matched.
pub(crate) async fn serve_fallback(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
) -> Response {
    let path = req.uri().path().to_owned();
    if !is_static_asset(&path) {
        return ServerError::NotFound(path).into_response();
    }

    let result: Result<_, Infallible> = state.static_files.clone().oneshot(req).await;
    match result {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}
