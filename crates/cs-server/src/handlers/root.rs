//! Root domain endpoints: the state directory and root SEO documents.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use chrono::Utc;
use cs_site::{StateSummary, robots, sitemap};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::{page_response, robots_response, xml_response};
use crate::state::AppState;

/// Response for GET /.
#[derive(Serialize)]
struct HomePage {
    /// States with at least one city, sorted by name.
    states: Vec<StateSummary>,
}

/// Handle GET /.
pub(crate) async fn get_home(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let page = HomePage {
        states: state.cities.summarize_states(),
    };
    page_response(&state.version, &headers, &page)
}

/// Handle GET /sitemap.xml and /main-sitemap.xml.
pub(crate) async fn get_sitemap(State(state): State<Arc<AppState>>) -> Response {
    let entries = sitemap::root_entries(&state.root_domain, Utc::now());
    xml_response(sitemap::render_urlset(&entries))
}

/// Handle GET /sitemap-index.xml.
pub(crate) async fn get_sitemap_index(State(state): State<Arc<AppState>>) -> Response {
    let entries = sitemap::root_index_entries(&state.root_domain, Utc::now());
    xml_response(sitemap::render_sitemap_index(&entries))
}

/// Handle GET /robots.txt.
pub(crate) async fn get_robots(State(state): State<Arc<AppState>>) -> Response {
    robots_response(robots::root_robots(&state.root_domain))
}
