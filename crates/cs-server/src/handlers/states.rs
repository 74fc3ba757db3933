//! State subdomain endpoints, served under `/state-sites/{state}`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use chrono::Utc;
use cs_site::states::{is_state_code, state_name};
use cs_site::{CityLink, CityRecord, robots, sitemap};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::{page_response, robots_response, xml_response};
use crate::state::AppState;

/// Response for GET /state-sites/{state}.
#[derive(Serialize)]
struct StatePage {
    /// Uppercase state code.
    state: String,
    state_name: String,
    cities: Vec<CityLink>,
}

/// Cities of a known state, or `StateNotFound` when the code is unknown or
/// the state has no cities.
fn state_cities(app: &AppState, code: &str) -> Result<Vec<CityRecord>, ServerError> {
    if !is_state_code(code) {
        return Err(ServerError::StateNotFound(code.to_owned()));
    }
    let cities = app.cities.cities_for_state(code);
    if cities.is_empty() {
        return Err(ServerError::StateNotFound(code.to_owned()));
    }
    Ok(cities)
}

/// Handle GET /state-sites/{state} and /state-sites/{state}/cities.
pub(crate) async fn get_state(
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let cities = state_cities(&state, &code)?;

    let name = cities
        .first()
        .map(|c| c.state_name.clone())
        .filter(|n| !n.is_empty())
        .or_else(|| state_name(&code).map(str::to_owned))
        .unwrap_or_default();

    let page = StatePage {
        state: code.to_uppercase(),
        state_name: name,
        cities: cities.iter().map(CityLink::from).collect(),
    };
    page_response(&state.version, &headers, &page)
}

/// Handle GET /state-sites/{state}/sitemap.xml and main-sitemap.xml.
pub(crate) async fn get_sitemap(
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let cities = state.cities.cities_for_state(&code);
    let entries = sitemap::state_entries(&state.root_domain, &code, &cities, Utc::now())
        .ok_or(ServerError::StateNotFound(code))?;
    Ok(xml_response(sitemap::render_urlset(&entries)))
}

/// Handle GET /state-sites/{state}/sitemap-index.xml.
pub(crate) async fn get_sitemap_index(
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let cities = state.cities.cities_for_state(&code);
    let entries = sitemap::state_index_entries(&state.root_domain, &code, &cities, Utc::now())
        .ok_or(ServerError::StateNotFound(code))?;
    Ok(xml_response(sitemap::render_sitemap_index(&entries)))
}

/// Handle GET /state-sites/{state}/robots.txt.
pub(crate) async fn get_robots(
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    robots_response(robots::state_robots(&state.root_domain, &code))
}
