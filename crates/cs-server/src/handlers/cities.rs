//! City subdomain endpoints, served under `/city-sites/{city}`.
//!
//! Page endpoints return the resolved city data as JSON for the presentation
//! layer, with an `ETag` derived from the payload.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use chrono::Utc;
use cs_site::{CityRecord, Service, robots, sitemap};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::{page_response, robots_response, xml_response};
use crate::state::AppState;

/// City page variants that share the full record payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum CityPageKind {
    Home,
    About,
    Contact,
}

/// Response for the city home, about, and contact pages.
#[derive(Serialize)]
struct CityPage<'a> {
    page: CityPageKind,
    city: &'a CityRecord,
}

/// City identity repeated on service pages.
#[derive(Serialize)]
struct CityIdentity<'a> {
    city: &'a str,
    slug: &'a str,
    state: &'a str,
    state_name: &'a str,
    phone: &'a str,
}

impl<'a> From<&'a CityRecord> for CityIdentity<'a> {
    fn from(record: &'a CityRecord) -> Self {
        Self {
            city: &record.city,
            slug: &record.slug,
            state: &record.state,
            state_name: &record.state_name,
            phone: &record.phone,
        }
    }
}

/// Entry in the services listing.
#[derive(Serialize)]
struct ServiceLink<'a> {
    service_id: &'a str,
    service_title: &'a str,
    subheadline: &'a str,
}

/// Response for GET /city-sites/{city}/services.
#[derive(Serialize)]
struct ServicesPage<'a> {
    city: CityIdentity<'a>,
    services: Vec<ServiceLink<'a>>,
}

/// Response for GET /city-sites/{city}/services/{service}.
#[derive(Serialize)]
struct ServicePage<'a> {
    city: CityIdentity<'a>,
    service: &'a Service,
}

fn resolve_city(app: &AppState, slug: &str) -> Result<CityRecord, ServerError> {
    app.cities
        .resolve(slug)
        .ok_or_else(|| ServerError::CityNotFound(slug.to_owned()))
}

fn city_page(
    app: &AppState,
    slug: &str,
    headers: &HeaderMap,
    page: CityPageKind,
) -> Result<Response, ServerError> {
    let record = resolve_city(app, slug)?;
    page_response(
        &app.version,
        headers,
        &CityPage {
            page,
            city: &record,
        },
    )
}

/// Handle GET /city-sites/{city}.
pub(crate) async fn get_home(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    city_page(&state, &slug, &headers, CityPageKind::Home)
}

/// Handle GET /city-sites/{city}/about.
pub(crate) async fn get_about(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    city_page(&state, &slug, &headers, CityPageKind::About)
}

/// Handle GET /city-sites/{city}/contact.
pub(crate) async fn get_contact(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    city_page(&state, &slug, &headers, CityPageKind::Contact)
}

/// Handle GET /city-sites/{city}/services.
pub(crate) async fn get_services(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let record = resolve_city(&state, &slug)?;
    let page = ServicesPage {
        city: CityIdentity::from(&record),
        services: record
            .services
            .iter()
            .map(|s| ServiceLink {
                service_id: &s.service_id,
                service_title: &s.service_title,
                subheadline: &s.hero.subheadline,
            })
            .collect(),
    };
    page_response(&state.version, &headers, &page)
}

/// Handle GET /city-sites/{city}/services/{service}.
pub(crate) async fn get_service(
    Path((slug, service_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let record = resolve_city(&state, &slug)?;
    let service = record
        .service(&service_id)
        .ok_or_else(|| ServerError::ServiceNotFound {
            city: record.slug.clone(),
            service: service_id.clone(),
        })?;
    let page = ServicePage {
        city: CityIdentity::from(&record),
        service,
    };
    page_response(&state.version, &headers, &page)
}

/// Handle GET /city-sites/{city}/sitemap.xml.
pub(crate) async fn get_sitemap(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let record = resolve_city(&state, &slug)?;
    let entries = sitemap::city_entries(&state.root_domain, &record, Utc::now());
    Ok(xml_response(sitemap::render_urlset(&entries)))
}

/// Handle GET /city-sites/{city}/robots.txt.
pub(crate) async fn get_robots(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    robots_response(robots::city_robots(&state.root_domain, &slug))
}
