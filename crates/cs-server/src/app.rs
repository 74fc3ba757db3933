//! Router construction.
//!
//! Builds the axum router with all routes and middleware. Host routing runs
//! as a layer around an inner router, so path rewrites happen before the
//! inner router matches routes.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers::{cities, root, states};
use crate::middleware::{host_router, security};
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let root_routes = Router::new()
        .route("/", get(root::get_home))
        .route("/sitemap.xml", get(root::get_sitemap))
        .route("/main-sitemap.xml", get(root::get_sitemap))
        .route("/sitemap-index.xml", get(root::get_sitemap_index))
        .route("/robots.txt", get(root::get_robots));

    let state_routes = Router::new()
        .route("/state-sites/{state}", get(states::get_state))
        .route("/state-sites/{state}/cities", get(states::get_state))
        .route("/state-sites/{state}/sitemap.xml", get(states::get_sitemap))
        .route("/state-sites/{state}/main-sitemap.xml", get(states::get_sitemap))
        .route(
            "/state-sites/{state}/sitemap-index.xml",
            get(states::get_sitemap_index),
        )
        .route("/state-sites/{state}/robots.txt", get(states::get_robots));

    let city_routes = Router::new()
        .route("/city-sites/{city}", get(cities::get_home))
        .route("/city-sites/{city}/about", get(cities::get_about))
        .route("/city-sites/{city}/contact", get(cities::get_contact))
        .route("/city-sites/{city}/services", get(cities::get_services))
        .route("/city-sites/{city}/services/", get(cities::get_services))
        .route(
            "/city-sites/{city}/services/{service}",
            get(cities::get_service),
        )
        .route("/city-sites/{city}/sitemap.xml", get(cities::get_sitemap))
        .route("/city-sites/{city}/robots.txt", get(cities::get_robots));

    let pages = Router::new()
        .merge(root_routes)
        .merge(state_routes)
        .merge(city_routes)
        .fallback(static_files::serve_fallback)
        .with_state(Arc::clone(&state));

    Router::new()
        .fallback_service(pages)
        .layer(axum::middleware::from_fn_with_state(
            state,
            host_router::route_by_host,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::frame_options_layer())
                .layer(security::content_type_options_layer())
                .layer(security::hsts_layer())
                .layer(security::referrer_policy_layer())
                .layer(security::permissions_policy_layer()),
        )
}
