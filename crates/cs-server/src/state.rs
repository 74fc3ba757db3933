//! Application state.
//!
//! Shared state for all request handlers.

use cs_site::Cities;
use tower_http::services::ServeDir;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// City resolver over the configured content source.
    pub(crate) cities: Cities,
    /// Root domain (host[:port]) used for routing and absolute URLs.
    pub(crate) root_domain: String,
    /// Static files for allowlisted asset paths.
    pub(crate) static_files: ServeDir,
    /// Application version for `ETag` computation.
    pub(crate) version: String,
}
