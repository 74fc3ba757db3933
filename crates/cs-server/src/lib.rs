//! HTTP server for the citysite engine.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - JSON page data for the root, state, and city sites
//! - Sitemaps and `robots.txt` for every host
//! - Static files from the public directory
//!
//! All three kinds of site share one listener. The `Host` header decides
//! which one a request addresses, see [`routing`].
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use cs_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         root_domain: "example.com".to_owned(),
//!         data_dir: PathBuf::from("data/cities"),
//!         archive: PathBuf::from("data/cities.zip"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (cs-server)
//!                        │
//!                        ├─► host router (rewrite by subdomain, 404 internal paths)
//!                        │
//!                        ├─► page / sitemap / robots handlers
//!                        │       │
//!                        │       └─► Cities ──► LayeredSource (archive, then loose files)
//!                        │
//!                        └─► Static files (tower-http ServeDir)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
pub mod routing;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use cs_site::Cities;
use cs_storage::{ArchiveSource, DirSource, LayeredSource};
use state::AppState;
use tower_http::services::ServeDir;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Root domain (host[:port]) that subdomains are matched against.
    pub root_domain: String,
    /// Directory of loose `<slug>.json` files.
    pub data_dir: PathBuf,
    /// Packed archive consulted before `data_dir`.
    pub archive: PathBuf,
    /// Directory of static assets.
    pub public_dir: PathBuf,
    /// Application version (for `ETag` computation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            root_domain: cs_config::DEFAULT_ROOT_DOMAIN.to_owned(),
            data_dir: PathBuf::from("data/cities"),
            archive: PathBuf::from("data/cities.zip"),
            public_dir: PathBuf::from("public"),
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Archive first, loose files as fallback
    let source = LayeredSource::new(
        ArchiveSource::new(config.archive.clone()),
        DirSource::new(config.data_dir.clone()),
    );
    let cities = Cities::new(Arc::new(source));

    let state = Arc::new(AppState {
        cities,
        root_domain: config.root_domain.clone(),
        static_files: ServeDir::new(&config.public_dir),
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, root_domain = %config.root_domain, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from citysite config.
///
/// # Arguments
///
/// * `config` - Loaded configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_config(config: &cs_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        root_domain: config.site_resolved.root_domain.clone(),
        data_dir: config.site_resolved.data_dir.clone(),
        archive: config.site_resolved.archive.clone(),
        public_dir: config.site_resolved.public_dir.clone(),
        version,
    }
}
