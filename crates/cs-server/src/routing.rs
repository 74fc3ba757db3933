//! Host-based routing decisions.
//!
//! Maps `(Host, path)` to a routing decision without touching the request,
//! so the rules can be exercised without a server:
//!
//! ```text
//! example.com/about              -> pass through
//! tx.example.com/                -> /state-sites/tx
//! tx.example.com/cities          -> /state-sites/tx/cities
//! dallas-tx.example.com/         -> /city-sites/dallas-tx
//! dallas-tx.example.com/about    -> /city-sites/dallas-tx/about
//! */city-sites/... , */state-sites/...  -> reject (404)
//! ```

use cs_site::states::is_state_code;

/// Internal namespace for state pages.
pub const STATE_PREFIX: &str = "/state-sites";
/// Internal namespace for city pages.
pub const CITY_PREFIX: &str = "/city-sites";

/// Sitemap file names on a city host that all map to the city's `sitemap.xml`.
const CITY_SITEMAP_ALIASES: [&str; 3] = [
    "/main-sitemap.xml",
    "/services-sitemap.xml",
    "/sitemap-index.xml",
];

const STATIC_PREFIXES: [&str; 3] = ["/_next/static", "/_next/image", "/static/"];
const STATIC_EXTENSIONS: [&str; 9] = ["svg", "png", "jpg", "jpeg", "gif", "webp", "ico", "css", "js"];

/// What a hostname addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostKind {
    /// The root domain, its `www.` alias, or any host outside the root domain.
    Root,
    /// A state subdomain, carrying the lowercase state code.
    State(String),
    /// Any other subdomain, carrying the lowercase city slug.
    City(String),
}

/// Routing decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Serve the request as is.
    Pass,
    /// Serve the request from this internal path instead.
    Rewrite(String),
    /// Direct access to an internal namespace.
    Reject,
}

fn strip_port(host: &str) -> &str {
    host.split_once(':').map_or(host, |(name, _)| name)
}

/// Classify a `Host` value against the configured root domain.
///
/// Ports are ignored on both sides and comparison is case-insensitive.
/// Hosts that are not below the root domain are root traffic.
#[must_use]
pub fn classify_host(host: &str, root_domain: &str) -> HostKind {
    let host = strip_port(host).to_ascii_lowercase();
    let root = strip_port(root_domain).to_ascii_lowercase();

    let Some(subdomain) = host
        .strip_suffix(root.as_str())
        .and_then(|rest| rest.strip_suffix('.'))
    else {
        return HostKind::Root;
    };

    if subdomain.is_empty() || subdomain == "www" {
        return HostKind::Root;
    }
    if subdomain.len() == 2 && is_state_code(subdomain) {
        return HostKind::State(subdomain.to_owned());
    }
    HostKind::City(subdomain.to_owned())
}

/// Whether a path is a static asset that bypasses host routing.
#[must_use]
pub fn is_static_asset(path: &str) -> bool {
    if path == "/favicon.ico" || STATIC_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return true;
    }
    path.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.is_empty() && !ext.contains('/') && STATIC_EXTENSIONS.contains(&ext)
    })
}

fn is_internal_path(path: &str) -> bool {
    path.starts_with(CITY_PREFIX) || path.starts_with(STATE_PREFIX)
}

fn under(prefix: &str, key: &str, path: &str) -> String {
    if path == "/" || path.is_empty() {
        format!("{prefix}/{key}")
    } else {
        format!("{prefix}/{key}{path}")
    }
}

/// Decide how to serve a request.
///
/// A missing `Host` header counts as root traffic.
#[must_use]
pub fn route_request(host: Option<&str>, path: &str, root_domain: &str) -> RouteDecision {
    if is_static_asset(path) {
        return RouteDecision::Pass;
    }
    if is_internal_path(path) {
        return RouteDecision::Reject;
    }

    match classify_host(host.unwrap_or_default(), root_domain) {
        HostKind::Root => RouteDecision::Pass,
        HostKind::State(code) => RouteDecision::Rewrite(under(STATE_PREFIX, &code, path)),
        HostKind::City(slug) => {
            let rewritten = under(CITY_PREFIX, &slug, path);
            if CITY_SITEMAP_ALIASES.iter().any(|alias| rewritten.ends_with(alias)) {
                RouteDecision::Rewrite(format!("{CITY_PREFIX}/{slug}/sitemap.xml"))
            } else {
                RouteDecision::Rewrite(rewritten)
            }
        }
    }
}
