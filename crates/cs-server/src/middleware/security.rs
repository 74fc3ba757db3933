//! Security headers middleware.
//!
//! Adds security headers to all responses:
//! - X-Frame-Options
//! - X-Content-Type-Options
//! - Strict-Transport-Security
//! - Referrer-Policy
//! - Permissions-Policy

use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use tower_http::set_header::SetResponseHeaderLayer;

/// Strict-Transport-Security header value (two years, preload eligible).
const HSTS: &str = "max-age=63072000; includeSubDomains; preload";

/// Permissions-Policy header value.
const PERMISSIONS_POLICY: &str = "camera=(), microphone=(), geolocation=()";

fn overriding(name: &'static str, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(HeaderName::from_static(name), HeaderValue::from_static(value))
}

/// Create layer that adds X-Frame-Options header.
pub(crate) fn frame_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("x-frame-options", "SAMEORIGIN")
}

/// Create layer that adds X-Content-Type-Options header.
pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("x-content-type-options", "nosniff")
}

/// Create layer that adds Strict-Transport-Security header.
pub(crate) fn hsts_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("strict-transport-security", HSTS)
}

/// Create layer that adds Referrer-Policy header.
pub(crate) fn referrer_policy_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("referrer-policy", "strict-origin-when-cross-origin")
}

/// Create layer that adds Permissions-Policy header.
pub(crate) fn permissions_policy_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("permissions-policy", PERMISSIONS_POLICY)
}
