//! HTTP request handlers.

pub(crate) mod cities;
pub(crate) mod root;
pub(crate) mod states;

use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use md5::{Digest, Md5};
use serde::Serialize;

use crate::error::ServerError;

const SITEMAP_CACHE_CONTROL: &str = "public, max-age=3600, stale-while-revalidate=86400";
const ROBOTS_CACHE_CONTROL: &str = "public, max-age=86400";
const PAGE_CACHE_CONTROL: &str = "public, max-age=60";

/// Respond with an XML sitemap document.
pub(crate) fn xml_response(body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/xml; charset=utf-8"),
            (header::CACHE_CONTROL, SITEMAP_CACHE_CONTROL),
        ],
        body,
    )
        .into_response()
}

/// Respond with a `robots.txt` document.
pub(crate) fn robots_response(body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, ROBOTS_CACHE_CONTROL),
        ],
        body,
    )
        .into_response()
}

/// Respond with a JSON page payload, honoring `If-None-Match`.
pub(crate) fn page_response<T: Serialize>(
    version: &str,
    headers: &HeaderMap,
    payload: &T,
) -> Result<Response, ServerError> {
    let body = serde_json::to_string(payload)?;
    let etag = compute_etag(version, &body);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_owned()),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, PAGE_CACHE_CONTROL.to_owned()),
        ],
        body,
    )
        .into_response())
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_compute_etag_includes_version() {
        assert_ne!(compute_etag("1.0.0", "content"), compute_etag("1.0.1", "content"));
    }

    #[test]
    fn test_compute_etag_includes_content() {
        assert_ne!(compute_etag("1.0.0", "content1"), compute_etag("1.0.0", "content2"));
    }

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag("1.0.0", "content");

        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag.len(), 18);
    }

    #[test]
    fn test_page_response_not_modified() {
        let payload = serde_json::json!({"slug": "austin-tx"});
        let first = page_response("1.0.0", &HeaderMap::new(), &payload).unwrap();
        let etag = first.headers()[header::ETAG].clone();

        let mut headers = HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, etag);
        let second = page_response("1.0.0", &headers, &payload).unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn test_page_response_stale_etag() {
        let payload = serde_json::json!({"slug": "austin-tx"});
        let mut headers = HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"0000000000000000\""));

        let response = page_response("1.0.0", &headers, &payload).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_xml_response_headers() {
        let response = xml_response("<urlset/>".to_owned());

        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/xml; charset=utf-8"
        );
        assert_eq!(response.headers()[header::CACHE_CONTROL], SITEMAP_CACHE_CONTROL);
    }
}
