//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No city resolves for the slug.
    #[error("City not found: {0}")]
    CityNotFound(String),

    /// State code is unknown or has no cities.
    #[error("State not found: {0}")]
    StateNotFound(String),

    /// City exists but has no such service.
    #[error("Service not found: {service} in {city}")]
    ServiceNotFound { city: String, service: String },

    /// Direct request for an internal rewrite target.
    #[error("Internal path requested directly: {0}")]
    InternalPath(String),

    /// Nothing is served at the path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::CityNotFound(slug) => (
                StatusCode::NOT_FOUND,
                json!({"error": "City not found", "path": slug}),
            ),
            Self::StateNotFound(state) => (
                StatusCode::NOT_FOUND,
                json!({"error": "State not found", "path": state}),
            ),
            Self::ServiceNotFound { city, service } => (
                StatusCode::NOT_FOUND,
                json!({"error": "Service not found", "path": format!("{city}/services/{service}")}),
            ),
            Self::InternalPath(path) | Self::NotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Not found", "path": path}),
            ),
            Self::Serialize(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": e.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_statuses() {
        for err in [
            ServerError::CityNotFound("nowhere-zz".to_owned()),
            ServerError::StateNotFound("zz".to_owned()),
            ServerError::ServiceNotFound {
                city: "austin-tx".to_owned(),
                service: "roofing".to_owned(),
            },
            ServerError::InternalPath("/city-sites/austin-tx".to_owned()),
            ServerError::NotFound("/missing".to_owned()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn test_display() {
        let err = ServerError::ServiceNotFound {
            city: "austin-tx".to_owned(),
            service: "roofing".to_owned(),
        };

        assert_eq!(err.to_string(), "Service not found: roofing in austin-tx");
    }
}
