//! Response shaping.
//!
//! # Responsibilities
//! - Attach CORS and JSON content-type headers to every response
//! - Build the bare preflight response
//! - Convert the gateway's response into an axum response
//!
//! # Design Decisions
//! - Headers are added here, not by a tower layer, so every return path
//!   of the dispatcher carries them, including validation failures

use axum::{
    body::Body,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
        },
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::config::CorsConfig;

/// HTTP-shaped result of one gateway invocation.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl GatewayResponse {
    /// JSON response with the standard header set.
    pub fn json(status: StatusCode, body: &Value, cors: &CorsConfig) -> Self {
        Self {
            status,
            headers: standard_headers(cors),
            body: body.to_string(),
        }
    }

    /// 200 with an empty body, for `OPTIONS` preflight.
    pub fn preflight(cors: &CorsConfig) -> Self {
        Self {
            status: StatusCode::OK,
            headers: standard_headers(cors),
            body: String::new(),
        }
    }
}

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// CORS headers plus `Content-Type: application/json`.
///
/// Configured values that are not valid header values are skipped.
pub fn standard_headers(cors: &CorsConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    match HeaderValue::from_str(&cors.allow_methods) {
        Ok(v) => {
            headers.insert(ACCESS_CONTROL_ALLOW_METHODS, v);
        }
        Err(_) => tracing::warn!(value = %cors.allow_methods, "Invalid cors.allow_methods, skipping"),
    }
    match HeaderValue::from_str(&cors.allow_headers) {
        Ok(v) => {
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, v);
        }
        Err(_) => tracing::warn!(value = %cors.allow_headers, "Invalid cors.allow_headers, skipping"),
    }

    headers
}
