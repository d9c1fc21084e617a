//! Inbound request handling.
//!
//! # Responsibilities
//! - Read the request ID set by the request-ID layer
//! - Decode query parameters into a flat map
//!
//! # Design Decisions
//! - Query decoding never rejects: malformed pairs are decoded leniently so
//!   the dispatcher can answer with its own CORS-shaped 400
//! - First occurrence of a repeated parameter wins

use std::collections::HashMap;

use axum::http::{HeaderName, HeaderValue, Method, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a UUID v4 for requests arriving without an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The parts of an inbound request the dispatcher consumes.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub params: HashMap<String, String>,
    pub request_id: String,
}

impl InboundRequest {
    /// Extract method, query parameters and request ID.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let request_id = request
            .headers()
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        Self {
            method: request.method().clone(),
            params: query_params(request.uri()),
            request_id,
        }
    }
}

/// Decode the query string of `uri`.
pub fn query_params(uri: &Uri) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(query) = uri.query() {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_query_params_decoded() {
        let uri: Uri = "/?operation=buscar&termosBusca=Lapa%20Centro".parse().unwrap();
        let params = query_params(&uri);
        assert_eq!(params["operation"], "buscar");
        assert_eq!(params["termosBusca"], "Lapa Centro");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let uri: Uri = "/?operation=buscar&operation=previsao".parse().unwrap();
        assert_eq!(query_params(&uri)["operation"], "buscar");
    }

    #[test]
    fn test_no_query() {
        let uri: Uri = "/".parse().unwrap();
        assert!(query_params(&uri).is_empty());
    }

    #[test]
    fn test_generated_request_ids_are_unique() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let mut maker = UuidRequestId;
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
        assert!(Uuid::parse_str(a.header_value().to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_from_request_reads_request_id() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/?operation=previsao")
            .header("x-request-id", "abc")
            .body(Body::empty())
            .unwrap();

        let inbound = InboundRequest::from_request(&request);
        assert_eq!(inbound.method, Method::OPTIONS);
        assert_eq!(inbound.request_id, "abc");
        assert_eq!(inbound.params["operation"], "previsao");
    }
}
