//! Shared utilities for integration tests.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use transit_gateway::config::{AccessToken, GatewayConfig};
use transit_gateway::HttpServer;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";
pub const API_PREFIX: &str = "/v2.1";
pub const LOGIN_PATH: &str = "/v2.1/Login/Autenticar";

/// Gateway config pointing at the mock upstream.
pub fn config_for(upstream: &MockServer) -> GatewayConfig {
    config_for_url(&format!("{}{}", upstream.uri(), API_PREFIX))
}

pub fn config_for_url(base_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = base_url.to_string();
    config.upstream.access_token = AccessToken::new(TOKEN);
    config
}

pub fn router_for(config: GatewayConfig) -> Router {
    HttpServer::new(config).unwrap().router()
}

/// Mount the login endpoint answering `body` with an optional Set-Cookie.
pub async fn mount_login(
    upstream: &MockServer,
    body: &str,
    set_cookie: Option<&str>,
    expected_calls: u64,
) {
    let mut template = ResponseTemplate::new(200).set_body_string(body);
    if let Some(cookie) = set_cookie {
        template = template.insert_header("set-cookie", cookie);
    }

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(query_param("token", TOKEN))
        .respond_with(template)
        .expect(expected_calls)
        .named("login")
        .mount(upstream)
        .await;
}

/// Drive one request through the router.
pub async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

pub fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

/// Assert the CORS and content-type headers every response must carry.
pub fn assert_gateway_headers(headers: &HeaderMap) {
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["content-type"], "application/json");
}
