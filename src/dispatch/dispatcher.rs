//! Request dispatcher.
//!
//! Validates the inbound operation, runs the authenticate-then-query
//! sequence and shapes the outcome into a [`GatewayResponse`]. Nothing
//! escapes this boundary: every failure becomes one JSON error body.

use std::collections::HashMap;
use std::time::Instant;

use axum::http::Method;
use reqwest::Client;
use tracing::Instrument;

use crate::config::{CorsConfig, GatewayConfig};
use crate::dispatch::error::{GatewayError, ValidationError};
use crate::dispatch::operation::{Operation, OperationRequest, OPERATION_PARAM};
use crate::http::request::InboundRequest;
use crate::http::response::GatewayResponse;
use crate::observability::metrics;
use crate::upstream::{ProxyResult, TransitClient};

/// Serves gateway requests. Holds no per-request state.
#[derive(Clone)]
pub struct Dispatcher {
    client: TransitClient,
    cors: CorsConfig,
}

impl Dispatcher {
    /// Build a dispatcher with its own HTTP client.
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("transit-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Build a dispatcher around an existing HTTP client.
    pub fn with_client(client: Client, config: &GatewayConfig) -> Self {
        Self {
            client: TransitClient::new(client, &config.upstream),
            cors: config.cors.clone(),
        }
    }

    /// Entry point for the hosting layer.
    ///
    /// `OPTIONS` is answered before anything else is looked at. Everything
    /// logged while handling the request carries its request ID.
    pub async fn handle_request(&self, request: &InboundRequest) -> GatewayResponse {
        let span = tracing::info_span!("gateway", request_id = %request.request_id);

        if request.method == Method::OPTIONS {
            span.in_scope(|| tracing::debug!("Answering preflight"));
            return GatewayResponse::preflight(&self.cors);
        }

        let operation = request.params.get(OPERATION_PARAM).map(String::as_str);
        self.handle(operation, &request.params)
            .instrument(span)
            .await
    }

    /// Validate, authenticate, query and shape the response.
    pub async fn handle(
        &self,
        operation: Option<&str>,
        params: &HashMap<String, String>,
    ) -> GatewayResponse {
        let start = Instant::now();
        let label = operation.unwrap_or("");

        let parsed = OperationRequest::parse(operation, params);
        let metric_label = match &parsed {
            Ok(request) => request.operation().name(),
            Err(_) => operation
                .and_then(Operation::from_name)
                .map_or("unknown", Operation::name),
        };

        let response = match self.execute(parsed).await {
            Ok(result) => {
                tracing::info!(operation = %label, status = %result.status, "Operation completed");
                GatewayResponse::json(result.status, &result.body, &self.cors)
            }
            Err(e) => {
                match &e {
                    GatewayError::Validation(v) => {
                        tracing::warn!(operation = %label, error = %v, "Rejected request")
                    }
                    GatewayError::Upstream(u) => {
                        tracing::error!(operation = %label, error = %u, "Operation failed")
                    }
                }
                GatewayResponse::json(e.status(), &e.body(label), &self.cors)
            }
        };

        metrics::record_request(metric_label, response.status.as_u16(), start);

        response
    }

    async fn execute(
        &self,
        parsed: Result<OperationRequest, ValidationError>,
    ) -> Result<ProxyResult, GatewayError> {
        let request = parsed?;
        let call = request.upstream_call();

        let credential = self.client.authenticate().await?;
        let result = self.client.query(&call, &credential).await?;

        Ok(result)
    }
}
