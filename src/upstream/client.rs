//! Authenticated data queries against the upstream API.

use axum::http::header::COOKIE;
use reqwest::Client;
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::session::SessionAuthenticator;
use crate::upstream::types::{Credential, ProxyResult, UpstreamCall, UpstreamError, UpstreamResult};

/// Client for the transit API: login handshake plus data queries.
#[derive(Clone)]
pub struct TransitClient {
    client: Client,
    base_url: String,
    authenticator: SessionAuthenticator,
}

impl TransitClient {
    /// Create a client sharing one `reqwest::Client` for both calls.
    pub fn new(client: Client, config: &UpstreamConfig) -> Self {
        Self {
            authenticator: SessionAuthenticator::new(client.clone(), config),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Obtain a fresh session credential.
    pub async fn authenticate(&self) -> UpstreamResult<Credential> {
        self.authenticator.authenticate().await
    }

    /// Full URL for a resolved call.
    pub fn url_for(&self, call: &UpstreamCall) -> String {
        format!("{}{}", self.base_url, call.target())
    }

    /// Issue the data query with the credential attached.
    ///
    /// Any status is returned as-is; only a non-JSON body is an error.
    pub async fn query(
        &self,
        call: &UpstreamCall,
        credential: &Credential,
    ) -> UpstreamResult<ProxyResult> {
        let url = self.url_for(call);
        tracing::debug!(path = %call.path, "Querying upstream");

        let response = match self
            .client
            .get(&url)
            .header(COOKIE, credential.header_value())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream_call("query", "transport_error");
                return Err(e.into());
            }
        };

        let status = response.status();
        let bytes = response.bytes().await.inspect_err(|_| {
            metrics::record_upstream_call("query", "transport_error");
        })?;

        let body: Value = serde_json::from_slice(&bytes).map_err(|source| {
            metrics::record_upstream_call("query", "malformed_body");
            UpstreamError::MalformedBody {
                status: status.as_u16(),
                source,
            }
        })?;

        if !status.is_success() {
            tracing::info!(status = %status, path = %call.path, "Passing through upstream error status");
        }
        metrics::record_upstream_call("query", "ok");

        Ok(ProxyResult { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_strips_trailing_slash() {
        let config = UpstreamConfig {
            base_url: "http://upstream.test/v2.1/".into(),
            ..UpstreamConfig::default()
        };
        let client = TransitClient::new(Client::new(), &config);
        let call = UpstreamCall {
            path: "/Linha/Buscar",
            query: "?termosBusca=8000".into(),
        };
        assert_eq!(
            client.url_for(&call),
            "http://upstream.test/v2.1/Linha/Buscar?termosBusca=8000"
        );
    }
}
