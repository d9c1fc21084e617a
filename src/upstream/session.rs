//! Session authentication against the upstream API.
//!
//! # Responsibilities
//! - POST the static access token to the login endpoint
//! - Require the literal `true` confirmation body
//! - Extract the `apiCredentials` cookie from `Set-Cookie`
//!
//! # Design Decisions
//! - One attempt per inbound request, no retry
//! - The credential is never cached; every request logs in again

use axum::http::{header::SET_COOKIE, HeaderMap};
use reqwest::Client;

use crate::config::{AccessToken, UpstreamConfig};
use crate::observability::metrics;
use crate::upstream::types::{
    AuthenticationError, Credential, UpstreamResult, CREDENTIAL_COOKIE,
};

/// Performs the login handshake and returns a fresh session credential.
#[derive(Clone)]
pub struct SessionAuthenticator {
    client: Client,
    login_url: String,
    token: AccessToken,
}

impl SessionAuthenticator {
    /// Create an authenticator for the configured upstream.
    pub fn new(client: Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            login_url: format!(
                "{}{}",
                config.base_url.trim_end_matches('/'),
                config.login_path
            ),
            token: config.access_token.clone(),
        }
    }

    /// Log in and extract the session credential.
    pub async fn authenticate(&self) -> UpstreamResult<Credential> {
        tracing::debug!(url = %self.login_url, "Authenticating with upstream");

        let response = match self
            .client
            .post(&self.login_url)
            .query(&[("token", self.token.expose())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream_call("login", "transport_error");
                return Err(e.into());
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.inspect_err(|_| {
            metrics::record_upstream_call("login", "transport_error");
        })?;

        if body.trim() != "true" {
            tracing::warn!(status = %status, "Upstream rejected authentication");
            metrics::record_upstream_call("login", "rejected");
            return Err(AuthenticationError::Rejected.into());
        }

        match extract_credential(&headers) {
            Some(credential) => {
                metrics::record_upstream_call("login", "ok");
                Ok(credential)
            }
            None => {
                tracing::warn!(status = %status, "Login succeeded without a session cookie");
                metrics::record_upstream_call("login", "credential_missing");
                Err(AuthenticationError::CredentialMissing.into())
            }
        }
    }
}

/// Find the `apiCredentials` cookie across all `Set-Cookie` headers.
pub fn extract_credential(headers: &HeaderMap) -> Option<Credential> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(find_cookie_value)
        .map(Credential::from_cookie_value)
}

/// Case-insensitive lookup of `apiCredentials=<value>` inside a raw header.
///
/// The value runs up to the next `;`. The name must start the header or
/// follow a separator, so `xapiCredentials=` does not match.
fn find_cookie_value(raw: &str) -> Option<&str> {
    let needle = format!("{}=", CREDENTIAL_COOKIE.to_ascii_lowercase());
    let lowered = raw.to_ascii_lowercase();

    let mut offset = 0;
    while let Some(pos) = lowered[offset..].find(&needle) {
        let start = offset + pos;
        let at_boundary = raw[..start]
            .chars()
            .next_back()
            .map_or(true, |c| c == ';' || c == ',' || c.is_whitespace());

        if at_boundary {
            let rest = &raw[start + needle.len()..];
            let value = rest.split(';').next().unwrap_or_default().trim();
            if !value.is_empty() {
                return Some(value);
            }
        }
        offset = start + needle.len();
    }
    None
}
