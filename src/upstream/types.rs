//! Upstream data types and error definitions.

use std::fmt;

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Cookie name carrying the upstream session.
pub const CREDENTIAL_COOKIE: &str = "apiCredentials";

/// Session credential returned by the login handshake.
///
/// Holds the full `apiCredentials=<value>` pair, ready to be sent as a
/// `Cookie` header. `Debug` never shows the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Build from the bare cookie value.
    pub fn from_cookie_value(value: &str) -> Self {
        Self(format!("{}={}", CREDENTIAL_COOKIE, value))
    }

    /// The `name=value` pair for a `Cookie` request header.
    pub fn header_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({}=<redacted>)", CREDENTIAL_COOKIE)
    }
}

/// Resolved upstream endpoint for a data query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCall {
    /// Endpoint path, e.g. `/Linha/Buscar`.
    pub path: &'static str,
    /// Query string including the leading `?`.
    pub query: String,
}

impl UpstreamCall {
    /// Path and query, to be appended to the upstream base URL.
    pub fn target(&self) -> String {
        format!("{}{}", self.path, self.query)
    }
}

/// Status and JSON body returned by the data query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResult {
    pub status: StatusCode,
    pub body: Value,
}

/// Login handshake failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    /// Login body was not the literal `true`.
    #[error("authentication rejected")]
    Rejected,

    /// No `apiCredentials` cookie in the login response.
    #[error("session credential missing")]
    CredentialMissing,
}

/// Errors that can occur while talking to the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Login handshake did not produce a credential.
    #[error("authentication failed: {0}")]
    Authentication(#[from] AuthenticationError),

    /// Network-level failure on either call (DNS, connect, read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Data query answered with a body that is not JSON.
    #[error("upstream returned status {status} with malformed JSON: {source}")]
    MalformedBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_format() {
        let credential = Credential::from_cookie_value("abc123");
        assert_eq!(credential.header_value(), "apiCredentials=abc123");
    }

    #[test]
    fn test_credential_debug_redacted() {
        let credential = Credential::from_cookie_value("abc123");
        assert!(!format!("{:?}", credential).contains("abc123"));
    }

    #[test]
    fn test_call_target() {
        let call = UpstreamCall {
            path: "/Previsao/Linha",
            query: "?codigoLinha=1012".into(),
        };
        assert_eq!(call.target(), "/Previsao/Linha?codigoLinha=1012");
    }

    #[test]
    fn test_error_display() {
        let err = UpstreamError::from(AuthenticationError::Rejected);
        assert_eq!(err.to_string(), "authentication failed: authentication rejected");

        let err = UpstreamError::from(AuthenticationError::CredentialMissing);
        assert!(err.to_string().contains("session credential missing"));
    }
}
