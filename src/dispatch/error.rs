//! Dispatcher error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

use crate::dispatch::operation::Operation;
use crate::upstream::UpstreamError;

/// Inbound request rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported operation: {}", received.as_deref().unwrap_or("<none>"))]
    UnsupportedOperation { received: Option<String> },

    #[error("missing required parameter '{parameter}' for operation '{operation}'")]
    MissingParameter {
        operation: Operation,
        parameter: &'static str,
    },
}

/// Everything that can go wrong while serving one request.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl GatewayError {
    /// Validation failures are client errors; everything else is a 500.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON error body. `operation` is the name the caller asked for.
    pub fn body(&self, operation: &str) -> Value {
        match self {
            GatewayError::Validation(ValidationError::UnsupportedOperation { received }) => json!({
                "error": self.to_string(),
                "received": received,
                "supported": Operation::supported_names(),
            }),
            GatewayError::Validation(ValidationError::MissingParameter { parameter, .. }) => json!({
                "error": self.to_string(),
                "parameter": parameter,
            }),
            GatewayError::Upstream(e) => json!({
                "error": format!("gateway failure in operation '{}': {}", operation, e),
                "operation": operation,
                "detail": e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::AuthenticationError;

    #[test]
    fn test_unsupported_operation_body() {
        let err = GatewayError::from(ValidationError::UnsupportedOperation {
            received: Some("desconhecida".into()),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let body = err.body("desconhecida");
        assert_eq!(body["received"], "desconhecida");
        assert_eq!(body["supported"], json!(["buscar", "previsao"]));
        assert_eq!(body["error"], "unsupported operation: desconhecida");
    }

    #[test]
    fn test_absent_operation_body() {
        let err = GatewayError::from(ValidationError::UnsupportedOperation { received: None });
        let body = err.body("");
        assert!(body["received"].is_null());
        assert_eq!(body["error"], "unsupported operation: <none>");
    }

    #[test]
    fn test_missing_parameter_body() {
        let err = GatewayError::from(ValidationError::MissingParameter {
            operation: Operation::ForecastByLine,
            parameter: "codigoLinha",
        });
        let body = err.body("previsao");
        assert_eq!(body["parameter"], "codigoLinha");
        assert!(body["error"].as_str().unwrap().contains("missing required parameter"));
    }

    #[test]
    fn test_upstream_failure_body_names_operation() {
        let err = GatewayError::from(UpstreamError::from(AuthenticationError::Rejected));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = err.body("buscar");
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("buscar"));
        assert!(message.contains("authentication rejected"));
        assert_eq!(body["operation"], "buscar");
    }
}
