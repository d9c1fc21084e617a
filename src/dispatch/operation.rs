//! Operation parsing and endpoint mapping.

use std::collections::HashMap;
use std::fmt;

use crate::dispatch::error::ValidationError;
use crate::upstream::UpstreamCall;

/// Query parameter selecting the operation.
pub const OPERATION_PARAM: &str = "operation";

/// Operations the gateway supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Search bus lines by free-text terms.
    SearchByTerms,
    /// Arrival forecast for every stop of a line.
    ForecastByLine,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::SearchByTerms, Operation::ForecastByLine];

    /// Wire name used in the `operation` query parameter.
    pub fn name(self) -> &'static str {
        match self {
            Operation::SearchByTerms => "buscar",
            Operation::ForecastByLine => "previsao",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    pub fn supported_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|op| op.name()).collect()
    }

    /// Accepted parameter names, canonical first.
    fn parameter_names(self) -> &'static [&'static str] {
        match self {
            Operation::SearchByTerms => &["termosBusca", "searchTerms"],
            Operation::ForecastByLine => &["codigoLinha", "lineCode"],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated operation with its required parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    SearchByTerms { search_terms: String },
    ForecastByLine { line_code: String },
}

impl OperationRequest {
    /// Validate `operation` and its parameters. Performs no I/O.
    pub fn parse(
        operation: Option<&str>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ValidationError> {
        let op = operation
            .and_then(Operation::from_name)
            .ok_or_else(|| ValidationError::UnsupportedOperation {
                received: operation.map(str::to_string),
            })?;

        let names = op.parameter_names();
        let value = names
            .iter()
            .find_map(|name| params.get(*name).filter(|v| !v.is_empty()))
            .cloned()
            .ok_or(ValidationError::MissingParameter {
                operation: op,
                parameter: names[0],
            })?;

        Ok(match op {
            Operation::SearchByTerms => OperationRequest::SearchByTerms {
                search_terms: value,
            },
            Operation::ForecastByLine => OperationRequest::ForecastByLine { line_code: value },
        })
    }

    pub fn operation(&self) -> Operation {
        match self {
            OperationRequest::SearchByTerms { .. } => Operation::SearchByTerms,
            OperationRequest::ForecastByLine { .. } => Operation::ForecastByLine,
        }
    }

    /// Resolve the upstream endpoint and query string.
    ///
    /// Search terms are percent-encoded; the line code is sent verbatim.
    pub fn upstream_call(&self) -> UpstreamCall {
        match self {
            OperationRequest::SearchByTerms { search_terms } => UpstreamCall {
                path: "/Linha/Buscar",
                query: format!("?termosBusca={}", urlencoding::encode(search_terms)),
            },
            OperationRequest::ForecastByLine { line_code } => UpstreamCall {
                path: "/Previsao/Linha",
                query: format!("?codigoLinha={}", line_code),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_search_resolves_endpoint() {
        let request =
            OperationRequest::parse(Some("buscar"), &params(&[("termosBusca", "8000")])).unwrap();
        assert_eq!(request.upstream_call().target(), "/Linha/Buscar?termosBusca=8000");
    }

    #[test]
    fn test_forecast_resolves_endpoint() {
        let request =
            OperationRequest::parse(Some("previsao"), &params(&[("codigoLinha", "1012")]))
                .unwrap();
        assert_eq!(
            request.upstream_call().target(),
            "/Previsao/Linha?codigoLinha=1012"
        );
    }

    #[test]
    fn test_search_terms_are_percent_encoded() {
        let request = OperationRequest::parse(
            Some("buscar"),
            &params(&[("termosBusca", "Lapa & Sé")]),
        )
        .unwrap();
        assert_eq!(
            request.upstream_call().query,
            "?termosBusca=Lapa%20%26%20S%C3%A9"
        );
    }

    #[test]
    fn test_line_code_is_not_encoded() {
        let request =
            OperationRequest::parse(Some("previsao"), &params(&[("codigoLinha", "33&x")]))
                .unwrap();
        assert_eq!(request.upstream_call().query, "?codigoLinha=33&x");
    }

    #[test]
    fn test_english_aliases_accepted() {
        let request =
            OperationRequest::parse(Some("buscar"), &params(&[("searchTerms", "Lapa")])).unwrap();
        assert_eq!(
            request,
            OperationRequest::SearchByTerms {
                search_terms: "Lapa".into()
            }
        );

        let request =
            OperationRequest::parse(Some("previsao"), &params(&[("lineCode", "1012")])).unwrap();
        assert_eq!(request.operation(), Operation::ForecastByLine);
    }

    #[test]
    fn test_canonical_name_preferred() {
        let request = OperationRequest::parse(
            Some("buscar"),
            &params(&[("termosBusca", "canonical"), ("searchTerms", "alias")]),
        )
        .unwrap();
        assert_eq!(
            request,
            OperationRequest::SearchByTerms {
                search_terms: "canonical".into()
            }
        );
    }

    #[test]
    fn test_missing_parameter() {
        let err = OperationRequest::parse(Some("buscar"), &HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingParameter {
                operation: Operation::SearchByTerms,
                parameter: "termosBusca"
            }
        );
    }

    #[test]
    fn test_empty_parameter_is_missing() {
        let err = OperationRequest::parse(Some("previsao"), &params(&[("codigoLinha", "")]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingParameter { parameter: "codigoLinha", .. }));
    }

    #[test]
    fn test_unknown_operation() {
        let err = OperationRequest::parse(Some("desconhecida"), &HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedOperation {
                received: Some("desconhecida".into())
            }
        );
    }

    #[test]
    fn test_absent_operation() {
        let err = OperationRequest::parse(None, &params(&[("termosBusca", "8000")])).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedOperation { received: None });
    }

    #[test]
    fn test_operation_names_are_case_sensitive() {
        assert!(Operation::from_name("BUSCAR").is_none());
        assert_eq!(Operation::from_name("buscar"), Some(Operation::SearchByTerms));
        assert_eq!(Operation::supported_names(), vec!["buscar", "previsao"]);
    }
}
