//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{AccessToken, GatewayConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `upstream.access_token`.
pub const ACCESS_TOKEN_ENV_VAR: &str = "TRANSIT_GATEWAY_ACCESS_TOKEN";

/// Environment variable overriding `upstream.base_url`.
pub const UPSTREAM_URL_ENV_VAR: &str = "TRANSIT_GATEWAY_UPSTREAM_URL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load, apply environment overrides and validate configuration.
///
/// With no path, built-in defaults are the starting point.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_config(&fs::read_to_string(path).map_err(ConfigError::Io)?)?,
        None => GatewayConfig::default(),
    };

    finalize(config, |key| std::env::var(key).ok())
}

/// Parse TOML text without applying overrides or validation.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Apply overrides from `lookup` and validate.
pub fn finalize<F>(mut config: GatewayConfig, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup(ACCESS_TOKEN_ENV_VAR).filter(|v| !v.trim().is_empty()) {
        config.upstream.access_token = AccessToken::new(token.trim());
    }
    if let Some(url) = lookup(UPSTREAM_URL_ENV_VAR).filter(|v| !v.trim().is_empty()) {
        config.upstream.base_url = url.trim().to_string();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
