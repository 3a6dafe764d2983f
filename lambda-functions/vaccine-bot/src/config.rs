use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use bon::Builder;

use crate::catalog::DEFAULT_CATALOG_PATH;
use crate::credentials::CredentialNames;
use crate::error::BotError;
use crate::publisher::DEFAULT_API_BASE_URL;

pub const DEFAULT_PARAMETER_PREFIX: &str = "/vaccine-bot/";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretSourceKind {
    #[default]
    Environment,
    ParameterStore,
}

impl FromStr for SecretSourceKind {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "environment" | "env" => Ok(Self::Environment),
            "parameter-store" | "ssm" => Ok(Self::ParameterStore),
            other => Err(BotError::Config(format!(
                "SECRET_SOURCE must be 'environment' or 'parameter-store', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for SecretSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "environment"),
            Self::ParameterStore => write!(f, "parameter-store"),
        }
    }
}

/// Invocation settings, built once at the entry point.
#[derive(Builder, Debug, Clone)]
pub struct Config {
    #[builder(into, default = PathBuf::from(DEFAULT_CATALOG_PATH))]
    pub catalog_path: PathBuf,

    #[builder(default)]
    pub secret_source: SecretSourceKind,

    #[builder(into, default = DEFAULT_PARAMETER_PREFIX.to_string())]
    pub parameter_prefix: String,

    #[builder(into, default = DEFAULT_API_BASE_URL.to_string())]
    pub api_base_url: String,

    #[builder(default = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,

    /// Log the message instead of posting it.
    #[builder(default)]
    pub dry_run: bool,

    #[builder(default)]
    pub credential_names: CredentialNames,
}

impl Config {
    /// Parses settings out of an environment snapshot.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, BotError> {
        let get = |name: &str| vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let secret_source = get("SECRET_SOURCE")
            .map(SecretSourceKind::from_str)
            .transpose()?
            .unwrap_or_default();

        let http_timeout_secs = get("HTTP_TIMEOUT_SECS")
            .map(|v| {
                v.parse::<u64>().map_err(|e| {
                    BotError::Config(format!("HTTP_TIMEOUT_SECS '{v}' is not a number: {e}"))
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        let dry_run = get("DRY_RUN").map(parse_flag).transpose()?.unwrap_or(false);

        Ok(Self::builder()
            .catalog_path(get("DISEASES_FILE").unwrap_or(DEFAULT_CATALOG_PATH))
            .secret_source(secret_source)
            .parameter_prefix(get("SSM_PARAMETER_PREFIX").unwrap_or(DEFAULT_PARAMETER_PREFIX))
            .api_base_url(get("TWITTER_API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL))
            .http_timeout_secs(http_timeout_secs)
            .dry_run(dry_run)
            .build())
    }
}

fn parse_flag(value: &str) -> Result<bool, BotError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(BotError::Config(format!(
            "DRY_RUN must be true or false, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(&HashMap::new()).unwrap();

        assert_eq!(config.catalog_path, PathBuf::from("diseases.json"));
        assert_eq!(config.secret_source, SecretSourceKind::Environment);
        assert_eq!(config.parameter_prefix, "/vaccine-bot/");
        assert_eq!(config.api_base_url, "https://api.twitter.com");
        assert_eq!(config.http_timeout_secs, 30);
        assert!(!config.dry_run);
        assert_eq!(config.credential_names, CredentialNames::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(&vars(&[
            ("DISEASES_FILE", "/opt/diseases.json"),
            ("SECRET_SOURCE", "parameter-store"),
            ("SSM_PARAMETER_PREFIX", "/prod/bot/"),
            ("TWITTER_API_BASE_URL", "http://localhost:9000"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("DRY_RUN", "yes"),
        ]))
        .unwrap();

        assert_eq!(config.catalog_path, PathBuf::from("/opt/diseases.json"));
        assert_eq!(config.secret_source, SecretSourceKind::ParameterStore);
        assert_eq!(config.parameter_prefix, "/prod/bot/");
        assert_eq!(config.api_base_url, "http://localhost:9000");
        assert_eq!(config.http_timeout_secs, 5);
        assert!(config.dry_run);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = Config::from_vars(&vars(&[("DISEASES_FILE", " "), ("DRY_RUN", "")])).unwrap();

        assert_eq!(config.catalog_path, PathBuf::from("diseases.json"));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_vars(&vars(&[("SECRET_SOURCE", "vault")])).unwrap_err();
        assert!(err.to_string().contains("vault"));
        assert_eq!(err.stage(), "config");

        assert!(Config::from_vars(&vars(&[("HTTP_TIMEOUT_SECS", "soon")])).is_err());
        assert!(Config::from_vars(&vars(&[("DRY_RUN", "maybe")])).is_err());
    }

    #[test]
    fn test_secret_source_kind_round_trip() {
        for kind in [SecretSourceKind::Environment, SecretSourceKind::ParameterStore] {
            assert_eq!(kind.to_string().parse::<SecretSourceKind>().unwrap(), kind);
        }
        assert_eq!(
            "SSM".parse::<SecretSourceKind>().unwrap(),
            SecretSourceKind::ParameterStore
        );
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .catalog_path("fixtures/diseases.json")
            .dry_run(true)
            .build();

        assert_eq!(config.catalog_path, PathBuf::from("fixtures/diseases.json"));
        assert!(config.dry_run);
        assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
    }
}
