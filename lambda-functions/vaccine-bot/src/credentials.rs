use std::collections::HashMap;
use std::fmt;

use aws_config::BehaviorVersion;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::operation::get_parameter::GetParameterError;
use aws_sdk_ssm::Client as SsmClient;
use tracing::{info, warn};

use crate::error::BotError;

/// Lookup names of the four OAuth1 secrets.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialNames {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl Default for CredentialNames {
    fn default() -> Self {
        Self {
            consumer_key: "TWITTER_CONSUMER_KEY".to_string(),
            consumer_secret: "TWITTER_CONSUMER_SECRET".to_string(),
            access_token: "TWITTER_ACCESS_TOKEN".to_string(),
            access_secret: "TWITTER_ACCESS_SECRET".to_string(),
        }
    }
}

/// Resolved OAuth1 user-context credentials.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_secret", &"<redacted>")
            .finish()
    }
}

/// Snapshot of the process environment, taken once at the entry point.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSource {
    vars: HashMap<String, String>,
}

impl EnvironmentSource {
    pub fn new<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn from_process() -> Self {
        Self::new(std::env::vars())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn vars(&self) -> &HashMap<String, String> {
        &self.vars
    }
}

/// AWS SSM Parameter Store lookups under a fixed name prefix.
pub struct ParameterStoreSource {
    client: SsmClient,
    prefix: String,
}

impl ParameterStoreSource {
    pub fn new(client: SsmClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    pub async fn from_shared_config(prefix: impl Into<String>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(SsmClient::new(&config), prefix)
    }

    async fn lookup(&self, name: &str) -> Result<Option<String>, BotError> {
        let parameter = parameter_name(&self.prefix, name);

        match self
            .client
            .get_parameter()
            .name(&parameter)
            .with_decryption(true)
            .send()
            .await
        {
            Ok(output) => Ok(output
                .parameter()
                .and_then(|p| p.value())
                .map(str::to_string)),
            Err(e)
                if matches!(
                    e.as_service_error(),
                    Some(GetParameterError::ParameterNotFound(_))
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(BotError::SecretStore {
                name: parameter,
                message: DisplayErrorContext(&e).to_string(),
            }),
        }
    }
}

fn parameter_name(prefix: &str, name: &str) -> String {
    let mut full = prefix.to_string();
    if !full.is_empty() && !full.ends_with('/') {
        full.push('/');
    }
    full.push_str(name);
    full
}

/// Where credential values come from, selected by configuration.
pub enum SecretSource {
    Environment(EnvironmentSource),
    ParameterStore(ParameterStoreSource),
}

impl SecretSource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Environment(_) => "environment",
            Self::ParameterStore(_) => "parameter-store",
        }
    }

    /// Looks up one secret; `Ok(None)` when it is not defined.
    pub async fn lookup(&self, name: &str) -> Result<Option<String>, BotError> {
        match self {
            Self::Environment(env) => Ok(env.get(name).map(str::to_string)),
            Self::ParameterStore(store) => store.lookup(name).await,
        }
    }

    async fn require(&self, name: &str) -> Result<String, BotError> {
        match self.lookup(name).await? {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => {
                warn!("Required credential {} is missing from {}", name, self.kind());
                Err(BotError::MissingCredential {
                    name: name.to_string(),
                })
            }
        }
    }
}

/// Resolves all four credentials or fails on the first missing one.
pub async fn resolve(
    source: &SecretSource,
    names: &CredentialNames,
) -> Result<Credentials, BotError> {
    info!("Resolving Twitter credentials from {}", source.kind());

    Ok(Credentials {
        consumer_key: source.require(&names.consumer_key).await?,
        consumer_secret: source.require(&names.consumer_secret).await?,
        access_token: source.require(&names.access_token).await?,
        access_secret: source.require(&names.access_secret).await?,
    })
}
