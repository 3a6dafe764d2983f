use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::catalog::Catalog;
use crate::config::{Config, SecretSourceKind};
use crate::credentials::{self, EnvironmentSource, ParameterStoreSource, SecretSource};
use crate::error::{BotError, PublishError};
use crate::message;
use crate::publisher::TwitterPublisher;
use crate::selector::{self, RandomSource};

/// EventBridge scheduled-event envelope. Only logged.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ScheduledEvent {
    pub id: Option<String>,
    #[serde(rename = "detail-type")]
    pub detail_type: Option<String>,
    pub source: Option<String>,
    pub time: Option<String>,
    pub region: Option<String>,
}

impl ScheduledEvent {
    /// Any payload is accepted; fields that don't match are left empty.
    pub fn from_payload(payload: &Value) -> Self {
        Self::deserialize(payload).unwrap_or_default()
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Posted,
    DryRun,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Response {
    pub status: RunStatus,
    pub disease: String,
    pub message: String,
    pub tweet_id: Option<String>,
    pub timestamp: String,
}

pub struct VaccineBot {
    config: Config,
    secrets: SecretSource,
    publisher: TwitterPublisher,
}

impl VaccineBot {
    pub async fn new(config: Config, environment: EnvironmentSource) -> Result<Self, BotError> {
        let secrets = match config.secret_source {
            SecretSourceKind::Environment => SecretSource::Environment(environment),
            SecretSourceKind::ParameterStore => SecretSource::ParameterStore(
                ParameterStoreSource::from_shared_config(config.parameter_prefix.clone()).await,
            ),
        };

        let publisher =
            TwitterPublisher::with_base_url(&config.api_base_url, config.http_timeout_secs)
                .map_err(|e| match e {
                    PublishError::InvalidBaseUrl(url) => {
                        BotError::Config(format!("TWITTER_API_BASE_URL is not a valid URL: {url}"))
                    }
                    other => BotError::Publish(other),
                })?;

        Ok(Self {
            config,
            secrets,
            publisher,
        })
    }

    /// Runs the pipeline once. The first failing stage aborts the run.
    pub async fn run(&self, rng: &mut dyn RandomSource) -> Result<Response, BotError> {
        let result = self.run_pipeline(rng).await;
        if let Err(e) = &result {
            error!(stage = e.stage(), "Invocation failed: {}", e);
        }
        result
    }

    async fn run_pipeline(&self, rng: &mut dyn RandomSource) -> Result<Response, BotError> {
        let catalog = Catalog::load(&self.config.catalog_path)?;
        let disease = selector::pick(&catalog, rng)?.to_string();
        let tweet = message::build(&disease);
        info!("Created new tweet: {}", tweet);

        if self.config.dry_run {
            info!("Dry run enabled, not sending tweet");
            return Ok(Response {
                status: RunStatus::DryRun,
                disease,
                message: tweet,
                tweet_id: None,
                timestamp: Utc::now().to_rfc3339(),
            });
        }

        let credentials = credentials::resolve(&self.secrets, &self.config.credential_names).await?;

        info!("Creating new Twitter client");
        let confirmation = self.publisher.publish(&tweet, &credentials).await?;
        info!("Tweet {} posted", confirmation.id);

        Ok(Response {
            status: RunStatus::Posted,
            disease,
            message: tweet,
            tweet_id: Some(confirmation.id),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
