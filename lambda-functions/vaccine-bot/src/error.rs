use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort one invocation of the bot.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("failed to read disease catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("disease catalog {} is malformed: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("disease catalog {origin} is malformed or has no diseases")]
    EmptyCatalog { origin: String },

    #[error("disease catalog {origin} has a blank entry at index {index}")]
    BlankEntry { origin: String, index: usize },

    #[error("random source drew index {index} for a catalog of {len} entries")]
    SelectionOutOfRange { index: usize, len: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("required credential {name} is not defined")]
    MissingCredential { name: String },

    #[error("failed to read {name} from the parameter store: {message}")]
    SecretStore { name: String, message: String },

    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl BotError {
    /// Pipeline stage the error was raised in, for log context.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Io { .. }
            | Self::Parse { .. }
            | Self::EmptyCatalog { .. }
            | Self::BlankEntry { .. } => "load",
            Self::SelectionOutOfRange { .. } => "select",
            Self::MissingCredential { .. } | Self::SecretStore { .. } => "resolve",
            Self::Publish(_) => "publish",
        }
    }
}

/// Failures of the outbound "create post" call.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("failed to send post request: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("post rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("unexpected post confirmation body: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("failed to sign post request: {0}")]
    Signing(String),
}
