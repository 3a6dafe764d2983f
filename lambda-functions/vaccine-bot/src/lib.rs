pub mod catalog;
pub mod config;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod message;
pub mod oauth;
pub mod publisher;
pub mod selector;

pub use catalog::Catalog;
pub use config::{Config, SecretSourceKind};
pub use credentials::{
    resolve, CredentialNames, Credentials, EnvironmentSource, ParameterStoreSource, SecretSource,
};
pub use error::{BotError, PublishError};
pub use handler::{Response, RunStatus, ScheduledEvent, VaccineBot};
pub use message::build;
pub use publisher::{Confirmation, TwitterPublisher};
pub use selector::{pick, RandomSource, StdRandom};
