use std::time::Duration;

use chrono::Utc;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::credentials::Credentials;
use crate::error::PublishError;
use crate::oauth;

pub const DEFAULT_API_BASE_URL: &str = "https://api.twitter.com";

const CREATE_POST_PATH: &str = "2/tweets";

/// The platform's acknowledgement of a created post.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub id: String,
    pub text: String,
}

#[derive(Serialize)]
struct CreatePostRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct CreatePostResponse {
    data: Confirmation,
}

/// Posts status updates through the Twitter v2 API with OAuth1 user context.
pub struct TwitterPublisher {
    client: Client,
    endpoint: Url,
}

impl TwitterPublisher {
    pub fn new(timeout_secs: u64) -> Result<Self, PublishError> {
        Self::with_base_url(DEFAULT_API_BASE_URL, timeout_secs)
    }

    /// Points the publisher at another API root, e.g. a mock server.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, PublishError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("vaccine-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(CREATE_POST_PATH))
            .map_err(|e| PublishError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Creates one public post. Not retried on failure.
    pub async fn publish(
        &self,
        message: &str,
        credentials: &Credentials,
    ) -> Result<Confirmation, PublishError> {
        let nonce = Uuid::new_v4().simple().to_string();
        let header = oauth::authorization_header(
            "POST",
            self.endpoint.as_str(),
            credentials,
            &nonce,
            Utc::now().timestamp(),
        )?;

        info!("Sending tweet to {}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, header)
            .json(&CreatePostRequest { text: message })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        info!("Received response: HTTP {} {}", status.as_u16(), body);

        if !status.is_success() {
            error!("Tweet rejected with HTTP {}", status.as_u16());
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CreatePostResponse =
            serde_json::from_str(&body).map_err(PublishError::Deserialize)?;

        Ok(parsed.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let publisher = TwitterPublisher::new(30).unwrap();
        assert_eq!(
            publisher.endpoint().as_str(),
            "https://api.twitter.com/2/tweets"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalised() {
        let a = TwitterPublisher::with_base_url("http://localhost:8080", 5).unwrap();
        let b = TwitterPublisher::with_base_url("http://localhost:8080///", 5).unwrap();

        assert_eq!(a.endpoint(), b.endpoint());
        assert_eq!(a.endpoint().as_str(), "http://localhost:8080/2/tweets");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = TwitterPublisher::with_base_url("not a url", 5)
            .err()
            .expect("invalid base URL should be rejected");
        assert!(matches!(err, PublishError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_confirmation_parsing() {
        let body = r#"{"data":{"id":"1445880548472328192","text":"hello","edit_history_tweet_ids":["1445880548472328192"]}}"#;
        let parsed: CreatePostResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.data.id, "1445880548472328192");
        assert_eq!(parsed.data.text, "hello");
    }
}
