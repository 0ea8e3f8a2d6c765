//! Fact service: one HTTP GET per request, `{base_url}/{number}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::config::FactsConfig;

/// Errors from fetching a fact.
#[derive(Debug, Error)]
pub enum FactError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fact service returned {status} for '{url}'")]
    Status { url: String, status: u16 },

    #[error("Fact service returned an empty body for '{url}'")]
    EmptyBody { url: String },
}

/// Source of trivia about numbers.
#[async_trait]
pub trait FactService: Send + Sync {
    async fn fetch(&self, number: i64) -> Result<String, FactError>;
}

/// [`FactService`] backed by a numbersapi-style endpoint.
pub struct NumbersApiClient {
    client: Client,
    base_url: String,
}

impl NumbersApiClient {
    pub fn new(config: &FactsConfig) -> Result<Self, FactError> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(u64::from(seconds)));
        }
        let client = builder.build().map_err(FactError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, number: i64) -> String {
        format!("{}/{}", self.base_url, number)
    }
}

#[async_trait]
impl FactService for NumbersApiClient {
    async fn fetch(&self, number: i64) -> Result<String, FactError> {
        let url = self.url_for(number);
        tracing::debug!(url = %url, "Requesting fact");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FactError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FactError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FactError::Request {
                url: url.clone(),
                source,
            })?;
        let text = String::from_utf8_lossy(&body).trim().to_string();
        if text.is_empty() {
            return Err(FactError::EmptyBody { url });
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> FactsConfig {
        FactsConfig {
            base_url: base_url.to_string(),
            ..FactsConfig::default()
        }
    }

    #[test]
    fn url_appends_number_as_path() {
        let client = NumbersApiClient::new(&config("http://numberapi.com")).unwrap();
        assert_eq!(client.url_for(42), "http://numberapi.com/42");
        assert_eq!(client.url_for(-3), "http://numberapi.com/-3");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = NumbersApiClient::new(&config("http://localhost:9000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
        assert_eq!(client.url_for(0), "http://localhost:9000/0");
    }

    #[test]
    fn status_error_message() {
        let err = FactError::Status {
            url: "http://numberapi.com/1".into(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "Fact service returned 503 for 'http://numberapi.com/1'"
        );
    }
}
