use crate::core::config::ConfigError;
use crate::core::errors::ExchangeError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{instrument, trace};

/// JSON-over-HTTP transport the venue gateways are written against.
///
/// One request, one reply. Connection failures and timeouts surface as
/// `TransportError` and are never retried here; a timed-out request may
/// still have reached the venue.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// POST `body` to `endpoint` (relative to the base URL) and return the
    /// decoded JSON reply.
    async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, ExchangeError>;
}

#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL, stored without a trailing slash
    pub base_url: String,
    /// Venue name recorded on tracing spans
    pub exchange_name: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            exchange_name,
            timeout_seconds: 30,
            user_agent: "DeepwatersClient/0.1".to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

pub struct RestClientBuilder {
    config: RestClientConfig,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ConfigError::InvalidConfiguration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
        })
    }
}

/// `RestClient` over a pooled reqwest client
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn new(base_url: String, exchange_name: String) -> Result<Self, ExchangeError> {
        RestClientBuilder::new(RestClientConfig::new(base_url, exchange_name)).build()
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    // Non-2xx replies keep their body so venue diagnostics reach the caller
    async fn read_reply(&self, response: Response) -> Result<Value, ExchangeError> {
        let status = response.status();
        let text = response.text().await?;
        trace!(%status, body = %text, "reply received");

        if !status.is_success() {
            return Err(ExchangeError::ApiError {
                code: i32::from(status.as_u16()),
                message: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, body), fields(exchange = %self.config.exchange_name, endpoint = %endpoint))]
    async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, ExchangeError> {
        let response = self
            .client
            .post(self.build_url(endpoint))
            .json(body)
            .send()
            .await?;

        self.read_reply(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RestClientConfig::new(
            "https://testnet.api.deepwaters.xyz/swap/".to_string(),
            "deepwaters".to_string(),
        );

        assert_eq!(config.base_url, "https://testnet.api.deepwaters.xyz/swap");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_build_url() {
        let rest = ReqwestRest::new(
            "https://testnet.api.deepwaters.xyz/accounting".to_string(),
            "deepwaters".to_string(),
        )
        .unwrap();

        assert_eq!(
            rest.build_url("/graphql"),
            "https://testnet.api.deepwaters.xyz/accounting/graphql"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 1 on loopback refuses connections
        let rest = RestClientBuilder::new(
            RestClientConfig::new("http://127.0.0.1:1".to_string(), "deepwaters".to_string())
                .with_timeout(5),
        )
        .build()
        .unwrap();

        let result = rest.post("/graphql", &serde_json::json!({})).await;
        assert!(matches!(result, Err(ExchangeError::TransportError(_))));
    }
}
