use crate::core::config::{ConfigError, ExchangeConfig};
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    ReqwestRest, RestClient, RestClientBuilder, RestClientConfig, Secp256k1TypedDataSigner,
};
use crate::exchanges::deepwaters::connector::DeepwatersConnector;
use crate::exchanges::deepwaters::rest::DeepwatersRest;
use crate::exchanges::deepwaters::signer::DeepwatersSigner;
use alloy_primitives::Address;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

pub const TESTNET_ACCOUNTING_URL: &str = "https://testnet.api.deepwaters.xyz/accounting";
pub const TESTNET_SWAP_URL: &str = "https://testnet.api.deepwaters.xyz/swap";

const EXCHANGE_NAME: &str = "deepwaters";

/// Builder for creating Deepwaters connectors
pub struct DeepwatersBuilder {
    config: ExchangeConfig,
    timeout_seconds: Option<u64>,
}

impl DeepwatersBuilder {
    pub fn new(config: ExchangeConfig) -> Self {
        Self {
            config,
            timeout_seconds: None,
        }
    }

    /// Override the HTTP request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Build a connector backed by reqwest
    pub fn build(self) -> Result<DeepwatersConnector<ReqwestRest>, ExchangeError> {
        let (accounting_url, swap_url) = self.endpoints()?;
        let accounting = self.build_rest_client(accounting_url)?;
        let swap = self.build_rest_client(swap_url)?;
        self.build_with_clients(accounting, swap)
    }

    /// Build a connector over caller-supplied transports
    pub fn build_with_clients<R: RestClient + Clone>(
        self,
        accounting: R,
        swap: R,
    ) -> Result<DeepwatersConnector<R>, ExchangeError> {
        let (signer, customer) = self.signer()?;
        debug!(customer = %customer, testnet = self.config.testnet, "deepwaters connector ready");
        Ok(DeepwatersConnector::new(
            DeepwatersRest::new(accounting, swap),
            signer,
            customer,
        ))
    }

    /// Accounting and swap base URLs. Mainnet has no built-in defaults.
    pub fn endpoints(&self) -> Result<(String, String), ExchangeError> {
        let resolve = |configured: &Option<String>, testnet_default: &str, var: &str| {
            match (configured, self.config.testnet) {
                (Some(url), _) => Ok(url.clone()),
                (None, true) => Ok(testnet_default.to_string()),
                (None, false) => Err(ConfigError::InvalidConfiguration(format!(
                    "{} must be set explicitly when testnet is disabled",
                    var
                ))),
            }
        };

        let accounting = resolve(
            &self.config.accounting_url,
            TESTNET_ACCOUNTING_URL,
            "accounting_url",
        )?;
        let swap = resolve(&self.config.swap_url, TESTNET_SWAP_URL, "swap_url")?;
        Ok((accounting, swap))
    }

    fn build_rest_client(&self, base_url: String) -> Result<ReqwestRest, ExchangeError> {
        let mut rest_config = RestClientConfig::new(base_url, EXCHANGE_NAME.to_string());
        if let Some(timeout_seconds) = self.timeout_seconds {
            rest_config = rest_config.with_timeout(timeout_seconds);
        }
        RestClientBuilder::new(rest_config).build()
    }

    fn signer(&self) -> Result<(DeepwatersSigner, Address), ExchangeError> {
        if !self.config.has_credentials() {
            return Err(ConfigError::InvalidConfiguration(
                "a private key is required to sign orders".to_string(),
            )
            .into());
        }

        let signer = Secp256k1TypedDataSigner::with_private_key(self.config.private_key())?;
        let derived = signer.address();

        if let Some(configured) = &self.config.address {
            let configured = Address::from_str(configured.trim()).map_err(|e| {
                ConfigError::InvalidConfiguration(format!("invalid address {:?}: {}", configured, e))
            })?;
            if configured != derived {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "address {} does not belong to the configured key (derived {})",
                    configured.to_checksum(None),
                    derived.to_checksum(None)
                ))
                .into());
            }
        }

        Ok((DeepwatersSigner::new(Arc::new(signer)), derived))
    }
}

/// Convenience function to build a Deepwaters connector
pub fn build_deepwaters_connector(
    config: ExchangeConfig,
) -> Result<DeepwatersConnector<ReqwestRest>, ExchangeError> {
    DeepwatersBuilder::new(config).build()
}
