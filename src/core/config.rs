use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// Credentials and endpoint selection for a venue connection.
///
/// Everything here is fixed at construction; nothing is discovered at runtime.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub address: Option<String>,
    pub private_key: Secret<String>,
    pub testnet: bool,
    pub accounting_url: Option<String>,
    pub swap_url: Option<String>,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 5)?;
        state.serialize_field("address", &self.address)?;
        state.serialize_field("private_key", "[REDACTED]")?;
        state.serialize_field("testnet", &self.testnet)?;
        state.serialize_field("accounting_url", &self.accounting_url)?;
        state.serialize_field("swap_url", &self.swap_url)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            #[serde(default)]
            address: Option<String>,
            private_key: String,
            #[serde(default = "default_testnet")]
            testnet: bool,
            #[serde(default)]
            accounting_url: Option<String>,
            #[serde(default)]
            swap_url: Option<String>,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            address: helper.address,
            private_key: Secret::new(helper.private_key),
            testnet: helper.testnet,
            accounting_url: helper.accounting_url,
            swap_url: helper.swap_url,
        })
    }
}

const fn default_testnet() -> bool {
    true
}

impl ExchangeConfig {
    /// Create a testnet configuration from a hex private key
    #[must_use]
    pub fn new(private_key: String) -> Self {
        Self {
            address: None,
            private_key: Secret::new(private_key),
            testnet: true,
            accounting_url: None,
            swap_url: None,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_PRIVATE_KEY` (e.g., `DEEPWATERS_PRIVATE_KEY`)
    /// - `{PREFIX}_ADDRESS` (optional, must match the key when set)
    /// - `{PREFIX}_TESTNET` (optional, defaults to true)
    /// - `{PREFIX}_ACCOUNTING_URL` (optional)
    /// - `{PREFIX}_SWAP_URL` (optional)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let private_key_var = format!("{}_PRIVATE_KEY", prefix);
        let testnet_var = format!("{}_TESTNET", prefix);

        let private_key = env::var(&private_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(private_key_var))?;

        let testnet = match env::var(&testnet_var) {
            Ok(raw) => raw.parse::<bool>().map_err(|_| {
                ConfigError::InvalidConfiguration(format!(
                    "{} must be `true` or `false`, got `{}`",
                    testnet_var, raw
                ))
            })?,
            Err(_) => default_testnet(),
        };

        Ok(Self {
            address: env::var(format!("{}_ADDRESS", prefix)).ok(),
            private_key: Secret::new(private_key),
            testnet,
            accounting_url: env::var(format!("{}_ACCOUNTING_URL", prefix)).ok(),
            swap_url: env::var(format!("{}_SWAP_URL", prefix)).ok(),
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    ///
    /// A missing file is not an error; system environment variables are used instead.
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(_) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Set testnet mode
    #[must_use]
    pub const fn testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    /// Pin the expected customer address
    #[must_use]
    pub fn address(mut self, address: String) -> Self {
        self.address = Some(address);
        self
    }

    /// Override the accounting (customer info) endpoint
    #[must_use]
    pub fn accounting_url(mut self, url: String) -> Self {
        self.accounting_url = Some(url);
        self
    }

    /// Override the swap (order entry) endpoint
    #[must_use]
    pub fn swap_url(mut self, url: String) -> Self {
        self.swap_url = Some(url);
        self
    }

    /// Check if a private key has been supplied
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.private_key.expose_secret().is_empty()
    }

    /// Get private key (use carefully - exposes secret)
    pub fn private_key(&self) -> &str {
        self.private_key.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
