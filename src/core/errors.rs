use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Missing required field: {0}")]
    MissingFieldError(String),

    #[error("Type registry has no `{0}` entry")]
    MissingDomainTypeError(String),

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Transport error: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Venue query error: {0}")]
    VenueQueryError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API error: {code} - {message}")]
    ApiError { code: i32, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),
}

impl ExchangeError {
    #[cold]
    #[inline(never)]
    pub fn schema(details: impl Into<String>) -> Self {
        Self::SchemaError(details.into())
    }

    #[cold]
    #[inline(never)]
    pub fn venue_query(details: impl Into<String>) -> Self {
        Self::VenueQueryError(details.into())
    }

    #[cold]
    #[inline(never)]
    pub fn signing(details: impl Into<String>) -> Self {
        Self::SigningError(details.into())
    }
}
