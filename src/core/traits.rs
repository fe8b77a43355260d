use crate::core::{
    errors::ExchangeError,
    types::{Balance, CancelResult, OrderResult, SwapRequest},
};
use alloy_primitives::U256;
use async_trait::async_trait;

#[async_trait]
pub trait OrderPlacer {
    /// Sign and submit a swap order under a freshly fetched nonce
    async fn swap(&self, request: SwapRequest) -> Result<OrderResult, ExchangeError>;

    /// Sign and submit a cancellation for a venue order id
    async fn cancel(&self, order_id: String) -> Result<CancelResult, ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    /// Current venue nonce for the configured customer; never cached
    async fn get_nonce(&self) -> Result<U256, ExchangeError>;

    async fn get_account_balance(&self) -> Result<Vec<Balance>, ExchangeError>;
}

/// Everything a venue connector offers
#[async_trait]
pub trait ExchangeConnector: OrderPlacer + AccountInfo {}
