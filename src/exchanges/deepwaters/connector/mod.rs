use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::{AccountInfo, ExchangeConnector, OrderPlacer};
use crate::core::types::{Balance, CancelResult, OrderResult, SwapRequest};
use crate::exchanges::deepwaters::rest::DeepwatersRest;
use crate::exchanges::deepwaters::signer::DeepwatersSigner;
use alloy_primitives::{Address, U256};
use async_trait::async_trait;

pub mod account;
pub mod trading;

pub use account::Account;
pub use trading::Trading;

/// Deepwaters connector that composes all sub-trait implementations
pub struct DeepwatersConnector<R: RestClient> {
    pub trading: Trading<R>,
    pub account: Account<R>,
}

impl<R: RestClient + Clone> DeepwatersConnector<R> {
    pub fn new(rest: DeepwatersRest<R>, signer: DeepwatersSigner, customer: Address) -> Self {
        Self {
            trading: Trading::new(rest.clone(), signer, customer),
            account: Account::new(rest, customer),
        }
    }
}

impl<R: RestClient> DeepwatersConnector<R> {
    /// Address orders are signed and submitted for
    pub fn customer(&self) -> Address {
        self.trading.customer()
    }
}

#[async_trait]
impl<R: RestClient> ExchangeConnector for DeepwatersConnector<R> {}

#[async_trait]
impl<R: RestClient> OrderPlacer for DeepwatersConnector<R> {
    async fn swap(&self, request: SwapRequest) -> Result<OrderResult, ExchangeError> {
        self.trading.swap(request).await
    }

    async fn cancel(&self, order_id: String) -> Result<CancelResult, ExchangeError> {
        self.trading.cancel(order_id).await
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for DeepwatersConnector<R> {
    async fn get_nonce(&self) -> Result<U256, ExchangeError> {
        self.account.get_nonce().await
    }

    async fn get_account_balance(&self) -> Result<Vec<Balance>, ExchangeError> {
        self.account.get_account_balance().await
    }
}
