use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::AccountInfo;
use crate::core::types::Balance;
use crate::exchanges::deepwaters::rest::DeepwatersRest;
use crate::exchanges::deepwaters::types::CustomerInfo;
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use tracing::instrument;

/// Account queries against the accounting service
pub struct Account<R: RestClient> {
    rest: DeepwatersRest<R>,
    customer: Address,
}

impl<R: RestClient> Account<R> {
    pub fn new(rest: DeepwatersRest<R>, customer: Address) -> Self {
        Self { rest, customer }
    }

    /// Full customer record as the venue reports it
    #[instrument(skip(self), fields(exchange = "deepwaters"))]
    pub async fn get_customer(&self) -> Result<CustomerInfo, ExchangeError> {
        self.rest
            .get_customer(&self.customer.to_checksum(None))
            .await
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for Account<R> {
    #[instrument(skip(self), fields(exchange = "deepwaters"))]
    async fn get_nonce(&self) -> Result<U256, ExchangeError> {
        self.rest.fetch_nonce(&self.customer.to_checksum(None)).await
    }

    #[instrument(skip(self), fields(exchange = "deepwaters"))]
    async fn get_account_balance(&self) -> Result<Vec<Balance>, ExchangeError> {
        let customer = self.get_customer().await?;

        Ok(customer
            .balance
            .unwrap_or_default()
            .into_iter()
            .map(|balance| Balance {
                asset: balance.asset_id,
                service_id: balance.service_id,
                amount: balance.amount,
            })
            .collect())
    }
}
