use super::types::{
    CancelOrderData, CancelOrderVariables, CustomerData, CustomerInfo, CustomerVariables,
    GraphQlRequest, GraphQlResponse, NonceData, SubmitOrderData, SubmitOrderVariables,
    CANCEL_ORDER_MUTATION, CUSTOMER_INFO_QUERY, GRAPHQL_PATH, SUBMIT_ORDER_MUTATION,
};
use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::{CancelResult, OrderResult};
use alloy_primitives::U256;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Thin typed wrapper over the two Deepwaters GraphQL endpoints
///
/// Customer queries go to the accounting service, order mutations to the swap
/// service. Each call is a single POST; nothing is retried.
#[derive(Clone)]
pub struct DeepwatersRest<R: RestClient> {
    accounting: R,
    swap: R,
}

impl<R: RestClient> DeepwatersRest<R> {
    pub fn new(accounting: R, swap: R) -> Self {
        Self { accounting, swap }
    }

    async fn execute<V, T>(
        client: &R,
        operation: &str,
        query: &str,
        variables: V,
    ) -> Result<T, ExchangeError>
    where
        V: Serialize + Send,
        T: DeserializeOwned + Send,
    {
        let request = GraphQlRequest { query, variables };
        let body = serde_json::to_value(&request)?;

        let reply = client.post(GRAPHQL_PATH, &body).await?;
        let response: GraphQlResponse<T> = serde_json::from_value(reply)?;

        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            let message = errors
                .iter()
                .map(|error| error.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(operation, %message, "venue rejected request");
            return Err(ExchangeError::venue_query(message));
        }

        response
            .data
            .ok_or_else(|| ExchangeError::venue_query(format!("{}: response has no data", operation)))
    }

    /// Query the customer record for an address
    #[instrument(skip(self), fields(exchange = "deepwaters"))]
    pub async fn get_customer(&self, address: &str) -> Result<CustomerInfo, ExchangeError> {
        let variables = CustomerVariables {
            address: address.to_string(),
        };
        let data: CustomerData =
            Self::execute(&self.accounting, "customer", CUSTOMER_INFO_QUERY, variables).await?;

        data.customer
            .ok_or_else(|| ExchangeError::venue_query("data.customer is missing"))
    }

    /// Current venue nonce for an address. Always a fresh query.
    ///
    /// Only `data.customer.nonce` is decoded, so malformed informational
    /// members of the reply cannot block order entry.
    #[instrument(skip(self), fields(exchange = "deepwaters"))]
    pub async fn fetch_nonce(&self, address: &str) -> Result<U256, ExchangeError> {
        let variables = CustomerVariables {
            address: address.to_string(),
        };
        let data: NonceData =
            Self::execute(&self.accounting, "customer", CUSTOMER_INFO_QUERY, variables).await?;

        let raw = data
            .customer
            .ok_or_else(|| ExchangeError::venue_query("data.customer is missing"))?
            .nonce
            .ok_or_else(|| ExchangeError::venue_query("data.customer.nonce is missing"))?;
        let nonce = parse_nonce(&raw)?;
        debug!(%nonce, "fetched nonce");
        Ok(nonce)
    }

    #[instrument(skip(self, variables), fields(exchange = "deepwaters", nonce = %variables.nonce))]
    pub async fn submit_order(
        &self,
        variables: SubmitOrderVariables,
    ) -> Result<OrderResult, ExchangeError> {
        let data: SubmitOrderData =
            Self::execute(&self.swap, "submitOrder", SUBMIT_ORDER_MUTATION, variables).await?;

        let order = data
            .submit_order
            .and_then(|envelope| envelope.order)
            .ok_or_else(|| ExchangeError::venue_query("data.submitOrder.order is missing"))?;

        // Status is passed through as-is; rejected orders may carry no id
        Ok(OrderResult {
            status: order.status,
            venue_order_id: order.venue_order_id,
        })
    }

    #[instrument(skip(self, variables), fields(exchange = "deepwaters", order_id = %variables.order_id))]
    pub async fn cancel_order(
        &self,
        variables: CancelOrderVariables,
    ) -> Result<CancelResult, ExchangeError> {
        let data: CancelOrderData =
            Self::execute(&self.swap, "cancelOrder", CANCEL_ORDER_MUTATION, variables).await?;

        let order = data
            .cancel_order
            .and_then(|envelope| envelope.order)
            .ok_or_else(|| ExchangeError::venue_query("data.cancelOrder.order is missing"))?;

        Ok(CancelResult {
            status: order.status,
            venue_order_id: order.venue_order_id,
        })
    }
}

fn parse_nonce(raw: &str) -> Result<U256, ExchangeError> {
    let digits = raw.trim();
    if digits.is_empty() {
        return Err(ExchangeError::venue_query("nonce is empty"));
    }
    U256::from_str_radix(digits, 10)
        .map_err(|e| ExchangeError::venue_query(format!("invalid nonce {:?}: {}", raw, e)))
}
