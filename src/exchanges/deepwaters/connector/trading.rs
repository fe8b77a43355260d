use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::OrderPlacer;
use crate::core::types::{CancelResult, OrderResult, SwapRequest};
use crate::exchanges::deepwaters::orders::{
    build_cancel_order, build_submit_order, CancelOrderParams, SubmitOrderParams,
};
use crate::exchanges::deepwaters::rest::DeepwatersRest;
use crate::exchanges::deepwaters::signer::DeepwatersSigner;
use crate::exchanges::deepwaters::types::{CancelOrderVariables, SubmitOrderVariables};
use alloy_primitives::Address;
use async_trait::async_trait;
use chrono::SecondsFormat;
use tracing::{info, instrument};

/// Order entry for Deepwaters
///
/// Each action fetches a fresh nonce, signs under it and submits once.
pub struct Trading<R: RestClient> {
    rest: DeepwatersRest<R>,
    signer: DeepwatersSigner,
    customer: Address,
}

impl<R: RestClient> Trading<R> {
    pub fn new(rest: DeepwatersRest<R>, signer: DeepwatersSigner, customer: Address) -> Self {
        Self {
            rest,
            signer,
            customer,
        }
    }

    pub fn customer(&self) -> Address {
        self.customer
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for Trading<R> {
    #[instrument(
        skip(self, request),
        fields(exchange = "deepwaters", base = %request.base_asset, quote = %request.quote_asset, side = %request.side)
    )]
    async fn swap(&self, request: SwapRequest) -> Result<OrderResult, ExchangeError> {
        let customer = self.customer.to_checksum(None);
        let nonce = self.rest.fetch_nonce(&customer).await?;

        let params = SubmitOrderParams::from_swap(self.customer, &request);
        let message = build_submit_order(&params, nonce)?;
        let signature = self.signer.sign_message(&message)?;

        // Variables repeat the signed values verbatim
        let variables = SubmitOrderVariables {
            customer,
            order_type: request.order_type.as_str().to_string(),
            side: request.side.as_str().to_string(),
            quantity: params.quantity.unwrap_or_default(),
            price: params.price.unwrap_or_default(),
            nonce: nonce.to_string(),
            signature: signature.to_hex(),
            base_asset_id: request.base_asset,
            quote_asset_id: request.quote_asset,
            duration_type: request.duration.as_str().to_string(),
            expires_at: request
                .expires_at
                .map(|expires_at| expires_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        };

        let result = self.rest.submit_order(variables).await?;
        info!(status = %result.status, venue_order_id = ?result.venue_order_id, "order submitted");
        Ok(result)
    }

    #[instrument(skip(self), fields(exchange = "deepwaters", order_id = %order_id))]
    async fn cancel(&self, order_id: String) -> Result<CancelResult, ExchangeError> {
        let customer = self.customer.to_checksum(None);
        let nonce = self.rest.fetch_nonce(&customer).await?;

        let params = CancelOrderParams {
            customer: Some(self.customer),
            customer_object_id: String::new(),
            order_id: Some(order_id),
        };
        let message = build_cancel_order(&params, nonce)?;
        let signature = self.signer.sign_message(&message)?;

        let variables = CancelOrderVariables {
            customer,
            customer_object_id: params.customer_object_id,
            order_id: params.order_id.unwrap_or_default(),
            nonce: nonce.to_string(),
            signature: signature.to_hex(),
        };

        let result = self.rest.cancel_order(variables).await?;
        info!(status = %result.status, "cancel submitted");
        Ok(result)
    }
}
