use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const GRAPHQL_PATH: &str = "/graphql";

pub const CUSTOMER_INFO_QUERY: &str = "query Customer($address: String!) { customer(address: $address) { address nonce createdAt { time microsSinceEpoch __typename } modifiedAt { time microsSinceEpoch __typename } balance { assetID serviceID amount asset { assetAddress __typename } __typename } __typename } }";

pub const SUBMIT_ORDER_MUTATION: &str = "mutation SubmitOrder($customer: String!, $type: OrderType!, $side: OrderSide!, $quantity: String!, $baseAssetID: String!, $quoteAssetID: String, $price: String!, $nonce: BigInt!, $signature: String!, $expiresAt: Time, $durationType: OrderDurationType) { submitOrder( customer: $customer type: $type side: $side quantity: $quantity baseAssetID: $baseAssetID quoteAssetID: $quoteAssetID expiresAt: $expiresAt durationType: $durationType price: $price nonce: $nonce signature: $signature ) { order { status venueOrderID __typename } __typename } }";

pub const CANCEL_ORDER_MUTATION: &str = "mutation CancelOrder($customer: String!, $customerObjectID: String, $orderID: String!, $nonce: BigInt!, $signature: String!) { cancelOrder( customer: $customer customerObjectID: $customerObjectID orderID: $orderID nonce: $nonce signature: $signature ) { order { status venueOrderID __typename } __typename } }";

/// `{"query": ..., "variables": ...}` envelope POSTed to the GraphQL endpoint
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerVariables {
    pub address: String,
}

/// Submit-order variables. The nonce travels as a decimal string and the
/// signature as `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderVariables {
    pub customer: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub side: String,
    pub quantity: String,
    pub price: String,
    pub nonce: String,
    pub signature: String,
    #[serde(rename = "baseAssetID")]
    pub base_asset_id: String,
    #[serde(rename = "quoteAssetID")]
    pub quote_asset_id: String,
    pub duration_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelOrderVariables {
    pub customer: String,
    #[serde(rename = "customerObjectID")]
    pub customer_object_id: String,
    #[serde(rename = "orderID")]
    pub order_id: String,
    pub nonce: String,
    pub signature: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerData {
    pub customer: Option<CustomerInfo>,
}

/// Customer record. Everything except the nonce is informational, so
/// absent or null members decode to empty values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub nonce: Option<String>,
    #[serde(default)]
    pub created_at: Option<VenueTime>,
    #[serde(default)]
    pub modified_at: Option<VenueTime>,
    #[serde(default)]
    pub balance: Option<Vec<AssetBalance>>,
}

impl CustomerInfo {
    pub fn balances(&self) -> &[AssetBalance] {
        self.balance.as_deref().unwrap_or_default()
    }
}

/// Only the part of the customer reply that order signing depends on
#[derive(Debug, Clone, Deserialize)]
pub struct NonceData {
    pub customer: Option<CustomerNonce>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerNonce {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub nonce: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueTime {
    pub time: String,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub micros_since_epoch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetBalance {
    #[serde(rename = "assetID")]
    pub asset_id: String,
    #[serde(rename = "serviceID", default)]
    pub service_id: Option<String>,
    /// Raw decimal string; may exceed what fixed-precision types hold
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    #[serde(default)]
    pub asset: Option<AssetRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    pub asset_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderData {
    pub submit_order: Option<OrderEnvelope>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderData {
    pub cancel_order: Option<OrderEnvelope>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderEnvelope {
    pub order: Option<VenueOrder>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueOrder {
    pub status: String,
    #[serde(rename = "venueOrderID", default)]
    pub venue_order_id: Option<String>,
}

// BigInt scalars arrive as either JSON strings or numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submit_variables_wire_names() {
        let variables = SubmitOrderVariables {
            customer: "0xabc".to_string(),
            order_type: "LIMIT".to_string(),
            side: "BUY".to_string(),
            quantity: "0.0447".to_string(),
            price: "1250.09".to_string(),
            nonce: "7".to_string(),
            signature: "0x00".to_string(),
            base_asset_id: "WETH.X".to_string(),
            quote_asset_id: "USDC.X".to_string(),
            duration_type: "GOOD_TILL_CANCEL".to_string(),
            expires_at: None,
        };

        let value = serde_json::to_value(&variables).unwrap();
        assert_eq!(
            value,
            json!({
                "customer": "0xabc",
                "type": "LIMIT",
                "side": "BUY",
                "quantity": "0.0447",
                "price": "1250.09",
                "nonce": "7",
                "signature": "0x00",
                "baseAssetID": "WETH.X",
                "quoteAssetID": "USDC.X",
                "durationType": "GOOD_TILL_CANCEL"
            })
        );
    }

    #[test]
    fn test_customer_nonce_as_number_or_string() {
        let as_number: CustomerInfo =
            serde_json::from_value(json!({"address": "0xabc", "nonce": 12})).unwrap();
        let as_string: CustomerInfo =
            serde_json::from_value(json!({"address": "0xabc", "nonce": "12"})).unwrap();

        assert_eq!(as_number.nonce.as_deref(), Some("12"));
        assert_eq!(as_string.nonce.as_deref(), Some("12"));
        assert!(as_number.balances().is_empty());
    }

    #[test]
    fn test_customer_balances() {
        let response: GraphQlResponse<CustomerData> = serde_json::from_value(json!({
            "data": {
                "customer": {
                    "address": "0xabc",
                    "nonce": "3",
                    "createdAt": {"time": "2023-01-01T00:00:00Z", "microsSinceEpoch": 1672531200000000u64},
                    "balance": [
                        {"assetID": "USDC.X", "serviceID": "swap", "amount": "1500.25", "asset": {"assetAddress": "0x01"}},
                        {"assetID": "WETH.X", "amount": "123456789012345678901234567890"}
                    ]
                }
            }
        }))
        .unwrap();

        let customer = response.data.unwrap().customer.unwrap();
        let balances = customer.balances();
        assert_eq!(balances[0].asset_id, "USDC.X");
        assert_eq!(balances[0].amount, "1500.25");
        assert_eq!(balances[1].amount, "123456789012345678901234567890");
        assert_eq!(
            customer.created_at.unwrap().micros_since_epoch.as_deref(),
            Some("1672531200000000")
        );
    }

    #[test]
    fn test_null_members_are_tolerated() {
        let customer: CustomerInfo = serde_json::from_value(json!({
            "address": null,
            "nonce": null,
            "balance": null
        }))
        .unwrap();

        assert!(customer.address.is_none());
        assert!(customer.nonce.is_none());
        assert!(customer.balances().is_empty());
    }

    #[test]
    fn test_nonce_projection_ignores_other_members() {
        let data: NonceData = serde_json::from_value(json!({
            "customer": {
                "nonce": "7",
                "balance": [{"assetID": 5, "amount": {"bad": true}}]
            }
        }))
        .unwrap();
        assert_eq!(data.customer.unwrap().nonce.as_deref(), Some("7"));

        let missing: NonceData =
            serde_json::from_value(json!({"customer": {"address": "0xabc"}})).unwrap();
        assert!(missing.customer.unwrap().nonce.is_none());
    }
}
