//! Typed-message builders for Deepwaters order actions.
//!
//! The field tables below are the venue's signing schema. Their order is part
//! of the signed hash and must match the venue exactly.

use crate::core::eip712::{Domain, MessageBody, TypeDefinition, TypeRegistry, TypedMessage};
use crate::core::errors::ExchangeError;
use crate::core::types::{DurationType, OrderSide, OrderType, SwapRequest};
use alloy_primitives::{Address, U256};

pub const DOMAIN_NAME: &str = "Swap";
pub const DOMAIN_VERSION: &str = "1";

pub const SUBMIT_ORDER_TYPE: &str = "SubmitOrderRequest";
pub const CANCEL_ORDER_TYPE: &str = "CancelOrderRequest";

pub const SUBMIT_ORDER_SCHEMA: [(&str, &str); 10] = [
    ("customer", "address"),
    ("customerObjectID", "string"),
    ("type", "string"),
    ("side", "string"),
    ("quantity", "string"),
    ("baseAssetID", "string"),
    ("quoteAssetID", "string"),
    ("price", "string"),
    ("durationType", "string"),
    ("nonce", "uint256"),
];

pub const CANCEL_ORDER_SCHEMA: [(&str, &str); 4] = [
    ("customer", "address"),
    ("customerObjectID", "string"),
    ("orderID", "string"),
    ("nonce", "uint256"),
];

pub fn deepwaters_domain() -> Domain {
    Domain::new(DOMAIN_NAME, DOMAIN_VERSION)
}

/// Business fields of a submit-order action. `None` or an empty string
/// marks a field as absent; `customer_object_id` may legitimately be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOrderParams {
    pub customer: Option<Address>,
    pub customer_object_id: String,
    pub order_type: Option<OrderType>,
    pub side: Option<OrderSide>,
    pub quantity: Option<String>,
    pub base_asset_id: Option<String>,
    pub quote_asset_id: Option<String>,
    pub price: Option<String>,
    pub duration_type: Option<DurationType>,
}

impl SubmitOrderParams {
    pub fn from_swap(customer: Address, request: &SwapRequest) -> Self {
        Self {
            customer: Some(customer),
            customer_object_id: String::new(),
            order_type: Some(request.order_type),
            side: Some(request.side),
            quantity: Some(request.quantity.clone()),
            base_asset_id: Some(request.base_asset.clone()),
            quote_asset_id: Some(request.quote_asset.clone()),
            price: Some(request.price.clone()),
            duration_type: Some(request.duration),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelOrderParams {
    pub customer: Option<Address>,
    pub customer_object_id: String,
    pub order_id: Option<String>,
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, ExchangeError> {
    value.ok_or_else(|| ExchangeError::MissingFieldError(field.to_string()))
}

fn require_text<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ExchangeError> {
    match value.as_deref() {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ExchangeError::MissingFieldError(field.to_string())),
    }
}

fn registry_for(type_name: &str, schema: &[(&str, &str)]) -> Result<TypeRegistry, ExchangeError> {
    let mut types = TypeRegistry::new();
    types.insert(TypeDefinition::from_schema(type_name, schema))?;
    Ok(types)
}

/// Build the `SubmitOrderRequest` typed message.
///
/// Only presence is checked; price and quantity formats are left to the venue.
pub fn build_submit_order(
    params: &SubmitOrderParams,
    nonce: U256,
) -> Result<TypedMessage, ExchangeError> {
    let customer = require(params.customer, "customer")?;
    let order_type = require(params.order_type, "type")?;
    let side = require(params.side, "side")?;
    let quantity = require_text(&params.quantity, "quantity")?;
    let base_asset_id = require_text(&params.base_asset_id, "baseAssetID")?;
    let quote_asset_id = require_text(&params.quote_asset_id, "quoteAssetID")?;
    let price = require_text(&params.price, "price")?;
    let duration_type = require(params.duration_type, "durationType")?;

    let message = MessageBody::new()
        .with("customer", customer)
        .with("customerObjectID", params.customer_object_id.as_str())
        .with("type", order_type.as_str())
        .with("side", side.as_str())
        .with("quantity", quantity)
        .with("baseAssetID", base_asset_id)
        .with("quoteAssetID", quote_asset_id)
        .with("price", price)
        .with("durationType", duration_type.as_str())
        .with("nonce", nonce);

    TypedMessage::new(
        deepwaters_domain(),
        SUBMIT_ORDER_TYPE,
        registry_for(SUBMIT_ORDER_TYPE, &SUBMIT_ORDER_SCHEMA)?,
        message,
    )
}

/// Build the `CancelOrderRequest` typed message.
pub fn build_cancel_order(
    params: &CancelOrderParams,
    nonce: U256,
) -> Result<TypedMessage, ExchangeError> {
    let customer = require(params.customer, "customer")?;
    let order_id = require_text(&params.order_id, "orderID")?;

    let message = MessageBody::new()
        .with("customer", customer)
        .with("customerObjectID", params.customer_object_id.as_str())
        .with("orderID", order_id)
        .with("nonce", nonce);

    TypedMessage::new(
        deepwaters_domain(),
        CANCEL_ORDER_TYPE,
        registry_for(CANCEL_ORDER_TYPE, &CANCEL_ORDER_SCHEMA)?,
        message,
    )
}
