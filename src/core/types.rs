use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Limit,
    Market,
}

/// How long an order rests on the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DurationType {
    GoodTillCancel,
    ImmediateOrCancel,
    GoodTillExpiry,
}

impl OrderSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl OrderType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
        }
    }
}

impl DurationType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoodTillCancel => "GOOD_TILL_CANCEL",
            Self::ImmediateOrCancel => "IMMEDIATE_OR_CANCEL",
            Self::GoodTillExpiry => "GOOD_TILL_EXPIRY",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A swap order as the caller expresses it.
///
/// Quantity and price are decimal strings copied verbatim into both the
/// signed message and the request variables. Their format is checked by the
/// venue, not here, so precision is not bounded by any local numeric type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub base_asset: String,
    pub quote_asset: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub duration: DurationType,
    pub quantity: String,
    pub price: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SwapRequest {
    pub fn limit(
        base_asset: impl Into<String>,
        quote_asset: impl Into<String>,
        side: OrderSide,
        quantity: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            base_asset: base_asset.into(),
            quote_asset: quote_asset.into(),
            side,
            order_type: OrderType::Limit,
            duration: DurationType::GoodTillCancel,
            quantity: quantity.into(),
            price: price.into(),
            expires_at: None,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: DurationType) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// Venue reply to an order submission. The status is passed through unchanged;
/// the venue omits the order id on some rejections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    pub status: String,
    pub venue_order_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelResult {
    pub status: String,
    pub venue_order_id: Option<String>,
}

/// Balance as reported by the venue; `amount` is its raw decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub asset: String,
    pub service_id: Option<String>,
    pub amount: String,
}

impl Balance {
    /// `None` when the amount is not a decimal or exceeds `Decimal`'s 28 digits
    pub fn decimal_amount(&self) -> Option<Decimal> {
        Decimal::from_str_exact(self.amount.trim()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_value(DurationType::GoodTillCancel).unwrap(),
            "GOOD_TILL_CANCEL"
        );
        assert_eq!(serde_json::to_value(OrderSide::Buy).unwrap(), "BUY");
        assert_eq!(serde_json::to_value(OrderType::Limit).unwrap(), "LIMIT");
        assert_eq!(DurationType::ImmediateOrCancel.to_string(), "IMMEDIATE_OR_CANCEL");
    }

    #[test]
    fn test_limit_keeps_text_verbatim() {
        let request = SwapRequest::limit(
            "WETH.X",
            "USDC.X",
            OrderSide::Buy,
            "0.0447",
            "1250.90",
        );

        assert_eq!(request.quantity, "0.0447");
        assert_eq!(request.price, "1250.90");
        assert_eq!(request.duration, DurationType::GoodTillCancel);

        // Wider than any fixed-precision decimal
        let wide = SwapRequest::limit(
            "WETH.X",
            "USDC.X",
            OrderSide::Sell,
            "123456789012345678901234567890.5",
            Decimal::from_str("1250.9").unwrap().to_string(),
        );
        assert_eq!(wide.quantity, "123456789012345678901234567890.5");
        assert_eq!(wide.price, "1250.9");
    }

    #[test]
    fn test_balance_decimal_amount() {
        let balance = |amount: &str| Balance {
            asset: "USDC.X".to_string(),
            service_id: None,
            amount: amount.to_string(),
        };

        assert_eq!(
            balance("1500.25").decimal_amount(),
            Some(Decimal::from_str("1500.25").unwrap())
        );
        assert_eq!(balance("123456789012345678901234567890").decimal_amount(), None);
        assert_eq!(balance("n/a").decimal_amount(), None);
    }
}
