use alloy_primitives::{Address, U256};
use deepwaters_client::core::eip712::canonical::{reorder_top_level, reorder_types};
use deepwaters_client::core::eip712::{canonicalize, canonicalize_raw, DOMAIN_TYPE_NAME};
use deepwaters_client::core::errors::ExchangeError;
use deepwaters_client::core::types::{DurationType, OrderSide, OrderType};
use deepwaters_client::exchanges::deepwaters::{build_submit_order, SubmitOrderParams};
use serde_json::{json, Map, Value};

fn as_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn keys(map: &Map<String, Value>) -> Vec<String> {
    map.keys().cloned().collect()
}

/// Structures as a generic EIP-712 tool would emit them: `types` first and
/// the domain type registered ahead of everything else.
fn raw_samples() -> Vec<Map<String, Value>> {
    vec![
        as_map(json!({
            "types": {
                "EIP712Domain": [{"name": "name", "type": "string"}, {"name": "version", "type": "string"}],
                "SubmitOrderRequest": [{"name": "customer", "type": "address"}, {"name": "nonce", "type": "uint256"}]
            },
            "primaryType": "SubmitOrderRequest",
            "domain": {"name": "Swap", "version": "1"},
            "message": {"customer": "0x0000000000000000000000000000000000000abc", "nonce": 7}
        })),
        as_map(json!({
            "message": {"from": {"name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"}, "contents": "Hi"},
            "types": {
                "EIP712Domain": [{"name": "name", "type": "string"}],
                "Person": [{"name": "name", "type": "string"}, {"name": "wallet", "type": "address"}],
                "Mail": [{"name": "from", "type": "Person"}, {"name": "contents", "type": "string"}]
            },
            "domain": {"name": "Ether Mail"},
            "primaryType": "Mail"
        })),
        as_map(json!({
            "domain": {"name": "Swap", "version": "1"},
            "primaryType": "Ping",
            "types": {
                "Ping": [{"name": "nonce", "type": "uint256"}],
                "EIP712Domain": [{"name": "name", "type": "string"}, {"name": "version", "type": "string"}]
            },
            "message": {"nonce": "18446744073709551616"}
        })),
    ]
}

fn submit_params() -> SubmitOrderParams {
    SubmitOrderParams {
        customer: Some(Address::repeat_byte(0xab)),
        customer_object_id: String::new(),
        order_type: Some(OrderType::Limit),
        side: Some(OrderSide::Sell),
        quantity: Some("1.5".to_string()),
        base_asset_id: Some("WETH.X".to_string()),
        quote_asset_id: Some("USDC.X".to_string()),
        price: Some("1999.99".to_string()),
        duration_type: Some(DurationType::ImmediateOrCancel),
    }
}

#[cfg(test)]
mod canonical_encoding_tests {
    use super::*;

    #[test]
    fn test_content_is_preserved() {
        for raw in raw_samples() {
            let canonical = canonicalize_raw(&raw).unwrap();

            // Map equality ignores key order, so this checks content at every level
            assert_eq!(canonical.as_map(), &raw);
            assert_eq!(canonical.as_map().len(), raw.len());
            assert_eq!(canonical.types().unwrap().len(), raw["types"].as_object().unwrap().len());
        }
    }

    #[test]
    fn test_top_level_order() {
        for raw in raw_samples() {
            let canonical = canonicalize_raw(&raw).unwrap();
            assert_eq!(
                keys(canonical.as_map()),
                ["domain", "primaryType", "types", "message"]
            );

            let serialized = canonical.to_json().unwrap();
            let positions: Vec<usize> = ["\"domain\"", "\"primaryType\"", "\"types\"", "\"message\""]
                .iter()
                .map(|key| serialized.find(key).unwrap())
                .collect();
            assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn test_domain_type_goes_last() {
        let registry = as_map(json!({
            "EIP712Domain": [{"name": "name", "type": "string"}],
            "Person": [{"name": "name", "type": "string"}],
            "Mail": [{"name": "from", "type": "Person"}],
            "Attachment": [{"name": "uri", "type": "string"}]
        }));

        let reordered = reorder_types(&registry).unwrap();
        assert_eq!(keys(&reordered), ["Person", "Mail", "Attachment", DOMAIN_TYPE_NAME]);
        assert_eq!(reordered, registry);

        // Already last: nothing moves
        let again = reorder_types(&reordered).unwrap();
        assert_eq!(keys(&again), keys(&reordered));
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for raw in raw_samples() {
            let once = canonicalize_raw(&raw).unwrap();
            let twice = canonicalize_raw(once.as_map()).unwrap();

            assert_eq!(once.to_json().unwrap(), twice.to_json().unwrap());
            assert_eq!(
                reorder_top_level(once.as_map()).unwrap(),
                once.as_map().clone()
            );
        }
    }

    #[test]
    fn test_submit_order_encoding_is_deterministic() {
        let encode = || {
            let message = build_submit_order(&submit_params(), U256::from(42u64)).unwrap();
            canonicalize(&message).unwrap().to_json().unwrap()
        };

        let first = encode();
        for _ in 0..5 {
            assert_eq!(encode(), first);
        }
    }

    #[test]
    fn test_missing_domain_type_is_rejected() {
        let registry = as_map(json!({
            "Mail": [{"name": "contents", "type": "string"}]
        }));
        assert!(matches!(
            reorder_types(&registry),
            Err(ExchangeError::MissingDomainTypeError(name)) if name == DOMAIN_TYPE_NAME
        ));

        let mut raw = raw_samples().remove(0);
        raw.insert(
            "types".to_string(),
            json!({"SubmitOrderRequest": [{"name": "nonce", "type": "uint256"}]}),
        );
        assert!(matches!(
            canonicalize_raw(&raw),
            Err(ExchangeError::MissingDomainTypeError(_))
        ));
    }

    #[test]
    fn test_missing_section_is_schema_error() {
        let raw = as_map(json!({
            "types": {"EIP712Domain": []},
            "primaryType": "Mail",
            "domain": {}
        }));
        assert!(matches!(
            canonicalize_raw(&raw),
            Err(ExchangeError::SchemaError(_))
        ));
    }
}
