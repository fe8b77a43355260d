//! EIP-712 hashing over a canonical message, backed by `alloy-dyn-abi`.

use super::canonical::CanonicalMessage;
use crate::core::errors::ExchangeError;
use alloy_dyn_abi::TypedData;
use serde_json::Value;

/// Parse the canonical structure into alloy's typed-data form.
pub fn typed_data(message: &CanonicalMessage) -> Result<TypedData, ExchangeError> {
    serde_json::from_value(Value::Object(message.as_map().clone()))
        .map_err(|e| ExchangeError::schema(format!("not valid typed data: {}", e)))
}

fn hashing_error(e: alloy_dyn_abi::Error) -> ExchangeError {
    ExchangeError::schema(format!("typed data hashing failed: {}", e))
}

/// `Primary(type name,...)` followed by every referenced type, sorted by name.
pub fn encode_type(message: &CanonicalMessage) -> Result<String, ExchangeError> {
    typed_data(message)?.encode_type().map_err(hashing_error)
}

pub fn domain_separator(message: &CanonicalMessage) -> Result<[u8; 32], ExchangeError> {
    Ok(typed_data(message)?.domain.separator().0)
}

pub fn message_hash(message: &CanonicalMessage) -> Result<[u8; 32], ExchangeError> {
    Ok(typed_data(message)?.hash_struct().map_err(hashing_error)?.0)
}

/// `keccak256(0x19 0x01 || domainSeparator || hashStruct(message))`
pub fn signing_hash(message: &CanonicalMessage) -> Result<[u8; 32], ExchangeError> {
    Ok(typed_data(message)?
        .eip712_signing_hash()
        .map_err(hashing_error)?
        .0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::eip712::canonical::canonicalize_json;

    // Example message from the EIP-712 proposal.
    const MAIL: &str = r#"{
        "types": {
            "EIP712Domain": [
                {"name": "name", "type": "string"},
                {"name": "version", "type": "string"},
                {"name": "chainId", "type": "uint256"},
                {"name": "verifyingContract", "type": "address"}
            ],
            "Person": [
                {"name": "name", "type": "string"},
                {"name": "wallet", "type": "address"}
            ],
            "Mail": [
                {"name": "from", "type": "Person"},
                {"name": "to", "type": "Person"},
                {"name": "contents", "type": "string"}
            ]
        },
        "primaryType": "Mail",
        "domain": {
            "name": "Ether Mail",
            "version": "1",
            "chainId": 1,
            "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
        },
        "message": {
            "from": {"name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"},
            "to": {"name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB"},
            "contents": "Hello, Bob!"
        }
    }"#;

    #[test]
    fn test_encode_type_lists_dependencies() {
        let message = canonicalize_json(MAIL).unwrap();
        assert_eq!(
            encode_type(&message).unwrap(),
            "Mail(Person from,Person to,string contents)Person(string name,address wallet)"
        );
    }

    #[test]
    fn test_mail_vector() {
        let message = canonicalize_json(MAIL).unwrap();

        assert_eq!(
            hex::encode(domain_separator(&message).unwrap()),
            "f2cee375fa42b42143804025fc449deafd50cc031ca257e0b194a650a912090f"
        );
        assert_eq!(
            hex::encode(message_hash(&message).unwrap()),
            "c52c0ee5d84264471806290a3f2c4cecfc5490626bf912d01f240d7a274b371e"
        );
        assert_eq!(
            hex::encode(signing_hash(&message).unwrap()),
            "be609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2"
        );
    }

    #[test]
    fn test_missing_message_field_is_schema_error() {
        let broken = MAIL.replace(r#""contents": "Hello, Bob!""#, r#""other": "x""#);
        let message = canonicalize_json(&broken).unwrap();
        assert!(matches!(
            message_hash(&message),
            Err(ExchangeError::SchemaError(_))
        ));
    }

    #[test]
    fn test_unknown_struct_type_is_schema_error() {
        let broken = MAIL.replace(r#""type": "Person"}"#, r#""type": "Human"}"#);
        let message = canonicalize_json(&broken).unwrap();
        assert!(matches!(
            signing_hash(&message),
            Err(ExchangeError::SchemaError(_))
        ));
    }
}
