use crate::core::eip712::{hash, CanonicalMessage};
use crate::core::errors::ExchangeError;
use alloy_primitives::Address;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sha3::{Digest, Keccak256};
use std::fmt;
use zeroize::Zeroizing;

/// A 65-byte `r || s || v` signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 65]);

impl Signature {
    pub const fn from_bytes(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    pub const fn v(&self) -> u8 {
        self.0[64]
    }

    /// `0x` followed by 130 hex digits; leading zero bytes are kept.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature").field(&self.to_hex()).finish()
    }
}

/// Signs canonical typed messages.
///
/// Implementations own their key material. The message handed in has already
/// been put in signing order.
pub trait TypedDataSigner: Send + Sync {
    fn sign_typed_data(&self, message: &CanonicalMessage) -> Result<Signature, ExchangeError>;
}

/// secp256k1 signer producing Ethereum-style recoverable signatures
#[derive(Clone)]
pub struct Secp256k1TypedDataSigner {
    secret_key: SecretKey,
    address: Address,
    secp: Secp256k1<secp256k1::All>,
}

impl fmt::Debug for Secp256k1TypedDataSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1TypedDataSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Secp256k1TypedDataSigner {
    /// Create a signer from a hex private key (`0x` prefix optional)
    pub fn with_private_key(private_key: &str) -> Result<Self, ExchangeError> {
        let key_bytes = Zeroizing::new(
            hex::decode(private_key.trim().trim_start_matches("0x"))
                .map_err(|e| ExchangeError::signing(format!("Invalid private key hex: {}", e)))?,
        );
        let secret_key = SecretKey::from_slice(&key_bytes)
            .map_err(|e| ExchangeError::signing(format!("Invalid private key: {}", e)))?;

        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);

        Ok(Self {
            secret_key,
            address: public_key_to_address(&public_key),
            secp,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a prehashed 32-byte digest
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<Signature, ExchangeError> {
        let message = Message::from_digest_slice(digest)
            .map_err(|e| ExchangeError::signing(format!("Failed to create message: {}", e)))?;

        let (recovery_id, compact) = self
            .secp
            .sign_ecdsa_recoverable(&message, &self.secret_key)
            .serialize_compact();

        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&compact);
        bytes[64] = 27 + recovery_id.to_i32() as u8;
        Ok(Signature(bytes))
    }
}

impl TypedDataSigner for Secp256k1TypedDataSigner {
    fn sign_typed_data(&self, message: &CanonicalMessage) -> Result<Signature, ExchangeError> {
        let digest = hash::signing_hash(message)?;
        self.sign_digest(&digest)
    }
}

pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    let public_key_bytes = public_key.serialize_uncompressed();

    // Drop the 0x04 tag, keep the last 20 bytes of the hash
    let hash = Keccak256::digest(&public_key_bytes[1..]);
    Address::from_slice(&hash[12..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::eip712::canonicalize_json;
    use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};

    // Private key 0x...01 maps to this well-known address
    const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";
    const KEY_ONE_ADDRESS: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

    fn recover(signature: &Signature, digest: &[u8; 32]) -> Address {
        let bytes = signature.as_bytes();
        let recovery_id = RecoveryId::from_i32(i32::from(bytes[64]) - 27).unwrap();
        let recoverable = RecoverableSignature::from_compact(&bytes[..64], recovery_id).unwrap();
        let message = Message::from_digest_slice(digest).unwrap();
        let public_key = Secp256k1::new()
            .recover_ecdsa(&message, &recoverable)
            .unwrap();
        public_key_to_address(&public_key)
    }

    #[test]
    fn test_address_derivation() {
        let signer = Secp256k1TypedDataSigner::with_private_key(KEY_ONE).unwrap();
        assert_eq!(signer.address().to_checksum(None), KEY_ONE_ADDRESS);
    }

    #[test]
    fn test_malformed_keys_are_signing_errors() {
        let zero_key = "0".repeat(64);
        for key in ["not-hex", "0x1234", "", zero_key.as_str()] {
            let result = Secp256k1TypedDataSigner::with_private_key(key);
            assert!(
                matches!(result, Err(ExchangeError::SigningError(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }

    #[test]
    fn test_signature_is_recoverable_and_deterministic() {
        let signer = Secp256k1TypedDataSigner::with_private_key(KEY_ONE).unwrap();
        let message = canonicalize_json(
            r#"{
                "types": {
                    "EIP712Domain": [{"name": "name", "type": "string"}, {"name": "version", "type": "string"}],
                    "Ping": [{"name": "nonce", "type": "uint256"}]
                },
                "primaryType": "Ping",
                "domain": {"name": "Swap", "version": "1"},
                "message": {"nonce": 7}
            }"#,
        )
        .unwrap();

        let first = signer.sign_typed_data(&message).unwrap();
        let second = signer.sign_typed_data(&message).unwrap();
        assert_eq!(first, second);
        assert!(first.v() == 27 || first.v() == 28);

        let digest = hash::signing_hash(&message).unwrap();
        assert_eq!(recover(&first, &digest), signer.address());
    }

    #[test]
    fn test_signature_hex_is_fixed_length() {
        let signature = Signature::from_bytes([0u8; 65]);
        let encoded = signature.to_hex();

        assert!(encoded.starts_with("0x"));
        assert_eq!(encoded.len(), 132);
        assert_eq!(signature.to_string(), encoded);
    }
}
