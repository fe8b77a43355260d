/// Venue-agnostic transport and signing layer
///
/// The kernel holds no venue-specific logic. It provides:
///
/// ## Transport
/// - `RestClient`: JSON-over-HTTP interface the venue gateways are written against
/// - `ReqwestRest`: reqwest-backed implementation
///
/// ## Signing
/// - `TypedDataSigner`: signs canonical typed messages; injectable so tests can use fixtures
/// - `Secp256k1TypedDataSigner`: Ethereum-style recoverable secp256k1 signatures
///
/// # Example
/// ```rust,no_run
/// use deepwaters_client::core::kernel::*;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rest = RestClientBuilder::new(
///     RestClientConfig::new(
///         "https://testnet.api.deepwaters.xyz/accounting".to_string(),
///         "deepwaters".to_string(),
///     )
///     .with_timeout(10),
/// )
/// .build()?;
///
/// let signer = Secp256k1TypedDataSigner::with_private_key(
///     "0x0000000000000000000000000000000000000000000000000000000000000001",
/// )?;
/// println!("{:?} signs as {}", rest, signer.address());
/// # Ok(())
/// # }
/// ```
pub mod rest;
pub mod signer;

// Re-export key types for convenience
pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{Secp256k1TypedDataSigner, Signature, TypedDataSigner};
