use crate::core::eip712::{canonicalize, TypedMessage};
use crate::core::errors::ExchangeError;
use crate::core::kernel::{Secp256k1TypedDataSigner, Signature, TypedDataSigner};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Signs Deepwaters typed messages.
///
/// Every message is put into the venue's canonical key order before it reaches
/// the underlying signer.
#[derive(Clone)]
pub struct DeepwatersSigner {
    inner: Arc<dyn TypedDataSigner>,
}

impl fmt::Debug for DeepwatersSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepwatersSigner").finish_non_exhaustive()
    }
}

impl DeepwatersSigner {
    pub fn new(inner: Arc<dyn TypedDataSigner>) -> Self {
        Self { inner }
    }

    pub fn from_private_key(private_key: &str) -> Result<Self, ExchangeError> {
        let signer = Secp256k1TypedDataSigner::with_private_key(private_key)?;
        Ok(Self::new(Arc::new(signer)))
    }

    #[instrument(skip(self, message), fields(exchange = "deepwaters", primary_type = %message.primary_type()))]
    pub fn sign_message(&self, message: &TypedMessage) -> Result<Signature, ExchangeError> {
        let canonical = canonicalize(message)?;
        debug!("canonical message ready for signing");

        let signature = self.inner.sign_typed_data(&canonical)?;
        debug!(v = signature.v(), "message signed");
        Ok(signature)
    }
}
