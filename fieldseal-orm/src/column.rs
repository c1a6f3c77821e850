//! Column-level adapters — a coarser enforcement tier.
//!
//! Where the orchestrator encrypts per configured (type, path) pair, these
//! adapters sit at the storage-column boundary and unconditionally encrypt
//! on write and decrypt on read for every value passing through the column,
//! independent of [`EncryptionConfig`]. They depend only on the codec.
//!
//! [`EncryptionConfig`]: crate::EncryptionConfig

use fieldseal_crypto::{CryptoError, CryptoResult, EnvelopeCodec};
use serde_json::Value;
use std::sync::Arc;

/// Adapter for scalar text columns.
pub struct EncryptedTextColumn {
    codec: Arc<EnvelopeCodec>,
}

impl EncryptedTextColumn {
    pub fn new(codec: Arc<EnvelopeCodec>) -> Self {
        Self { codec }
    }

    /// Application value → stored column value.
    pub fn to_storage(&self, value: &str) -> CryptoResult<String> {
        self.codec.encrypt(&Value::String(value.to_owned()))
    }

    /// Stored column value → application value. Rows written before
    /// encryption was enabled pass through unchanged.
    pub fn from_storage(&self, stored: &str) -> CryptoResult<String> {
        let value = self.codec.decrypt(stored)?;
        serde_json::from_value(value).map_err(CryptoError::from)
    }
}

/// Adapter for list-typed columns serialized to text.
pub struct EncryptedArrayColumn {
    codec: Arc<EnvelopeCodec>,
}

impl EncryptedArrayColumn {
    pub fn new(codec: Arc<EnvelopeCodec>) -> Self {
        Self { codec }
    }

    /// Application value → stored column value.
    pub fn to_storage(&self, values: &[Value]) -> CryptoResult<String> {
        self.codec.encrypt(&Value::Array(values.to_vec()))
    }

    /// Stored column value → application value. A legacy plaintext row
    /// holds the serialized array text itself, so the passthrough string is
    /// parsed as JSON before being handed back.
    pub fn from_storage(&self, stored: &str) -> CryptoResult<Vec<Value>> {
        match self.codec.decrypt(stored)? {
            Value::String(legacy) => serde_json::from_str(&legacy).map_err(CryptoError::from),
            value => serde_json::from_value(value).map_err(CryptoError::from),
        }
    }
}
