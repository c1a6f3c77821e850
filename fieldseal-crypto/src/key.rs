//! Secret key handling.

use crate::error::{CryptoError, CryptoResult};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum accepted secret key length in bytes (256 bits).
pub const MIN_KEY_LEN: usize = 32;

/// The codec's secret key. Zeroized on drop; never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Accepts key material of at least [`MIN_KEY_LEN`] bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> CryptoResult<Self> {
        let bytes = bytes.into();
        if bytes.len() < MIN_KEY_LEN {
            return Err(CryptoError::Config(
                "secret key is too short (need at least 32 bytes)",
            ));
        }
        Ok(Self(bytes))
    }

    /// First 32 bytes, used as the AES-256 key.
    pub(crate) fn cipher_key(&self) -> [u8; 32] {
        let mut key = [0u8; 32];
        key.copy_from_slice(&self.0[..32]);
        key
    }

    /// Full key material, used as the HMAC key.
    pub(crate) fn mac_key(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}
