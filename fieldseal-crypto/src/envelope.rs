//! The envelope codec: serialize, encrypt, authenticate, encode — and the
//! inverse with integrity verification.
//!
//! Wire format for one encrypted value:
//!
//! ```text
//! <ENC>\0<base64 ciphertext>\0<base64 tag>\0<base64 nonce>
//! ```
//!
//! NUL is the segment separator because it never occurs in base64 output.
//! A stored value without the `<ENC>\0` prefix is legacy plaintext and is
//! returned unchanged.

use crate::error::{CryptoError, CryptoResult};
use crate::key::SecretKey;
use aes::Aes256;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::Value;
use sha2::Sha256;

type Aes256Ctr = ctr::Ctr128BE<Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Marker text identifying an encrypted envelope.
pub const ENVELOPE_MARKER: &str = "<ENC>";

/// Full envelope prefix: the marker plus its NUL separator. The marker text
/// alone does not make a value an envelope — plaintext that happens to begin
/// with `<ENC>` still passes through.
const ENVELOPE_PREFIX: &str = "<ENC>\0";

/// Algorithm identifier bound into the MAC input, so a tag computed for one
/// cipher cannot be replayed for another.
const ALGORITHM_ID: &[u8] = b"aes-256-ctr";

/// AES-CTR nonce size: one cipher block.
pub const NONCE_SIZE: usize = 16;

/// HMAC-SHA256 tag size.
pub const TAG_SIZE: usize = 32;

/// Authenticated encryption codec for field values.
///
/// Stateless after construction; encryption and decryption are independent
/// and may run concurrently from multiple threads. The only external call is
/// to the OS random source for nonce generation — a nonce must never repeat
/// under the same key, counter mode offers no confidentiality once it does.
// SecretKey's Debug redacts the key material, so deriving here stays safe.
#[derive(Debug)]
pub struct EnvelopeCodec {
    key: SecretKey,
}

impl EnvelopeCodec {
    /// Creates a codec from raw secret key material.
    ///
    /// Fails fast with [`CryptoError::Config`] if the secret is shorter than
    /// 32 bytes; no encryption operation is ever attempted with a weak key.
    pub fn new(secret: impl Into<Vec<u8>>) -> CryptoResult<Self> {
        Ok(Self {
            key: SecretKey::new(secret)?,
        })
    }

    /// Serializes and encrypts `value` into a fresh envelope.
    ///
    /// Every call draws a new nonce, so encrypting the same value twice
    /// produces two different envelopes that both decrypt to that value.
    pub fn encrypt(&self, value: &Value) -> CryptoResult<String> {
        let mut buf = serde_json::to_vec(value)?;

        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let mut cipher = Aes256Ctr::new(&self.key.cipher_key().into(), &nonce.into());
        cipher.apply_keystream(&mut buf);

        let tag = self.compute_tag(&buf, &nonce)?;

        Ok(format!(
            "{ENVELOPE_PREFIX}{}\0{}\0{}",
            BASE64.encode(&buf),
            BASE64.encode(tag),
            BASE64.encode(nonce),
        ))
    }

    /// Verifies and decrypts an envelope back to the original value.
    ///
    /// Input without the envelope marker is returned unchanged as a string
    /// value — the backward-compatibility passthrough for columns that were
    /// populated before encryption was enabled.
    pub fn decrypt(&self, input: &str) -> CryptoResult<Value> {
        if !input.starts_with(ENVELOPE_PREFIX) {
            return Ok(Value::String(input.to_owned()));
        }

        let parts: Vec<&str> = input.split('\0').collect();
        if parts.len() != 4 {
            return Err(CryptoError::MalformedEnvelope(
                "expected four NUL-separated segments",
            ));
        }

        let ciphertext = BASE64
            .decode(parts[1])
            .map_err(|_| CryptoError::MalformedEnvelope("ciphertext segment is not valid base64"))?;
        let tag = BASE64
            .decode(parts[2])
            .map_err(|_| CryptoError::MalformedEnvelope("tag segment is not valid base64"))?;
        let nonce_bytes = BASE64
            .decode(parts[3])
            .map_err(|_| CryptoError::MalformedEnvelope("nonce segment is not valid base64"))?;
        let nonce: [u8; NONCE_SIZE] = nonce_bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::MalformedEnvelope("nonce has the wrong length"))?;

        // Verify in constant time before any decryption is attempted.
        let mut mac = self.mac()?;
        mac.update(ALGORITHM_ID);
        mac.update(&ciphertext);
        mac.update(&nonce);
        mac.verify_slice(&tag).map_err(|_| CryptoError::Integrity)?;

        let mut buf = ciphertext;
        let mut cipher = Aes256Ctr::new(&self.key.cipher_key().into(), &nonce.into());
        cipher.apply_keystream(&mut buf);

        serde_json::from_slice(&buf).map_err(CryptoError::Deserialization)
    }

    /// Whether a stored value carries the envelope prefix.
    pub fn is_envelope(input: &str) -> bool {
        input.starts_with(ENVELOPE_PREFIX)
    }

    fn mac(&self) -> CryptoResult<HmacSha256> {
        HmacSha256::new_from_slice(self.key.mac_key())
            .map_err(|_| CryptoError::Config("invalid MAC key"))
    }

    fn compute_tag(&self, ciphertext: &[u8], nonce: &[u8]) -> CryptoResult<[u8; TAG_SIZE]> {
        let mut mac = self.mac()?;
        mac.update(ALGORITHM_ID);
        mac.update(ciphertext);
        mac.update(nonce);
        Ok(mac.finalize().into_bytes().into())
    }
}
