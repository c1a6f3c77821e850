//! Envelope encryption codec for FieldSeal.
//!
//! Turns an arbitrary serializable value into a tamper-evident textual
//! envelope and back, using:
//! - AES-256-CTR for confidentiality (ciphertext length == plaintext length)
//! - HMAC-SHA256 in encrypt-then-MAC for integrity
//! - a fresh 16-byte OS-random nonce per encryption
//!
//! # Architecture
//!
//! The codec holds exactly one secret key, supplied at startup and validated
//! eagerly (at least 32 bytes). It is stateless after construction and safe
//! to share across threads behind an `Arc`. A stored value that does not
//! carry the envelope marker is treated as legacy plaintext and passed
//! through decryption unchanged, so existing unencrypted columns keep working
//! during migration.

mod envelope;
mod error;
mod key;

pub use envelope::{EnvelopeCodec, ENVELOPE_MARKER, NONCE_SIZE, TAG_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use key::{SecretKey, MIN_KEY_LEN};
