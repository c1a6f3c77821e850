//! Crypto error types.

use thiserror::Error;

/// Result type for codec operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors from envelope encryption and decryption.
///
/// Display output never includes key material, plaintext, or ciphertext.
/// None of these are retried internally; retry only makes sense above this
/// layer.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Secret key missing or shorter than the minimum length.
    /// Fatal at startup — the codec refuses to construct.
    #[error("invalid encryption configuration: {0}")]
    Config(&'static str),

    /// Wrong segment count or a segment that is not valid base64.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(&'static str),

    /// MAC verification failed. Never silently treated as plaintext.
    #[error("invalid MAC")]
    Integrity,

    /// The cipher rejected its input. Counter-mode keystream application
    /// itself cannot fail and corrupted input is caught by the MAC first,
    /// so the current codec never produces this; the arm exists for cipher
    /// backends that can reject ciphertext.
    #[error("could not decrypt ciphertext")]
    Decryption,

    /// Decrypted bytes are not the expected structured format.
    #[error("decrypted payload is not valid JSON: {0}")]
    Deserialization(#[from] serde_json::Error),
}
