//! Error types for the encryption orchestration layer.

use fieldseal_crypto::CryptoError;
use thiserror::Error;

/// Result type for orchestration and path resolution.
pub type OrmResult<T> = Result<T, OrmError>;

/// Errors from path resolution and lifecycle orchestration.
#[derive(Debug, Error)]
pub enum OrmError {
    /// A configured property path does not resolve on the given record.
    /// This indicates configuration/schema drift, not a transient condition,
    /// so it is surfaced rather than skipped.
    #[error("property `{path}` not accessible on record type `{record_type}`: {reason}")]
    PropertyNotAccessible {
        record_type: String,
        path: String,
        reason: String,
    },

    /// Invalid encryption configuration (bad property path syntax, bad TOML).
    #[error("invalid encryption configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl OrmError {
    pub(crate) fn not_accessible(
        record_type: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::PropertyNotAccessible {
            record_type: record_type.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }
}
