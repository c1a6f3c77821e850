//! Per-record-type encryption configuration.
//!
//! Loaded once at process start by the composition root and treated as
//! read-only for the process lifetime — there is no mutation API beyond the
//! builder used during construction.

use crate::error::{OrmError, OrmResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The only encryption method currently recognized. Other values are
/// reserved for future strategies and skipped without error.
pub const DEFAULT_METHOD: &str = "default";

/// How a single property path is to be encrypted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRule {
    /// Method descriptor. Anything other than `"default"` disables
    /// encryption for the path (forward-compatibility placeholder).
    pub method: String,
}

impl PropertyRule {
    pub fn default_method() -> Self {
        Self {
            method: DEFAULT_METHOD.to_owned(),
        }
    }

    pub fn is_default_method(&self) -> bool {
        self.method == DEFAULT_METHOD
    }
}

/// Mapping from record type name to the property paths requiring encryption.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionConfig {
    #[serde(default)]
    pub entities: BTreeMap<String, BTreeMap<String, PropertyRule>>,
}

impl EncryptionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration for composition roots and tests.
    pub fn with_property(
        mut self,
        record_type: impl Into<String>,
        path: impl Into<String>,
        rule: PropertyRule,
    ) -> Self {
        self.entities
            .entry(record_type.into())
            .or_default()
            .insert(path.into(), rule);
        self
    }

    /// Parses the on-disk TOML shape:
    ///
    /// ```toml
    /// [entities.customer."card_number"]
    /// method = "default"
    ///
    /// [entities.customer."address.street"]
    /// method = "default"
    /// ```
    pub fn from_toml_str(input: &str) -> OrmResult<Self> {
        toml::from_str(input).map_err(|e| OrmError::Config(e.to_string()))
    }

    /// The configured paths for a record type, if any.
    pub fn rules_for(&self, record_type: &str) -> Option<&BTreeMap<String, PropertyRule>> {
        self.entities.get(record_type)
    }

    pub fn is_configured(&self, record_type: &str) -> bool {
        self.entities.contains_key(record_type)
    }
}
