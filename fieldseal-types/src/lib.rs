//! Shared record model for FieldSeal.
//!
//! The encryption layer does not own persistence — it operates on records
//! the host persistence layer has materialized into memory. This crate
//! defines that in-memory shape: a [`Record`] carries a typed JSON field map
//! plus the to-one relation references that have been populated, and a
//! [`TypeMetadata`] describes the declared shape of a record type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Identifier of a record within the host's unit of work.
pub type RecordId = String;

/// An in-memory record managed by a host persistence layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    /// Record type name, the key into the encryption configuration.
    pub record_type: String,
    /// Scalar fields, keyed by field name.
    pub fields: Map<String, Value>,
    /// Populated to-one relation references, keyed by relation name.
    /// An unpopulated relation is simply absent from the map.
    #[serde(default)]
    pub relations: BTreeMap<String, RecordId>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, record_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            record_type: record_type.into(),
            fields: Map::new(),
            relations: BTreeMap::new(),
        }
    }

    /// Builder-style field initialization.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Builder-style relation initialization.
    pub fn with_relation(mut self, name: impl Into<String>, target: impl Into<RecordId>) -> Self {
        self.relations.insert(name.into(), target.into());
        self
    }
}

/// Declared shape of a record type, as tracked by the host.
///
/// When present, writes through the path resolver are validated against the
/// declared field set; without metadata no validation is applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMetadata {
    pub type_name: String,
    pub fields: BTreeSet<String>,
    #[serde(default)]
    pub relations: BTreeSet<String>,
}

impl TypeMetadata {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeSet::new(),
            relations: BTreeSet::new(),
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_relations<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relations.extend(relations.into_iter().map(Into::into));
        self
    }

    pub fn declares_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    pub fn declares_relation(&self, name: &str) -> bool {
        self.relations.contains(name)
    }
}
