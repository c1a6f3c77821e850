//! Dotted property paths with at most one association hop.
//!
//! Limiting traversal to one hop bounds the blast radius of a configuration
//! mistake and keeps change-snapshot reconciliation scoped to at most two
//! records per field.

use crate::error::{OrmError, OrmResult};
use crate::unit_of_work::UnitOfWork;
use fieldseal_types::RecordId;
use serde_json::Value;
use std::fmt;

/// A parsed property path: a direct field, or one hop through a populated
/// to-one relation (`relation.field`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyPath {
    Direct(String),
    Relation { relation: String, field: String },
}

impl PropertyPath {
    /// Parses a dotted path string. More than one dot, or an empty segment,
    /// is a configuration error.
    pub fn parse(raw: &str) -> OrmResult<Self> {
        let mut segments = raw.split('.');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(field), None, None) if !field.is_empty() => {
                Ok(Self::Direct(field.to_owned()))
            }
            (Some(relation), Some(field), None) if !relation.is_empty() && !field.is_empty() => {
                Ok(Self::Relation {
                    relation: relation.to_owned(),
                    field: field.to_owned(),
                })
            }
            _ => Err(OrmError::Config(format!(
                "property path `{raw}` must be `field` or `relation.field`"
            ))),
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(field) => f.write_str(field),
            Self::Relation { relation, field } => write!(f, "{relation}.{field}"),
        }
    }
}

/// Identifies the record actually mutated by a path write — the root for a
/// direct path, the relation target for a one-hop path. The caller uses this
/// to reconcile the host's change snapshot for the right record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteTarget {
    pub record_type: String,
    pub record_id: RecordId,
    pub via_relation: bool,
}

/// Reads the value located by `path` from the record `root_id`.
///
/// A one-hop path requires the relation reference to already be populated
/// and its target to be present in the unit of work; no lazy fetch is
/// triggered here — that responsibility belongs to the host.
pub fn read_path(
    uow: &dyn UnitOfWork,
    root_id: &RecordId,
    path: &PropertyPath,
) -> OrmResult<Value> {
    let root = uow.record(root_id).ok_or_else(|| {
        OrmError::not_accessible(
            "<unknown>",
            path.to_string(),
            format!("record `{root_id}` is not present in the unit of work"),
        )
    })?;

    match path {
        PropertyPath::Direct(field) => root.fields.get(field).cloned().ok_or_else(|| {
            OrmError::not_accessible(&root.record_type, path.to_string(), "no such field")
        }),
        PropertyPath::Relation { relation, field } => {
            let target_id = root.relations.get(relation).ok_or_else(|| {
                OrmError::not_accessible(
                    &root.record_type,
                    path.to_string(),
                    "relation reference is not populated",
                )
            })?;
            let target = uow.record(target_id).ok_or_else(|| {
                OrmError::not_accessible(
                    &root.record_type,
                    path.to_string(),
                    format!("related record `{target_id}` is not loaded"),
                )
            })?;
            target.fields.get(field).cloned().ok_or_else(|| {
                OrmError::not_accessible(
                    &target.record_type,
                    path.to_string(),
                    "no such field on related record",
                )
            })
        }
    }
}

/// Writes `value` through `path`, force-setting the leaf field: plaintext
/// fields get overwritten with ciphertext and vice versa, so no writability
/// check is applied. When the host has registered [`TypeMetadata`] for the
/// target's type, the leaf field must be declared there.
///
/// [`TypeMetadata`]: fieldseal_types::TypeMetadata
pub fn write_path(
    uow: &mut dyn UnitOfWork,
    root_id: &RecordId,
    path: &PropertyPath,
    value: Value,
) -> OrmResult<WriteTarget> {
    let (target_id, via_relation) = match path {
        PropertyPath::Direct(_) => (root_id.clone(), false),
        PropertyPath::Relation { relation, .. } => {
            let root = uow.record(root_id).ok_or_else(|| {
                OrmError::not_accessible(
                    "<unknown>",
                    path.to_string(),
                    format!("record `{root_id}` is not present in the unit of work"),
                )
            })?;
            let target_id = root.relations.get(relation).cloned().ok_or_else(|| {
                OrmError::not_accessible(
                    &root.record_type,
                    path.to_string(),
                    "relation reference is not populated",
                )
            })?;
            (target_id, true)
        }
    };

    let field = match path {
        PropertyPath::Direct(field) => field,
        PropertyPath::Relation { field, .. } => field,
    };

    let target_type = uow
        .record(&target_id)
        .ok_or_else(|| {
            OrmError::not_accessible(
                "<unknown>",
                path.to_string(),
                format!("record `{target_id}` is not loaded"),
            )
        })?
        .record_type
        .clone();

    if let Some(meta) = uow.type_metadata(&target_type) {
        if !meta.declares_field(field) {
            return Err(OrmError::not_accessible(
                &target_type,
                path.to_string(),
                "field is not declared on the record type",
            ));
        }
    }

    // Borrow checked above; the record cannot have vanished in between.
    if let Some(target) = uow.record_mut(&target_id) {
        target.fields.insert(field.clone(), value);
    }

    Ok(WriteTarget {
        record_type: target_type,
        record_id: target_id,
        via_relation,
    })
}
