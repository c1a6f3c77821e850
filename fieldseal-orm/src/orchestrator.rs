//! Field encryption orchestrator — applies encrypt-on-write and
//! decrypt-on-read at the host's flush and load lifecycle points.
//!
//! The orchestrator owns no I/O and schedules nothing itself. The host
//! invokes [`EncryptionOrchestrator::on_flush`] once per flush cycle, before
//! pending changes are persisted, and [`EncryptionOrchestrator::on_load`]
//! once per record materialized from storage.
//!
//! Postcondition of `on_flush`: for every record it rewrites (root or
//! relation target), the host's change snapshot has been recomputed, so the
//! pending diff reflects ciphertext rather than a stale plaintext snapshot
//! taken before this hook ran. That is also what makes a second flush cycle
//! on an unmodified record a no-op: it sees ciphertext-vs-ciphertext and
//! produces no diff.

use crate::config::EncryptionConfig;
use crate::error::OrmResult;
use crate::path::{read_path, write_path, PropertyPath};
use crate::unit_of_work::UnitOfWork;
use fieldseal_crypto::EnvelopeCodec;
use fieldseal_types::RecordId;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Applies the configured field encryption around a host unit of work.
///
/// Receives its codec explicitly at construction — there is no global
/// lookup; the composition root that wires up the persistence layer passes
/// the same `Arc<EnvelopeCodec>` here and to any column adapters.
pub struct EncryptionOrchestrator {
    codec: Arc<EnvelopeCodec>,
    config: EncryptionConfig,
}

impl EncryptionOrchestrator {
    pub fn new(codec: Arc<EnvelopeCodec>, config: EncryptionConfig) -> Self {
        Self { codec, config }
    }

    /// Encrypts every configured field of the pending insertion and update
    /// sets, insertions first, each set in host order.
    pub fn on_flush(&self, uow: &mut dyn UnitOfWork) -> OrmResult<()> {
        for id in uow.pending_insertions() {
            self.encrypt_record(uow, &id)?;
        }
        for id in uow.pending_updates() {
            self.encrypt_record(uow, &id)?;
        }
        Ok(())
    }

    /// Decrypts every configured field of a freshly-materialized record,
    /// writing the plaintext back into the in-memory record. Records of
    /// unconfigured types are untouched.
    pub fn on_load(&self, uow: &mut dyn UnitOfWork, id: &RecordId) -> OrmResult<()> {
        let Some(record) = uow.record(id) else {
            return Ok(());
        };
        let record_type = record.record_type.clone();
        let Some(rules) = self.config.rules_for(&record_type) else {
            return Ok(());
        };

        for (raw_path, rule) in rules.clone() {
            if !rule.is_default_method() {
                debug!(
                    record_type,
                    path = raw_path,
                    method = rule.method,
                    "skipping path with unrecognized encryption method"
                );
                continue;
            }
            let path = PropertyPath::parse(&raw_path)?;
            let stored = self.resolve(uow, &record_type, id, &path, &raw_path)?;

            // Only strings can carry an envelope; any other stored value is
            // already plaintext (legacy row) and stays as it is.
            let Value::String(stored_str) = stored else {
                continue;
            };
            let plaintext = self.codec.decrypt(&stored_str)?;
            write_path(uow, id, &path, plaintext)?;
            debug!(record_type, path = raw_path, "decrypted field on load");
        }
        Ok(())
    }

    fn encrypt_record(&self, uow: &mut dyn UnitOfWork, id: &RecordId) -> OrmResult<()> {
        let Some(record) = uow.record(id) else {
            return Ok(());
        };
        let record_type = record.record_type.clone();
        let Some(rules) = self.config.rules_for(&record_type) else {
            return Ok(());
        };

        for (raw_path, rule) in rules.clone() {
            if !rule.is_default_method() {
                debug!(
                    record_type,
                    path = raw_path,
                    method = rule.method,
                    "skipping path with unrecognized encryption method"
                );
                continue;
            }
            let path = PropertyPath::parse(&raw_path)?;
            let plaintext = self.resolve(uow, &record_type, id, &path, &raw_path)?;
            let envelope = self.codec.encrypt(&plaintext)?;
            let target = write_path(uow, id, &path, Value::String(envelope))?;
            if target.via_relation {
                // The mutated object is the relation target, not the root;
                // its snapshot must be reconciled under its own type/identity.
                uow.recompute_change_snapshot(&target.record_type, &target.record_id);
            }
            debug!(record_type, path = raw_path, "encrypted field for flush");
        }

        uow.recompute_change_snapshot(&record_type, id);
        Ok(())
    }

    fn resolve(
        &self,
        uow: &dyn UnitOfWork,
        record_type: &str,
        id: &RecordId,
        path: &PropertyPath,
        raw_path: &str,
    ) -> OrmResult<Value> {
        read_path(uow, id, path).map_err(|e| {
            warn!(
                record_type,
                path = raw_path,
                "configured property path failed to resolve"
            );
            e
        })
    }
}
