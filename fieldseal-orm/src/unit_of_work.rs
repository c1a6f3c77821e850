//! Host persistence contract and an in-memory reference implementation.
//!
//! The orchestrator never schedules flushes or loads itself; the host invokes
//! it once per flush cycle and once per materialized record, through the
//! [`UnitOfWork`] slice of the host's change-tracking machinery.

use fieldseal_types::{Record, RecordId, TypeMetadata};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// A pending diff for one record: field name → (before, after).
pub type ChangeSet = BTreeMap<String, (Option<Value>, Option<Value>)>;

/// The slice of a host persistence layer's unit of work that field
/// encryption depends on.
///
/// Pending updates must be derived from actual before/after inequality
/// against the last-known-persisted snapshot, not from a dirty flag — that
/// is what makes a second flush cycle on an unmodified record a no-op
/// instead of a re-encryption.
pub trait UnitOfWork {
    /// Records scheduled for first-time persistence, in host order.
    fn pending_insertions(&self) -> Vec<RecordId>;

    /// Records whose current state differs from their snapshot, in host
    /// order (a set — order across unrelated records is not stable).
    fn pending_updates(&self) -> Vec<RecordId>;

    /// A record in the identity map.
    fn record(&self, id: &RecordId) -> Option<&Record>;

    fn record_mut(&mut self, id: &RecordId) -> Option<&mut Record>;

    /// Declared shape of a record type, if the host tracks one.
    fn type_metadata(&self, record_type: &str) -> Option<&TypeMetadata>;

    /// Re-derives the pending-change snapshot for one record: the diff
    /// against the old snapshot is frozen as the record's pending change set
    /// (so the host persists the rewritten values), and the snapshot itself
    /// is advanced to the record's current state (so a repeated hook
    /// invocation observes no further difference).
    fn recompute_change_snapshot(&mut self, record_type: &str, id: &RecordId);
}

/// In-memory unit of work: identity map, per-record persisted-state
/// snapshots, and frozen change sets. Serves as the reference host for
/// tests and embedded use.
#[derive(Debug, Default)]
pub struct InMemoryUnitOfWork {
    records: BTreeMap<RecordId, Record>,
    /// Last-known-persisted field state per record. Absent for records
    /// scheduled as insertions that have not had a snapshot recomputed yet.
    snapshots: HashMap<RecordId, Map<String, Value>>,
    /// Change sets frozen by `recompute_change_snapshot`, consumed by the
    /// host when it writes the flush out.
    change_sets: HashMap<RecordId, ChangeSet>,
    insertion_order: Vec<RecordId>,
    metadata: HashMap<String, TypeMetadata>,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_metadata(&mut self, meta: TypeMetadata) {
        self.metadata.insert(meta.type_name.clone(), meta);
    }

    /// Schedules a brand-new record for insertion.
    pub fn register_new(&mut self, record: Record) {
        self.insertion_order.push(record.id.clone());
        self.records.insert(record.id.clone(), record);
    }

    /// Materializes a record "from storage": it enters the identity map
    /// clean, with a snapshot equal to its current state.
    pub fn register_loaded(&mut self, record: Record) {
        self.snapshots
            .insert(record.id.clone(), record.fields.clone());
        self.records.insert(record.id.clone(), record);
    }

    /// The pending diff for a record: the frozen change set if one was
    /// recomputed this cycle, otherwise the live snapshot-vs-current diff.
    pub fn change_set(&self, id: &RecordId) -> ChangeSet {
        if let Some(frozen) = self.change_sets.get(id) {
            return frozen.clone();
        }
        self.live_diff(id)
    }

    /// The persisted snapshot for a record, if one exists.
    pub fn snapshot(&self, id: &RecordId) -> Option<&Map<String, Value>> {
        self.snapshots.get(id)
    }

    /// Marks all pending work as persisted, simulating the tail of a host
    /// flush: insertions are drained, frozen change sets are consumed, and
    /// every record's snapshot becomes its current state.
    pub fn commit(&mut self) {
        self.insertion_order.clear();
        self.change_sets.clear();
        for (id, record) in &self.records {
            self.snapshots.insert(id.clone(), record.fields.clone());
        }
    }

    fn live_diff(&self, id: &RecordId) -> ChangeSet {
        let mut diff = ChangeSet::new();
        let Some(record) = self.records.get(id) else {
            return diff;
        };
        let empty = Map::new();
        let before = self.snapshots.get(id).unwrap_or(&empty);

        for (name, after) in &record.fields {
            if before.get(name) != Some(after) {
                diff.insert(
                    name.clone(),
                    (before.get(name).cloned(), Some(after.clone())),
                );
            }
        }
        for (name, old) in before {
            if !record.fields.contains_key(name) {
                diff.insert(name.clone(), (Some(old.clone()), None));
            }
        }
        diff
    }
}

impl UnitOfWork for InMemoryUnitOfWork {
    fn pending_insertions(&self) -> Vec<RecordId> {
        self.insertion_order.clone()
    }

    fn pending_updates(&self) -> Vec<RecordId> {
        self.records
            .values()
            .filter(|record| {
                self.snapshots
                    .get(&record.id)
                    .is_some_and(|snapshot| *snapshot != record.fields)
            })
            .map(|record| record.id.clone())
            .collect()
    }

    fn record(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    fn record_mut(&mut self, id: &RecordId) -> Option<&mut Record> {
        self.records.get_mut(id)
    }

    fn type_metadata(&self, record_type: &str) -> Option<&TypeMetadata> {
        self.metadata.get(record_type)
    }

    fn recompute_change_snapshot(&mut self, _record_type: &str, id: &RecordId) {
        let diff = self.live_diff(id);
        if !diff.is_empty() {
            self.change_sets.insert(id.clone(), diff);
        }
        if let Some(record) = self.records.get(id) {
            self.snapshots.insert(id.clone(), record.fields.clone());
        }
    }
}
