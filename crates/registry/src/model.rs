use std::collections::BTreeSet;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One normalized registry line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalRecord {
    pub code: String,
    pub display_text: String,
    pub entity_key: String,
    pub entity_type: String,
}

/// One entry of a previously published snapshot.
///
/// An empty `entity_key` marks the end of the usable entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    pub entity_key: String,
    pub display_text: String,
    pub code: String,
}

impl SnapshotEntry {
    pub fn is_sentinel(&self) -> bool {
        self.entity_key.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reconciliation output
// ---------------------------------------------------------------------------

/// An extracted record that disagrees with the snapshot entry under the same key.
#[derive(Debug, Clone, Serialize)]
pub struct Mismatch {
    pub extracted: CanonicalRecord,
    pub snapshot: SnapshotEntry,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    pub meta: ReportMeta,
    pub matched: usize,
    pub mismatched: Vec<Mismatch>,
    pub missing: Vec<CanonicalRecord>,
    /// Snapshot entity keys never hit by a matching extracted record.
    pub uncovered: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    pub run_at: String,
    pub extracted: usize,
    pub snapshot_entities: usize,
}
