//! Reconciler: fresh extraction against a trusted snapshot.
//!
//! One deterministic pass over two read-only structures. Every difference is
//! collected into the report; [`ReconciliationReport::verdict`] then decides
//! which one stops the run.

use std::collections::{BTreeSet, HashSet};

use log::debug;

use crate::error::{RegistryError, Result};
use crate::index::DualIndex;
use crate::model::{CanonicalRecord, Mismatch, ReconciliationReport, ReportMeta, SnapshotEntry};

/// Number of snapshot entities shown per code in debug traces.
const SHOWN_PER_CODE: usize = 3;

/// Classify each extracted record, in extraction order, against the snapshot.
pub fn reconcile(extracted: &[CanonicalRecord], index: &DualIndex) -> ReconciliationReport {
    let mut matched = 0;
    let mut mismatched = Vec::new();
    let mut missing = Vec::new();
    let mut hit: HashSet<&str> = HashSet::new();

    for record in extracted {
        trace_code_matches(record, index);
        match index.lookup(&record.entity_key) {
            None => missing.push(record.clone()),
            Some((code, text)) if code == record.code && text == record.display_text => {
                matched += 1;
                hit.insert(record.entity_key.as_str());
            }
            Some((code, text)) => mismatched.push(Mismatch {
                extracted: record.clone(),
                snapshot: SnapshotEntry {
                    entity_key: record.entity_key.clone(),
                    display_text: text.to_string(),
                    code: code.to_string(),
                },
            }),
        }
    }

    let uncovered: BTreeSet<String> = index
        .entity_keys()
        .filter(|key| !hit.contains(key))
        .map(str::to_string)
        .collect();

    ReconciliationReport {
        meta: ReportMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            extracted: extracted.len(),
            snapshot_entities: index.len(),
        },
        matched,
        mismatched,
        missing,
        uncovered,
    }
}

fn trace_code_matches(record: &CanonicalRecord, index: &DualIndex) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    let there = index.entities_for_code(&record.code);
    let shown: Vec<&str> = there
        .iter()
        .take(SHOWN_PER_CODE)
        .map(|(key, _)| key.as_str())
        .collect();
    let more = if there.len() > SHOWN_PER_CODE { ", ..." } else { "" };
    debug!(
        "{} -> match (#{}): [{}{}]",
        record.code,
        there.len(),
        shown.join(", "),
        more
    );
}

impl ReconciliationReport {
    /// True when every gate passes.
    pub fn is_clean(&self) -> bool {
        self.mismatched.is_empty() && self.missing.is_empty() && self.uncovered.is_empty()
    }

    /// Apply the gates in order: mismatch, then missing, then coverage.
    ///
    /// Coverage is only judged once every extracted record found its match.
    pub fn verdict(&self) -> Result<()> {
        if let Some(first) = self.mismatched.first() {
            return Err(RegistryError::Mismatch {
                entity_key: first.extracted.entity_key.clone(),
                extracted_code: first.extracted.code.clone(),
                extracted_text: first.extracted.display_text.clone(),
                snapshot_code: first.snapshot.code.clone(),
                snapshot_text: first.snapshot.display_text.clone(),
                more: self.mismatched.len() - 1,
            });
        }
        if !self.missing.is_empty() {
            return Err(RegistryError::MissingEntries(
                self.missing
                    .iter()
                    .map(|r| format!("{} {} '{}'", r.entity_key, r.code, r.display_text))
                    .collect(),
            ));
        }
        if !self.uncovered.is_empty() {
            return Err(RegistryError::Uncovered(
                self.uncovered.iter().cloned().collect(),
            ));
        }
        Ok(())
    }
}
