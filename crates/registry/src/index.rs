use std::collections::HashMap;

use log::warn;

use crate::error::{RegistryError, Result};
use crate::model::SnapshotEntry;

/// Two views over a trusted snapshot.
///
/// `by_entity_key` is one-to-one; `by_code` is one-to-many and keeps the
/// snapshot order of entities sharing a code.
#[derive(Debug, Clone, Default)]
pub struct DualIndex {
    by_entity_key: HashMap<String, (String, String)>,
    by_code: HashMap<String, Vec<(String, String)>>,
    /// Entity keys in snapshot order.
    order: Vec<String>,
}

impl DualIndex {
    /// Index the snapshot up to its first sentinel entry.
    pub fn build(snapshot: &[SnapshotEntry]) -> Result<Self> {
        let mut index = Self::default();

        for entry in snapshot {
            if entry.is_sentinel() {
                if !entry.code.is_empty() {
                    warn!("sentinel entry carries code '{}'", entry.code);
                }
                break;
            }
            if index.by_entity_key.contains_key(&entry.entity_key) {
                return Err(RegistryError::DuplicateEntityKey {
                    key: entry.entity_key.clone(),
                    code: entry.code.clone(),
                    display_text: entry.display_text.clone(),
                });
            }
            index.by_entity_key.insert(
                entry.entity_key.clone(),
                (entry.code.clone(), entry.display_text.clone()),
            );
            index
                .by_code
                .entry(entry.code.clone())
                .or_default()
                .push((entry.entity_key.clone(), entry.display_text.clone()));
            index.order.push(entry.entity_key.clone());
        }

        Ok(index)
    }

    /// `(code, display_text)` registered under `entity_key`.
    pub fn lookup(&self, entity_key: &str) -> Option<(&str, &str)> {
        self.by_entity_key
            .get(entity_key)
            .map(|(code, text)| (code.as_str(), text.as_str()))
    }

    /// `(entity_key, display_text)` of every entity sharing `code`, in snapshot order.
    pub fn entities_for_code(&self, code: &str) -> &[(String, String)] {
        self.by_code.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entity keys in snapshot order.
    pub fn entity_keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
