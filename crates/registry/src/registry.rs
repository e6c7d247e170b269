use std::collections::BTreeMap;

use log::debug;

use crate::error::{RegistryError, Result};
use crate::model::CanonicalRecord;
use crate::normalize::WidthPolicy;

pub const RESERVED_TEXT: &str = "(RESERVED)";

/// Code → display text, unique by code, iterated in code order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: BTreeMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the all-zero reserved code.
    pub fn with_reserved(width: WidthPolicy) -> Result<Self> {
        let code = width.render(0)?;
        let mut entries = BTreeMap::new();
        entries.insert(code, RESERVED_TEXT.to_string());
        Ok(Self { entries })
    }

    /// Add one record. The same code may only come back with the same text.
    pub fn insert(mut self, record: &CanonicalRecord) -> Result<Self> {
        match self.entries.get(&record.code) {
            Some(existing) if *existing == record.display_text => {
                debug!("code {} repeated with identical text", record.code);
            }
            Some(existing) => {
                return Err(RegistryError::DuplicateCode {
                    code: record.code.clone(),
                    existing: existing.clone(),
                    incoming: record.display_text.clone(),
                });
            }
            None => {
                self.entries
                    .insert(record.code.clone(), record.display_text.clone());
            }
        }
        Ok(self)
    }

    /// Fold `records` into `self`, stopping at the first duplicate code.
    pub fn extend<'a, I>(self, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a CanonicalRecord>,
    {
        records
            .into_iter()
            .try_fold(self, |registry, record| registry.insert(record))
    }

    pub fn from_records<'a, I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a CanonicalRecord>,
    {
        Self::new().extend(records)
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, reserved ones included, in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries as they are written out: ascending code, reserved codes left out.
    ///
    /// Every written code must have exactly the configured width.
    pub fn persisted(&self, width: WidthPolicy) -> Result<Vec<(&str, &str)>> {
        let mut lines = Vec::with_capacity(self.entries.len());
        for (code, text) in self.iter() {
            if is_reserved(code) {
                continue;
            }
            if code.len() != width.digits {
                return Err(RegistryError::CodeWidth {
                    code: code.to_string(),
                    width: width.digits,
                });
            }
            lines.push((code, text));
        }
        Ok(lines)
    }
}

/// Purely numeric codes evaluating to zero or less.
fn is_reserved(code: &str) -> bool {
    let digits = code.strip_prefix('-').unwrap_or(code);
    !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && code.parse::<i64>().is_ok_and(|n| n <= 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(code: &str, text: &str) -> CanonicalRecord {
        CanonicalRecord {
            code: code.into(),
            display_text: text.into(),
            entity_key: code.into(),
            entity_type: String::new(),
        }
    }

    #[test]
    fn duplicate_code_with_other_text_fails() {
        let err = Registry::from_records(&[rec("0001", "Bank One"), rec("0001", "Bank Two")])
            .unwrap_err();
        match err {
            RegistryError::DuplicateCode {
                code,
                existing,
                incoming,
            } => {
                assert_eq!(code, "0001");
                assert_eq!(existing, "Bank One");
                assert_eq!(incoming, "Bank Two");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn duplicate_code_with_same_text_is_kept_once() {
        let registry =
            Registry::from_records(&[rec("0001", "Bank One"), rec("0001", "Bank One")]).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("0001"), Some("Bank One"));
    }

    #[test]
    fn persisted_is_sorted_and_drops_reserved() {
        let registry = Registry::with_reserved(WidthPolicy::default())
            .unwrap()
            .extend(&[rec("0033", "Millennium BCP"), rec("0010", "Banco BPI")])
            .unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("0000"), Some(RESERVED_TEXT));

        let lines = registry.persisted(WidthPolicy::default()).unwrap();
        assert_eq!(lines, vec![("0010", "Banco BPI"), ("0033", "Millennium BCP")]);
    }

    #[test]
    fn persisted_checks_width() {
        let registry = Registry::from_records(&[rec("010", "Short")]).unwrap();
        let err = registry.persisted(WidthPolicy::default()).unwrap_err();
        assert!(matches!(err, RegistryError::CodeWidth { width: 4, .. }));
    }

    #[test]
    fn reserved_codes() {
        assert!(is_reserved("0000"));
        assert!(is_reserved("-001"));
        assert!(!is_reserved("0001"));
        assert!(!is_reserved("AB00"));
        assert!(!is_reserved("-"));
    }
}
