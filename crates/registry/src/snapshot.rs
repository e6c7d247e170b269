// Snapshot derivation from the workbook's reference sheets.
//
// Each reference row is (code, entity key, name). The result is what gets
// published as the trusted snapshot.

use std::collections::HashSet;

use log::{debug, info};

use crate::cell::{Cell, RawRow};
use crate::error::{RegistryError, Result};
use crate::model::SnapshotEntry;
use crate::normalize::WidthPolicy;
use crate::text::{collapse_spaces, flatten_newlines, simplify};

/// Code-cell value of the header row in the reference sheets.
const HEADER_CODE: &str = "IBAN";

#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    width: WidthPolicy,
    entries: Vec<SnapshotEntry>,
    seen: HashSet<String>,
}

impl SnapshotBuilder {
    pub fn new(width: WidthPolicy) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    /// Take every usable row of one sheet.
    pub fn add_rows(&mut self, rows: &[RawRow]) -> Result<()> {
        for (idx, row) in rows.iter().enumerate() {
            let cells: Vec<&Cell> = row.iter().take(3).collect();
            if cells.len() < 3 || cells.iter().any(|c| !c.is_present()) {
                debug!("row {}: incomplete, skipped", idx + 1);
                continue;
            }
            let code_text = cells[0].as_text().unwrap_or_default();
            if code_text.trim() == HEADER_CODE {
                info!("header: {:?}", row);
                continue;
            }
            let code = match cells[0].as_integer() {
                Some(value) => self.width.render(value)?,
                None => collapse_spaces(&simplify(&code_text)),
            };
            let entity_key = cleaned(cells[1]);
            let display_text = cleaned(cells[2]);

            if !self.seen.insert(entity_key.clone()) {
                return Err(RegistryError::DuplicateEntityKey {
                    key: entity_key,
                    code,
                    display_text,
                });
            }
            debug!("#\t{code}.{entity_key}: {display_text}");
            self.entries.push(SnapshotEntry {
                entity_key,
                display_text,
                code,
            });
        }
        Ok(())
    }

    /// Entries ordered by name, then entity key.
    pub fn finish(mut self) -> Vec<SnapshotEntry> {
        self.entries.sort_by(|a, b| {
            a.display_text
                .cmp(&b.display_text)
                .then_with(|| a.entity_key.cmp(&b.entity_key))
        });
        self.entries
    }
}

/// Single-line, simplified text of a cell.
fn cleaned(cell: &Cell) -> String {
    collapse_spaces(&flatten_newlines(&simplify(&cell.as_text().unwrap_or_default())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> RawRow {
        cells
            .iter()
            .map(|c| if c.is_empty() { Cell::Empty } else { Cell::from(*c) })
            .collect()
    }

    #[test]
    fn header_and_gaps_are_skipped() {
        let mut builder = SnapshotBuilder::new(WidthPolicy::default());
        builder
            .add_rows(&[
                row(&["IBAN", "Agente", "Nome"]),
                row(&["0035", "A35", "Caixa Geral de Depósitos"]),
                row(&["", "", ""]),
                row(&["0010", "", "Banco BPI"]),
                vec![Cell::Number(33.0), Cell::from("A33"), Cell::from("Millennium  BCP")],
            ])
            .unwrap();
        let entries = builder.finish();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].display_text, "Caixa Geral de Depositos");
        assert_eq!(entries[0].code, "0035");
        assert_eq!(entries[1].entity_key, "A33");
        assert_eq!(entries[1].code, "0033");
        assert_eq!(entries[1].display_text, "Millennium BCP");
    }

    #[test]
    fn names_are_flattened_like_list_text() {
        let name = "Caixa Econ\u{f3}mica\nMontepio  Geral";
        let mut builder = SnapshotBuilder::new(WidthPolicy::default());
        builder.add_rows(&[row(&["0036", "MPIOPTPL", name])]).unwrap();
        let entries = builder.finish();
        assert_eq!(entries[0].display_text, "Caixa Economica Montepio Geral");
        assert_eq!(
            entries[0].display_text,
            crate::text::normalize_display(&simplify(name), 2).unwrap()
        );
    }

    #[test]
    fn duplicate_entity_key_across_sheets_fails() {
        let mut builder = SnapshotBuilder::new(WidthPolicy::default());
        builder.add_rows(&[row(&["0001", "A1", "Bank One"])]).unwrap();
        let err = builder
            .add_rows(&[row(&["0002", "A1", "Bank Two"])])
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateEntityKey { .. }));
    }

    #[test]
    fn output_is_sorted_by_name() {
        let mut builder = SnapshotBuilder::new(WidthPolicy::default());
        builder
            .add_rows(&[
                row(&["0002", "B", "Zeta"]),
                row(&["0001", "A", "Alfa"]),
                row(&["0003", "C", "Alfa"]),
            ])
            .unwrap();
        let keys: Vec<String> = builder.finish().into_iter().map(|e| e.entity_key).collect();
        assert_eq!(keys, vec!["A", "C", "B"]);
    }
}
