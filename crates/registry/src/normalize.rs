//! Row Normalizer: raw sheet rows in, canonical records out.
//!
//! Each row is validated once against a [`ColumnLayout`] and yields a tagged
//! [`RowOutcome`]. Only violations of the registry shape are errors; a row
//! that merely does not carry data is skipped, and the first row that cannot
//! belong to the table ends the scan.

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, RawRow};
use crate::config::{ColumnLayout, DEFAULT_CODE_WIDTH};
use crate::error::{RegistryError, Result};
use crate::model::CanonicalRecord;
use crate::text::{collapse_spaces, normalize_display, simplify};

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// How tolerant the scan is towards gaps in required cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetMode {
    /// Every data row is complete; a gap means the input is broken.
    #[default]
    Strict,
    /// Headings and sentinel rows are interleaved with data; gaps are skipped.
    Heterogeneous,
}

/// Fixed-width rendering of numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthPolicy {
    pub digits: usize,
}

impl Default for WidthPolicy {
    fn default() -> Self {
        Self {
            digits: DEFAULT_CODE_WIDTH,
        }
    }
}

impl WidthPolicy {
    /// Zero-padded rendering of `value`; fails when it cannot fit the width.
    pub fn render(&self, value: i64) -> Result<String> {
        let code = format!("{:0width$}", value, width = self.digits);
        if code.len() != self.digits {
            return Err(RegistryError::CodeWidth {
                code,
                width: self.digits,
            });
        }
        Ok(code)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NormalizePolicy {
    pub width: WidthPolicy,
    pub mode: SheetMode,
    pub layout: ColumnLayout,
    /// Leading rows that are headers, never data.
    pub header_rows: usize,
    /// Scans ending before this many rows mean the input was truncated.
    pub min_rows: Option<usize>,
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Header,
    Heading,
    MissingField(&'static str),
    InvalidCode(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header row"),
            Self::Heading => write!(f, "heading row"),
            Self::MissingField(field) => write!(f, "missing {field}"),
            Self::InvalidCode(code) => write!(f, "invalid code '{code}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Record(CanonicalRecord),
    Skip(SkipReason),
    /// The row cannot belong to the table: stop scanning this sheet.
    End,
}

/// Records taken from one sheet, in sheet order.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<CanonicalRecord>,
    /// 1-based row number and reason, for every dropped row.
    pub skipped: Vec<(usize, SkipReason)>,
    /// Rows looked at, including the one that ended the scan.
    pub rows_scanned: usize,
}

// ---------------------------------------------------------------------------
// Normalize
// ---------------------------------------------------------------------------

/// Normalize one row; `row_number` is 1-based and only used for reporting
/// and header detection.
pub fn normalize(row: &RawRow, row_number: usize, policy: &NormalizePolicy) -> Result<RowOutcome> {
    let layout = &policy.layout;
    if row.len() < layout.required_len() {
        return Ok(RowOutcome::End);
    }
    let strict = policy.mode == SheetMode::Strict;
    if strict && !row.first().is_some_and(Cell::is_text) {
        return Ok(RowOutcome::End);
    }
    if row_number <= policy.header_rows {
        return Ok(RowOutcome::Skip(SkipReason::Header));
    }
    if let Some(marker) = layout.marker {
        if row[marker].is_present() {
            return Ok(RowOutcome::Skip(SkipReason::Heading));
        }
    }

    let required = [
        ("code", layout.code),
        ("display text", layout.display_text),
        ("entity key", layout.entity_key),
    ];
    for (field, col) in required {
        if !row[col].is_present() {
            if strict {
                return Err(RegistryError::MissingField {
                    row: row_number,
                    field,
                });
            }
            return Ok(RowOutcome::Skip(SkipReason::MissingField(field)));
        }
    }

    let code_cell = &row[layout.code];
    let Some(value) = code_cell.as_integer() else {
        let shown = code_cell.as_text().unwrap_or_default();
        warn!("row {row_number}: invalid code '{shown}', skipped");
        return Ok(RowOutcome::Skip(SkipReason::InvalidCode(shown)));
    };
    let code = policy.width.render(value)?;

    let raw_text = row[layout.display_text].as_text().unwrap_or_default();
    let display_text = normalize_display(&simplify(&raw_text), row_number)?;

    let entity_key = if layout.entity_key == layout.code {
        code.clone()
    } else {
        let raw = row[layout.entity_key].as_text().unwrap_or_default();
        collapse_spaces(&simplify(&raw))
    };
    if entity_key.is_empty() {
        if strict {
            return Err(RegistryError::MissingField {
                row: row_number,
                field: "entity key",
            });
        }
        return Ok(RowOutcome::Skip(SkipReason::MissingField("entity key")));
    }

    let entity_type = layout
        .entity_type
        .and_then(|col| row[col].as_text())
        .map(|t| collapse_spaces(&simplify(&t)))
        .unwrap_or_default();

    Ok(RowOutcome::Record(CanonicalRecord {
        code,
        display_text,
        entity_key,
        entity_type,
    }))
}

/// Scan a sheet top to bottom until its data ends.
pub fn extract(rows: &[RawRow], policy: &NormalizePolicy) -> Result<Extraction> {
    let mut extraction = Extraction::default();

    for (idx, row) in rows.iter().enumerate() {
        let row_number = idx + 1;
        extraction.rows_scanned = row_number;
        match normalize(row, row_number, policy)? {
            RowOutcome::Record(record) => {
                debug!("# {row_number}, code={} item: {:?}", record.code, record);
                extraction.records.push(record);
            }
            RowOutcome::Skip(reason) => {
                debug!("# {row_number}: skipped ({reason})");
                extraction.skipped.push((row_number, reason));
            }
            RowOutcome::End => break,
        }
    }

    if let Some(minimum) = policy.min_rows {
        if extraction.rows_scanned < minimum {
            return Err(RegistryError::TruncatedInput {
                rows: extraction.rows_scanned,
                minimum,
            });
        }
    }

    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetConfig;

    fn row(cells: &[&str]) -> RawRow {
        cells
            .iter()
            .map(|c| if c.is_empty() { Cell::Empty } else { Cell::from(*c) })
            .collect()
    }

    fn record(outcome: RowOutcome) -> CanonicalRecord {
        match outcome {
            RowOutcome::Record(r) => r,
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn collapses_and_pads() {
        let raw = row(&["0007", "  Caixa   Geral  ", "Caixa Geral", "branch"]);
        let r = record(normalize(&raw, 1, &NormalizePolicy::default()).unwrap());
        assert_eq!(r.code, "0007");
        assert_eq!(r.display_text, "Caixa Geral");
        assert_eq!(r.entity_key, "Caixa Geral");
        assert_eq!(r.entity_type, "branch");
    }

    #[test]
    fn numeric_code_cell_is_padded() {
        let raw = vec![
            Cell::Number(35.0),
            Cell::from("Caixa Geral de Depósitos"),
            Cell::from("CGD"),
            Cell::from("banco"),
        ];
        let policy = NormalizePolicy {
            mode: SheetMode::Heterogeneous,
            ..Default::default()
        };
        let r = record(normalize(&raw, 2, &policy).unwrap());
        assert_eq!(r.code, "0035");
        assert_eq!(r.display_text, "Caixa Geral de Depositos");
    }

    #[test]
    fn short_row_ends_scan() {
        let raw = row(&["0001", "Bank"]);
        assert_eq!(
            normalize(&raw, 1, &NormalizePolicy::default()).unwrap(),
            RowOutcome::End
        );
    }

    #[test]
    fn strict_non_text_first_cell_ends_scan() {
        let raw = vec![Cell::Empty, Cell::from("x"), Cell::from("y"), Cell::from("z")];
        assert_eq!(
            normalize(&raw, 5, &NormalizePolicy::default()).unwrap(),
            RowOutcome::End
        );
    }

    #[test]
    fn strict_missing_name_is_fatal() {
        let raw = row(&["0001", "", "A1", "banco"]);
        let err = normalize(&raw, 4, &NormalizePolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingField {
                row: 4,
                field: "display text"
            }
        ));
    }

    #[test]
    fn heterogeneous_gap_is_skipped() {
        let policy = NormalizePolicy {
            mode: SheetMode::Heterogeneous,
            ..Default::default()
        };
        let raw = row(&["0001", "", "A1", "banco"]);
        assert_eq!(
            normalize(&raw, 4, &policy).unwrap(),
            RowOutcome::Skip(SkipReason::MissingField("display text"))
        );
    }

    #[test]
    fn blank_entity_key_follows_sheet_mode() {
        let raw = row(&["0001", "Bank", "   ", "x"]);
        let heterogeneous = NormalizePolicy {
            mode: SheetMode::Heterogeneous,
            ..Default::default()
        };
        assert_eq!(
            normalize(&raw, 7, &heterogeneous).unwrap(),
            RowOutcome::Skip(SkipReason::MissingField("entity key"))
        );

        let err = normalize(&raw, 7, &NormalizePolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingField {
                row: 7,
                field: "entity key"
            }
        ));
    }

    #[test]
    fn invalid_code_is_skipped_not_fatal() {
        let raw = row(&["00x1", "Bank", "A1", "banco"]);
        assert_eq!(
            normalize(&raw, 3, &NormalizePolicy::default()).unwrap(),
            RowOutcome::Skip(SkipReason::InvalidCode("00x1".into()))
        );
    }

    #[test]
    fn oversized_code_is_fatal() {
        let raw = row(&["12345", "Bank", "A1", "banco"]);
        let err = normalize(&raw, 3, &NormalizePolicy::default()).unwrap_err();
        assert!(matches!(err, RegistryError::CodeWidth { width: 4, .. }));
    }

    #[test]
    fn nibs_layout_skips_headings() {
        let policy = SheetConfig::nibs().policy(WidthPolicy::default());
        let heading = row(&["Bancos", "", ""]);
        assert_eq!(
            normalize(&heading, 1, &policy).unwrap(),
            RowOutcome::Skip(SkipReason::Heading)
        );
        let data = vec![Cell::Empty, Cell::Number(10.0), Cell::from("Banco BPI")];
        let r = record(normalize(&data, 2, &policy).unwrap());
        assert_eq!(r.code, "0010");
        assert_eq!(r.entity_key, "0010");
        assert_eq!(r.entity_type, "");
    }

    #[test]
    fn extract_stops_at_end_and_counts() {
        let mut policy = SheetConfig::lista().policy(WidthPolicy::default());
        policy.min_rows = None;
        let rows = vec![
            row(&["Codigo", "Agente", "Nome", "Tipo"]),
            row(&["0001", "A1", "Banco de Portugal", "banco central"]),
            row(&["0007", "A7", "Novo  Banco", "banco"]),
            vec![Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty],
            row(&["0009", "A9", "never reached", "banco"]),
        ];
        let extraction = extract(&rows, &policy).unwrap();
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.records[0].entity_key, "A1");
        assert_eq!(extraction.records[1].display_text, "Novo Banco");
        assert_eq!(extraction.skipped, vec![(1, SkipReason::Header)]);
        assert_eq!(extraction.rows_scanned, 4);
    }

    #[test]
    fn extract_rejects_truncated_input() {
        let policy = SheetConfig::lista().policy(WidthPolicy::default());
        let rows = vec![
            row(&["Codigo", "Agente", "Nome", "Tipo"]),
            row(&["0001", "A1", "Banco de Portugal", "banco central"]),
        ];
        let err = extract(&rows, &policy).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::TruncatedInput {
                rows: 2,
                minimum: 178
            }
        ));
    }
}
