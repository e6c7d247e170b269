// Raw table dump: the published IBAN list, cell text kept as-is.

use log::debug;

use crate::cell::RawRow;
use crate::error::{RegistryError, Result};
use crate::text::safe_dash;

#[derive(Debug, Clone)]
pub struct DumpPolicy {
    /// Exact number of filled cells a table row has.
    pub columns: usize,
    /// Rows the table is known to exceed.
    pub min_rows: usize,
}

/// One dumped line with its 1-based sheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpLine {
    pub row: usize,
    pub fields: Vec<String>,
}

/// Collect table rows until the first row of a different shape.
///
/// Rows with a line break in any cell are dropped.
pub fn dump_rows(rows: &[RawRow], policy: &DumpPolicy) -> Result<Vec<DumpLine>> {
    let mut lines = Vec::new();
    let mut last = 0;

    for (idx, row) in rows.iter().enumerate() {
        last = idx + 1;
        let fields: Vec<Option<String>> = row
            .iter()
            .map(|c| {
                if c.is_present() {
                    c.as_text().map(|t| safe_dash(&t))
                } else {
                    None
                }
            })
            .collect();
        let filled = fields.iter().filter(|f| f.is_some()).count();
        debug!("{last} {:?}", fields);
        if filled != policy.columns {
            break;
        }
        let fields: Vec<String> = fields.into_iter().flatten().collect();
        if fields.iter().any(|f| f.contains('\n')) {
            continue;
        }
        lines.push(DumpLine { row: last, fields });
    }

    if last < policy.min_rows {
        return Err(RegistryError::TruncatedInput {
            rows: last,
            minimum: policy.min_rows,
        });
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    fn row(cells: &[&str]) -> RawRow {
        cells
            .iter()
            .map(|c| if c.is_empty() { Cell::Empty } else { Cell::from(*c) })
            .collect()
    }

    fn policy(min_rows: usize) -> DumpPolicy {
        DumpPolicy { columns: 4, min_rows }
    }

    #[test]
    fn stops_at_first_short_row() {
        let rows = vec![
            row(&["IBAN", "Agente", "Nome", "Tipo"]),
            row(&["0033", "A33", "Banco Comercial Portugu\u{ea}s", "banco"]),
            row(&["0035", "A35", "", "banco"]),
            row(&["0036", "A36", "Montepio", "caixa"]),
        ];
        let lines = dump_rows(&rows, &policy(3)).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].row, 2);
        // Accents are kept; only the en-dash is replaced
        assert_eq!(lines[1].fields[2], "Banco Comercial Portugu\u{ea}s");
    }

    #[test]
    fn multiline_rows_are_skipped() {
        let rows = vec![
            row(&["0001", "A1", "Banco\nde Portugal", "banco central"]),
            row(&["0002", "A2", "Banco \u{2013} Dois", "banco"]),
        ];
        let lines = dump_rows(&rows, &policy(1)).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].fields[2], "Banco @ Dois");
    }

    #[test]
    fn numbers_render_as_integers() {
        let rows = vec![vec![
            Cell::Number(7.0),
            Cell::from("A7"),
            Cell::from("Novo Banco"),
            Cell::from("banco"),
        ]];
        let lines = dump_rows(&rows, &policy(1)).unwrap();
        assert_eq!(lines[0].fields[0], "7");
    }

    #[test]
    fn short_table_is_truncated_input() {
        let rows = vec![row(&["0001", "A1", "Bank", "banco"])];
        let err = dump_rows(&rows, &policy(178)).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::TruncatedInput {
                rows: 1,
                minimum: 178
            }
        ));
    }
}
