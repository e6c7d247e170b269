// Excel workbook reading (xlsx, xls, xlsb, ods)
//
// Rows come back as plain cell values in column order. Column A is always
// index 0 and sheet row 1 is always `rows[0]`: empty rows and columns before
// the used range are padded with `Cell::Empty`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use log::{debug, info};
use nibtab_registry::{Cell, RawRow};

use crate::error::IoError;

/// Which sheet to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Name(String),
    /// 1-based position in the workbook.
    Index(usize),
}

impl std::fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => write!(f, "'{name}'"),
            Self::Index(idx) => write!(f, "#{idx}"),
        }
    }
}

pub struct WorkbookReader {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl WorkbookReader {
    pub fn open(path: &Path) -> Result<Self, IoError> {
        info!("Reading {}", path.display());
        let sheets = open_workbook_auto(path).map_err(|e| IoError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names().to_vec()
    }

    /// Resolve a selector to a sheet name; `None` when there is no such sheet.
    pub fn resolve(&self, selector: &SheetSelector) -> Result<Option<String>, IoError> {
        let names = self.sheet_names();
        match selector {
            SheetSelector::Name(name) => Ok(names.into_iter().find(|n| n == name)),
            SheetSelector::Index(0) => Err(IoError::SheetIndex(0)),
            SheetSelector::Index(idx) => Ok(names.into_iter().nth(idx - 1)),
        }
    }

    /// All rows of the selected sheet; `None` when there is no such sheet.
    pub fn rows(&mut self, selector: &SheetSelector) -> Result<Option<Vec<RawRow>>, IoError> {
        let Some(name) = self.resolve(selector)? else {
            debug!("{}: no sheet {selector}", self.path.display());
            return Ok(None);
        };

        let range = self
            .sheets
            .worksheet_range(&name)
            .map_err(|e| IoError::Sheet {
                sheet: name.clone(),
                message: e.to_string(),
            })?;

        // Range start offset (data may not begin at A1)
        let (start_row, start_col) = range
            .start()
            .map_or((0, 0), |(row, col)| (row as usize, col as usize));
        let width = start_col + range.width();

        let leading = std::iter::repeat_with(|| vec![Cell::Empty; width]).take(start_row);
        let rows: Vec<RawRow> = leading
            .chain(range.rows().map(|row| {
                std::iter::repeat(Cell::Empty)
                    .take(start_col)
                    .chain(row.iter().map(to_cell))
                    .collect()
            }))
            .collect();

        debug!("sheet '{name}': {} row(s)", rows.len());
        Ok(Some(rows))
    }
}

/// Read one sheet of the workbook at `path`.
pub fn read_sheet(path: &Path, selector: &SheetSelector) -> Result<Option<Vec<RawRow>>, IoError> {
    WorkbookReader::open(path)?.rows(selector)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        // Serial date value, as Excel stores it
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
    }
}
