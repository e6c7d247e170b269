/// A single cell value as handed over by the workbook reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

/// One tabular line, cells in column order.
pub type RawRow = Vec<Cell>;

impl Cell {
    /// True for any value other than `Empty` or an empty string.
    pub fn is_present(&self) -> bool {
        match self {
            Cell::Text(s) => !s.is_empty(),
            Cell::Number(_) => true,
            Cell::Empty => false,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Cell::Text(_))
    }

    /// Text rendering; integral numbers render without decimals.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(format!("{}", n))
                }
            }
            Cell::Empty => None,
        }
    }

    /// Integer value of the cell, if it holds one.
    ///
    /// Text is trimmed before parsing; numbers must be integral.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Text(s) => s.trim().parse().ok(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(*n as i64),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}
