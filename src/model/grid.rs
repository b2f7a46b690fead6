//! Materialized sheet data as a rectangular grid.

use serde::{Deserialize, Serialize};

/// Scalar content of a single cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Blank or absent cell.
    #[default]
    Empty,
    /// Text content.
    Text(String),
    /// Integer number.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Boolean value.
    Bool(bool),
}

impl CellValue {
    /// Create a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Whether the value counts as present for metadata extraction.
    ///
    /// Empty cells, empty strings, zero and `false` do not count.
    /// Whitespace-only text does.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Text(s) => !s.is_empty(),
            CellValue::Int(n) => *n != 0,
            CellValue::Float(f) => *f != 0.0,
            CellValue::Bool(b) => *b,
        }
    }

    /// Render the value the way it would appear in a cell.
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(n) => n.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(b) => {
                if *b {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                }
            }
        }
    }

    /// Get the text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this cell is blank.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// A single row of cells in file order.
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    /// Create a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row from a list of cells.
    pub fn from_cells(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Append a cell to this row.
    pub fn push(&mut self, value: CellValue) {
        self.cells.push(value);
    }

    /// Get the cell at a column index.
    ///
    /// Every position is addressable; columns past the end read as
    /// [`CellValue::Empty`].
    pub fn cell(&self, column: usize) -> &CellValue {
        self.cells.get(column).unwrap_or(&CellValue::Empty)
    }

    /// Number of populated columns.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// An ordered collection of rows read from a sheet.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    /// Create a new empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid from a list of rows.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Append a row to the grid.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Iterate over rows in top-to-bottom order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Get a row by index.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Check if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!CellValue::Empty.is_truthy());
        assert!(!CellValue::text("").is_truthy());
        assert!(!CellValue::Int(0).is_truthy());
        assert!(!CellValue::Float(0.0).is_truthy());
        assert!(!CellValue::Bool(false).is_truthy());

        assert!(CellValue::text("x").is_truthy());
        assert!(CellValue::text("  ").is_truthy());
        assert!(CellValue::Int(-3).is_truthy());
        assert!(CellValue::Float(0.5).is_truthy());
        assert!(CellValue::Bool(true).is_truthy());
    }

    #[test]
    fn test_display_string() {
        assert_eq!(CellValue::Empty.to_display_string(), "");
        assert_eq!(CellValue::text(" CRIT-1 ").to_display_string(), " CRIT-1 ");
        assert_eq!(CellValue::Int(42).to_display_string(), "42");
        assert_eq!(CellValue::Float(2.5).to_display_string(), "2.5");
        assert_eq!(CellValue::Bool(true).to_display_string(), "TRUE");
        assert_eq!(CellValue::Bool(false).to_display_string(), "FALSE");
    }

    #[test]
    fn test_row_addressing() {
        let row = Row::from_cells(vec![CellValue::text("a"), CellValue::Int(1)]);
        assert_eq!(row.cell(0), &CellValue::text("a"));
        assert_eq!(row.cell(1), &CellValue::Int(1));
        assert_eq!(row.cell(99), &CellValue::Empty);
    }

    #[test]
    fn test_grid_column_count() {
        let mut grid = Grid::new();
        grid.add_row(Row::from_cells(vec![CellValue::text("a")]));
        grid.add_row(Row::from_cells(vec![
            CellValue::text("b"),
            CellValue::text("c"),
            CellValue::text("d"),
        ]));
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 3);
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::new();
        assert!(grid.is_empty());
        assert_eq!(grid.column_count(), 0);
    }
}
