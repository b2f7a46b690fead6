//! Workbook reading and sheet materialization.

use crate::container::XlsxPackage;
use crate::error::{Error, Result};
use crate::model::{CellValue, Grid, Row};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::shared_strings::SharedStrings;

/// Sheet entry from workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// An open xlsx workbook.
///
/// Holds the package, the shared string table and the sheet directory;
/// individual sheets are materialized into a [`Grid`] on demand.
pub struct Workbook {
    package: XlsxPackage,
    shared_strings: SharedStrings,
    sheets: Vec<SheetInfo>,
    relationships: HashMap<String, String>,
}

impl Workbook {
    /// Open an xlsx workbook from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let package = XlsxPackage::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "workbook opened");
        Self::from_package(package)
    }

    /// Open an xlsx workbook from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(XlsxPackage::from_bytes(data)?)
    }

    fn from_package(package: XlsxPackage) -> Result<Self> {
        // Shared strings are optional; a workbook of pure numbers has none.
        let shared_strings = if let Ok(xml) = package.read_xml("xl/sharedStrings.xml") {
            SharedStrings::parse(&xml)?
        } else {
            SharedStrings::default()
        };

        let relationships = Self::parse_workbook_rels(&package)?;
        let sheets = Self::parse_workbook(&package)?;

        Ok(Self {
            package,
            shared_strings,
            sheets,
            relationships,
        })
    }

    /// Parse workbook relationships into an id-to-target map.
    fn parse_workbook_rels(package: &XlsxPackage) -> Result<HashMap<String, String>> {
        let mut rels = HashMap::new();

        if let Ok(xml) = package.read_xml("xl/_rels/workbook.xml.rels") {
            let mut reader = quick_xml::Reader::from_str(&xml);
            reader.config_mut().trim_text(true);

            let mut buf = Vec::new();

            loop {
                match reader.read_event_into(&mut buf) {
                    Ok(quick_xml::events::Event::Empty(e))
                    | Ok(quick_xml::events::Event::Start(e)) => {
                        if e.name().as_ref() == b"Relationship" {
                            let mut id = String::new();
                            let mut target = String::new();

                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"Id" => {
                                        id = String::from_utf8_lossy(&attr.value).to_string();
                                    }
                                    b"Target" => {
                                        target = String::from_utf8_lossy(&attr.value).to_string();
                                    }
                                    _ => {}
                                }
                            }

                            if !id.is_empty() && !target.is_empty() {
                                rels.insert(id, target);
                            }
                        }
                    }
                    Ok(quick_xml::events::Event::Eof) => break,
                    Err(e) => return Err(Error::XmlParse(e.to_string())),
                    _ => {}
                }
                buf.clear();
            }
        }

        Ok(rels)
    }

    /// Parse workbook.xml for the sheet directory.
    fn parse_workbook(package: &XlsxPackage) -> Result<Vec<SheetInfo>> {
        let mut sheets = Vec::new();

        let xml = package.read_xml("xl/workbook.xml")?;
        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e))
                | Ok(quick_xml::events::Event::Start(e)) => {
                    if e.name().as_ref() == b"sheet" {
                        let mut name = String::new();
                        let mut rel_id = String::new();

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"name" => {
                                    name = String::from_utf8_lossy(&attr.value).to_string();
                                }
                                b"r:id" => {
                                    rel_id = String::from_utf8_lossy(&attr.value).to_string();
                                }
                                _ => {}
                            }
                        }

                        if !name.is_empty() {
                            sheets.push(SheetInfo { name, rel_id });
                        }
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Get the number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Check whether a sheet with this name exists.
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.iter().any(|s| s.name == name)
    }

    /// Materialize a sheet into a grid.
    ///
    /// Returns [`Error::SheetNotFound`] for names absent from the workbook.
    pub fn grid(&self, sheet_name: &str) -> Result<Grid> {
        let sheet = self
            .sheets
            .iter()
            .find(|s| s.name == sheet_name)
            .ok_or_else(|| Error::SheetNotFound(sheet_name.to_string()))?;

        let target = self.relationships.get(&sheet.rel_id).ok_or_else(|| {
            Error::MissingComponent(format!("worksheet target for '{}'", sheet_name))
        })?;

        let sheet_path = if let Some(stripped) = target.strip_prefix('/') {
            stripped.to_string()
        } else {
            format!("xl/{}", target)
        };

        let xml = self.package.read_xml(&sheet_path)?;
        let grid = self.parse_sheet(&xml)?;
        debug!(
            sheet = sheet_name,
            rows = grid.row_count(),
            columns = grid.column_count(),
            "grid materialized"
        );
        Ok(grid)
    }

    /// Parse a worksheet XML into a grid.
    ///
    /// Cell `r` references place values at their true column index, with
    /// empty padding in between, so sparse rows keep positional addressing.
    /// Cells without a reference take the next position in file order.
    /// Whitespace inside cell text is preserved.
    fn parse_sheet(&self, xml: &str) -> Result<Grid> {
        let mut grid = Grid::new();
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut buf = Vec::new();
        let mut in_row = false;
        let mut in_cell = false;
        let mut in_value = false;
        let mut cells: Vec<CellValue> = Vec::new();
        let mut cell_type: Option<String> = None;
        let mut cell_column: Option<usize> = None;
        let mut cell_text = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e)) => match e.name().as_ref() {
                    b"row" => {
                        in_row = true;
                        cells.clear();
                    }
                    b"c" if in_row => {
                        in_cell = true;
                        cell_type = None;
                        cell_column = None;
                        cell_text.clear();

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"t" => {
                                    cell_type =
                                        Some(String::from_utf8_lossy(&attr.value).to_string());
                                }
                                b"r" => {
                                    cell_column =
                                        column_index(&String::from_utf8_lossy(&attr.value));
                                }
                                _ => {}
                            }
                        }
                    }
                    b"v" if in_cell => {
                        in_value = true;
                    }
                    b"t" if in_cell => {
                        // Inline string content
                        in_value = true;
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::Empty(ref e)) => match e.name().as_ref() {
                    b"row" => {
                        grid.add_row(Row::new());
                    }
                    b"c" if in_row => {
                        // Valueless cell: still occupies its column.
                        let mut column = None;
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"r" {
                                column = column_index(&String::from_utf8_lossy(&attr.value));
                            }
                        }
                        place_cell(&mut cells, column, CellValue::Empty);
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::Text(ref e)) => {
                    if in_value {
                        let text = e.unescape().unwrap_or_default();
                        cell_text.push_str(&text);
                    }
                }
                Ok(quick_xml::events::Event::End(ref e)) => match e.name().as_ref() {
                    b"row" => {
                        grid.add_row(Row::from_cells(std::mem::take(&mut cells)));
                        in_row = false;
                    }
                    b"c" => {
                        let value = self.resolve_cell_value(&cell_text, cell_type.as_deref());
                        place_cell(&mut cells, cell_column, value);
                        in_cell = false;
                    }
                    b"v" | b"t" => {
                        in_value = false;
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(grid)
    }

    /// Resolve a cell's raw text into a typed value.
    fn resolve_cell_value(&self, raw: &str, cell_type: Option<&str>) -> CellValue {
        if raw.is_empty() {
            return CellValue::Empty;
        }
        match cell_type {
            Some("s") => {
                // Shared string index
                match raw.trim().parse::<usize>() {
                    Ok(idx) => match self.shared_strings.get(idx) {
                        Some(s) => CellValue::text(s),
                        None => CellValue::Empty,
                    },
                    Err(_) => CellValue::text(raw),
                }
            }
            Some("b") => CellValue::Bool(raw.trim() == "1"),
            Some("str") | Some("inlineStr") => CellValue::text(raw),
            Some("e") => {
                // Error cells surface as their error text.
                CellValue::text(raw)
            }
            _ => parse_number(raw),
        }
    }
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("sheets", &self.sheet_names())
            .field("shared_strings", &self.shared_strings.len())
            .finish()
    }
}

/// Column index from an A1-style cell reference (`"B7"` is column 1).
fn column_index(cell_ref: &str) -> Option<usize> {
    let mut index: usize = 0;
    let mut seen = false;
    for c in cell_ref.chars() {
        if !c.is_ascii_alphabetic() {
            break;
        }
        seen = true;
        index = index * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    if seen {
        Some(index - 1)
    } else {
        None
    }
}

/// Place a value at its column, padding skipped columns with empties.
fn place_cell(cells: &mut Vec<CellValue>, column: Option<usize>, value: CellValue) {
    match column {
        Some(index) => {
            if index >= cells.len() {
                cells.resize(index, CellValue::Empty);
                cells.push(value);
            } else {
                cells[index] = value;
            }
        }
        None => cells.push(value),
    }
}

/// Parse a general cell: integer first, then float, otherwise text.
fn parse_number(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return CellValue::Int(n);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }
    CellValue::text(raw)
}
