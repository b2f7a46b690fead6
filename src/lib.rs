//! # xltree
//!
//! Convert position-encoded Excel tables to nested JSON hierarchies.
//!
//! Each sheet row encodes one node at exactly one hierarchy level, chosen by
//! which of the leading id columns is populated; trailing columns carry the
//! node's metadata. Scanning rows top to bottom while tracking the most
//! recent node per level reconstructs the tree.
//!
//! ## Quick Start
//!
//! ```no_run
//! use xltree::convert_file;
//!
//! // Levels are derived from the sheet's column count when not given.
//! let json = xltree::convert_file("criteria.xlsx", "Criteria", None)?;
//! std::fs::write("criteria.json", json)?;
//! # Ok::<(), xltree::Error>(())
//! ```
//!
//! ## Step-by-Step API
//!
//! ```no_run
//! use xltree::xlsx::Workbook;
//! use xltree::{detect_levels, to_json_default, TreeBuilder};
//!
//! let workbook = Workbook::open("criteria.xlsx")?;
//! let grid = workbook.grid("Criteria")?;
//!
//! let builder = TreeBuilder::new(2)?;
//! let forest = builder.build(&grid)?;
//! println!("{}", to_json_default(&forest)?);
//! # Ok::<(), xltree::Error>(())
//! ```

pub mod container;
pub mod error;
pub mod model;
pub mod render;
pub mod tree;
pub mod xlsx;

// Re-exports
pub use container::XlsxPackage;
pub use error::{Error, Result};
pub use model::{CellValue, Forest, Grid, MetadataValue, Node, Row, NODE_TYPE};
pub use render::{to_json, to_json_default, JsonFormat};
pub use tree::{default_fields, detect_levels, FieldKind, MetadataField, TreeBuilder, HEADER_TOKEN};
pub use xlsx::Workbook;

use std::path::Path;

/// Convert one sheet of a workbook file to pretty-printed JSON.
///
/// When `levels` is `None` the hierarchy depth is derived from the sheet's
/// column count and the default metadata field count.
///
/// # Example
///
/// ```no_run
/// use xltree::convert_file;
///
/// let json = convert_file("criteria.xlsx", "Criteria", Some(3))?;
/// # Ok::<(), xltree::Error>(())
/// ```
pub fn convert_file(
    path: impl AsRef<Path>,
    sheet_name: &str,
    levels: Option<usize>,
) -> Result<String> {
    let workbook = Workbook::open(path)?;
    convert_workbook(&workbook, sheet_name, levels)
}

/// Convert one sheet of an in-memory workbook to pretty-printed JSON.
///
/// # Example
///
/// ```no_run
/// use xltree::convert_bytes;
///
/// let data = std::fs::read("criteria.xlsx")?;
/// let json = convert_bytes(&data, "Criteria", None)?;
/// # Ok::<(), xltree::Error>(())
/// ```
pub fn convert_bytes(data: &[u8], sheet_name: &str, levels: Option<usize>) -> Result<String> {
    let workbook = Workbook::from_bytes(data.to_vec())?;
    convert_workbook(&workbook, sheet_name, levels)
}

fn convert_workbook(
    workbook: &Workbook,
    sheet_name: &str,
    levels: Option<usize>,
) -> Result<String> {
    let grid = workbook.grid(sheet_name)?;
    let levels =
        levels.unwrap_or_else(|| detect_levels(grid.column_count(), default_fields().len()));
    let builder = TreeBuilder::new(levels)?;
    let forest = builder.build(&grid)?;
    to_json_default(&forest)
}
