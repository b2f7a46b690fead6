//! XLSX (Excel) workbook reading.
//!
//! This module reads workbooks in the Office Open XML (.xlsx) format and
//! materializes individual sheets into the flat [`Grid`](crate::model::Grid)
//! the tree builder consumes.
//!
//! # Example
//!
//! ```no_run
//! use xltree::xlsx::Workbook;
//!
//! let workbook = Workbook::open("criteria.xlsx")?;
//! for name in workbook.sheet_names() {
//!     println!("Sheet: {}", name);
//! }
//! # Ok::<(), xltree::Error>(())
//! ```

mod shared_strings;
mod workbook;

pub use shared_strings::SharedStrings;
pub use workbook::Workbook;
