//! Tree construction from flat grids.
//!
//! [`TreeBuilder`] performs the row-to-tree reconstruction: one linear pass
//! over the grid, an ancestor path of open nodes per level, one node per
//! data row. [`fields`] defines the recognized metadata columns.

pub mod builder;
pub mod fields;

pub use builder::{detect_levels, TreeBuilder, HEADER_TOKEN};
pub use fields::{default_fields, FieldKind, MetadataField};
