//! Data model for table-to-tree conversion.
//!
//! This module defines the two shapes the converter moves between: the flat
//! [`Grid`] materialized from a sheet, and the nested [`Node`] hierarchy the
//! builder produces from it.

mod grid;
mod node;

pub use grid::*;
pub use node::*;
