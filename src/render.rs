//! JSON rendering of the node forest.

use crate::error::{Error, Result};
use crate::model::Forest;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Serialize a forest to JSON.
///
/// The output is an array of node objects. Non-ASCII text is preserved
/// verbatim, and each object's keys follow the fixed node order: `type`,
/// `id`, `name`, the present metadata fields, `subCriterion`.
pub fn to_json(forest: &Forest, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Compact => serde_json::to_string(forest),
        JsonFormat::Pretty => serde_json::to_string_pretty(forest),
    };
    result.map_err(|e| Error::Render(e.to_string()))
}

/// Serialize a forest to JSON with default formatting.
pub fn to_json_default(forest: &Forest) -> Result<String> {
    to_json(forest, JsonFormat::Pretty)
}
