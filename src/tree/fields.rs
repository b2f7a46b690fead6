//! Recognized metadata fields and their extraction rules.

use crate::error::{Error, Result};
use crate::model::{CellValue, MetadataValue};

/// How a metadata field interprets its source cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// The cell value is carried over as-is.
    Scalar,
    /// The cell text is split into an ordered list of trimmed entries.
    List,
}

/// A named metadata field read from a fixed trailing column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataField {
    name: String,
    kind: FieldKind,
}

impl MetadataField {
    /// Create a scalar field.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Scalar,
        }
    }

    /// Create a list field.
    pub fn list(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::List,
        }
    }

    /// Field name as it appears in the output object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Extract this field's value from a source cell.
    ///
    /// Cells that are absent, empty, zero or `false` yield `Ok(None)` and the
    /// field is left out of the node. Scalar fields keep the raw cell value,
    /// untrimmed and uncoerced. List fields require text and split it on each
    /// comma that is followed by a line break; a list field holding a
    /// non-text value is a data error.
    pub fn extract(&self, value: &CellValue) -> Result<Option<MetadataValue>> {
        if !value.is_truthy() {
            return Ok(None);
        }
        match self.kind {
            FieldKind::Scalar => Ok(Some(MetadataValue::Scalar(value.clone()))),
            FieldKind::List => match value.as_text() {
                Some(text) => Ok(Some(MetadataValue::List(split_list(text)))),
                None => Err(Error::MalformedMetadata {
                    field: self.name.clone(),
                    reason: format!("expected splittable text, got {:?}", value),
                }),
            },
        }
    }
}

/// The recognized metadata fields, in output order.
pub fn default_fields() -> Vec<MetadataField> {
    vec![
        MetadataField::scalar("description"),
        MetadataField::list("tag"),
        MetadataField::scalar("conformityTopic"),
        MetadataField::scalar("status"),
        MetadataField::scalar("thresholdValue"),
        MetadataField::scalar("performanceLevel"),
        MetadataField::scalar("category"),
    ]
}

/// Split list-field text into trimmed entries.
///
/// The separator is a comma followed by a line break; horizontal whitespace
/// may sit between the two. A comma with no following line break does not
/// split. Entries are trimmed; empty entries are kept.
fn split_list(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut entries = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b',' {
            let mut j = i + 1;
            while j < bytes.len() && matches!(bytes[j], b' ' | b'\t' | b'\r') {
                j += 1;
            }
            if j < bytes.len() && bytes[j] == b'\n' {
                entries.push(text[start..i].trim().to_string());
                start = j + 1;
                i = j + 1;
                continue;
            }
        }
        i += 1;
    }
    entries.push(text[start..].trim().to_string());
    entries
}
