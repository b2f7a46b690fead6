//! Output hierarchy model.

use super::CellValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Category marker attached to every node as a single-element `type` array.
pub const NODE_TYPE: &str = "Criterion";

/// A metadata value attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Raw scalar carried over from the source cell.
    Scalar(CellValue),
    /// Ordered list of trimmed entries.
    List(Vec<String>),
}

/// A single node in the output hierarchy.
///
/// Serializes with a fixed key order: `type`, `id`, `name`, the present
/// metadata fields in recognized order, then `subCriterion`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Category marker, always a single-element array.
    #[serde(rename = "type")]
    pub node_type: Vec<String>,

    /// Trimmed identifier from the matched level's id column.
    pub id: String,

    /// Trimmed label from the column right of the id. Empty when absent.
    pub name: String,

    /// Present metadata fields. Absent fields are omitted entirely.
    #[serde(flatten)]
    pub metadata: IndexMap<String, MetadataValue>,

    /// Child nodes in attachment order.
    #[serde(rename = "subCriterion")]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new node with no metadata and no children.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            node_type: vec![NODE_TYPE.to_string()],
            id: id.into(),
            name: name.into(),
            metadata: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Append a child node.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Total number of nodes in this subtree, including this node.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_size).sum::<usize>()
    }
}

/// The ordered top-level node sequence.
pub type Forest = Vec<Node>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new("CRIT-1", "Safety");
        assert_eq!(node.node_type, vec!["Criterion".to_string()]);
        assert_eq!(node.id, "CRIT-1");
        assert_eq!(node.name, "Safety");
        assert!(node.metadata.is_empty());
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_subtree_size() {
        let mut root = Node::new("1", "root");
        let mut child = Node::new("1.1", "child");
        child.add_child(Node::new("1.1.1", "leaf"));
        root.add_child(child);
        root.add_child(Node::new("1.2", "leaf"));
        assert_eq!(root.subtree_size(), 4);
    }

    #[test]
    fn test_json_key_order() {
        let mut node = Node::new("CRIT-1", "Safety");
        node.metadata.insert(
            "description".to_string(),
            MetadataValue::Scalar(CellValue::text("Base rules")),
        );
        node.metadata.insert(
            "tag".to_string(),
            MetadataValue::List(vec!["a".to_string(), "b".to_string()]),
        );

        let json = serde_json::to_string(&node).unwrap();
        let positions: Vec<usize> = ["\"type\"", "\"id\"", "\"name\"", "\"description\"", "\"tag\"", "\"subCriterion\""]
            .iter()
            .map(|key| json.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "key order wrong: {}", json);
    }

    #[test]
    fn test_json_shape() {
        let mut node = Node::new("CRIT-1", "Safety");
        node.metadata.insert(
            "thresholdValue".to_string(),
            MetadataValue::Scalar(CellValue::Int(85)),
        );

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], serde_json::json!(["Criterion"]));
        assert_eq!(value["thresholdValue"], serde_json::json!(85));
        assert_eq!(value["subCriterion"], serde_json::json!([]));
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_non_ascii_preserved() {
        let node = Node::new("기준-1", "안전성");
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("기준-1"));
        assert!(json.contains("안전성"));
        assert!(!json.contains("\\u"));
    }
}
