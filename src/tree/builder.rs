//! Row-to-tree reconstruction.

use crate::error::{Error, Result};
use crate::model::{Forest, Grid, MetadataValue, Node, Row};
use crate::tree::fields::{default_fields, MetadataField};
use indexmap::IndexMap;
use tracing::{debug, trace};

/// Cell text marking a level's id column as a header, after trimming.
pub const HEADER_TOKEN: &str = "ID";

/// Usable hierarchy depth for a sheet, derived from its column count.
///
/// One column past the deepest id column carries that level's name; the
/// rest are metadata. Callers may override the result with any explicit
/// positive level count; nothing validates the choice against the data.
pub fn detect_levels(total_columns: usize, metadata_field_count: usize) -> usize {
    total_columns.saturating_sub(metadata_field_count + 1)
}

/// Builds a node forest from a flat grid.
///
/// Column layout: columns `0..levels` are the per-level id columns, column
/// `level + 1` holds the matched level's name, and metadata fields sit at
/// fixed columns starting at `levels + 1`. Exactly one node is produced per
/// data row, at the first populated id column.
///
/// A row at depth `L` with no live ancestor at depth `L - 1` is dropped
/// without error: the node is constructed, occupies its ancestor-path slot
/// (so later, deeper rows nest beneath it), but never reaches the output.
/// Whether such rows should instead be reported is an open question for the
/// data owners; the permissive behavior matches the established output.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    levels: usize,
    fields: Vec<MetadataField>,
}

impl TreeBuilder {
    /// Create a builder with the default metadata fields.
    ///
    /// Returns [`Error::InvalidLevels`] when `levels` is zero.
    pub fn new(levels: usize) -> Result<Self> {
        Self::with_fields(levels, default_fields())
    }

    /// Create a builder with a custom metadata field list.
    pub fn with_fields(levels: usize, fields: Vec<MetadataField>) -> Result<Self> {
        if levels == 0 {
            return Err(Error::InvalidLevels(levels));
        }
        Ok(Self { levels, fields })
    }

    /// Number of hierarchy levels this builder materializes.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// The metadata fields this builder recognizes.
    pub fn fields(&self) -> &[MetadataField] {
        &self.fields
    }

    /// Build the forest from a grid in one top-to-bottom pass.
    pub fn build(&self, grid: &Grid) -> Result<Forest> {
        let mut arena: Vec<Node> = Vec::new();
        let mut edges: Vec<Vec<usize>> = Vec::new();
        let mut roots: Vec<usize> = Vec::new();
        let mut path: Vec<Option<usize>> = vec![None; self.levels];

        for row in grid.rows() {
            // Metadata reads happen once per row, before the level scan,
            // so a malformed list cell errors even on header-only rows.
            let metadata = self.extract_metadata(row)?;

            let Some((level, id)) = self.match_level(row) else {
                continue;
            };

            let name_cell = row.cell(level + 1);
            let name = if name_cell.is_truthy() {
                name_cell.to_display_string().trim().to_string()
            } else {
                String::new()
            };

            let mut node = Node::new(id, name);
            node.metadata = metadata;
            trace!(level, id = %node.id, "row matched");

            let index = arena.len();
            arena.push(node);
            edges.push(Vec::new());

            path[level] = Some(index);
            for slot in path.iter_mut().skip(level + 1) {
                *slot = None;
            }

            if level == 0 {
                roots.push(index);
            } else if let Some(parent) = path[level - 1] {
                edges[parent].push(index);
            } else {
                trace!(level, id = %arena[index].id, "no open ancestor, row dropped");
            }
        }

        let forest = materialize(arena, edges, roots);
        debug!(
            rows = grid.row_count(),
            levels = self.levels,
            top_level = forest.len(),
            "tree built"
        );
        Ok(forest)
    }

    /// Find the level this row defines a node at, with its trimmed id.
    ///
    /// Id columns are scanned in ascending level order; the first populated,
    /// non-header cell wins. Header cells send the scan to the next level.
    fn match_level(&self, row: &Row) -> Option<(usize, String)> {
        for level in 0..self.levels {
            let id_cell = row.cell(level);
            if !id_cell.is_truthy() {
                continue;
            }
            let id = id_cell.to_display_string().trim().to_string();
            if id == HEADER_TOKEN {
                continue;
            }
            return Some((level, id));
        }
        None
    }

    /// Extract the row's present metadata fields, in field order.
    fn extract_metadata(&self, row: &Row) -> Result<IndexMap<String, MetadataValue>> {
        let mut metadata = IndexMap::new();
        for (i, field) in self.fields.iter().enumerate() {
            let cell = row.cell(self.levels + 1 + i);
            if let Some(value) = field.extract(cell)? {
                metadata.insert(field.name().to_string(), value);
            }
        }
        Ok(metadata)
    }
}

/// Move arena nodes into their final nested shape.
///
/// Children always carry larger arena indices than their parents, so a
/// single reverse pass can hand each node its fully assembled children
/// before the node itself is claimed. Nodes never claimed by a parent or
/// the root list stay behind and are discarded.
fn materialize(arena: Vec<Node>, edges: Vec<Vec<usize>>, roots: Vec<usize>) -> Forest {
    let mut slots: Vec<Option<Node>> = arena.into_iter().map(Some).collect();
    for index in (0..slots.len()).rev() {
        let children: Vec<Node> = edges[index]
            .iter()
            .filter_map(|&child| slots[child].take())
            .collect();
        if let Some(node) = slots[index].as_mut() {
            node.children = children;
        }
    }
    roots
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    /// Rows in tests carry text cells; empty strings become empty cells.
    fn text_row(cells: &[&str]) -> Row {
        Row::from_cells(
            cells
                .iter()
                .map(|s| {
                    if s.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::text(*s)
                    }
                })
                .collect(),
        )
    }

    fn grid_of(rows: &[&[&str]]) -> Grid {
        Grid::from_rows(rows.iter().map(|r| text_row(r)).collect())
    }

    #[test]
    fn test_rejects_zero_levels() {
        assert!(matches!(
            TreeBuilder::new(0),
            Err(Error::InvalidLevels(0))
        ));
    }

    #[test]
    fn test_two_row_nesting() {
        let grid = grid_of(&[
            &["1", "Root"],
            &["", "1.1", "Child"],
        ]);
        let forest = TreeBuilder::new(2).unwrap().build(&grid).unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, "1");
        assert_eq!(forest[0].name, "Root");
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].id, "1.1");
        assert_eq!(forest[0].children[0].name, "Child");
        assert!(forest[0].children[0].children.is_empty());
    }

    #[test]
    fn test_header_row_ignored() {
        let grid = grid_of(&[
            &["1", "Root"],
            &["ID", "ID", "Name"],
            &["", "1.1", "Child"],
        ]);
        let forest = TreeBuilder::new(2).unwrap().build(&grid).unwrap();

        // The header row produces no node and leaves the open ancestor
        // in place, so the child still nests under the first row.
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].id, "1.1");
    }

    #[test]
    fn test_header_token_is_trimmed_and_case_sensitive() {
        let grid = grid_of(&[&[" ID ", "Name"], &["id", "lower"]]);
        let forest = TreeBuilder::new(1).unwrap().build(&grid).unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, "id");
    }

    #[test]
    fn test_orphan_row_dropped_silently() {
        let grid = grid_of(&[
            &["", "1.1", "Orphan"],
            &["1", "Root"],
        ]);
        let forest = TreeBuilder::new(2).unwrap().build(&grid).unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, "1");
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_orphan_subtree_vanishes_together() {
        let grid = grid_of(&[
            &["", "2.1", "Orphan"],
            &["", "", "2.1.1", "Under orphan"],
            &["1", "Root"],
        ]);
        let forest = TreeBuilder::new(3).unwrap().build(&grid).unwrap();

        // The deeper row nests under the orphan and disappears with it.
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, "1");
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_first_populated_level_wins() {
        // Both id columns populated: the row defines a level-0 node and
        // column 1 is read as its name.
        let grid = grid_of(&[&["1", "1.1", "Name1"]]);
        let forest = TreeBuilder::new(2).unwrap().build(&grid).unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, "1");
        assert_eq!(forest[0].name, "1.1");
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_child_order_follows_row_order() {
        let grid = grid_of(&[
            &["1", "Root"],
            &["", "1.3", "c"],
            &["", "1.1", "a"],
            &["", "1.2", "b"],
        ]);
        let forest = TreeBuilder::new(2).unwrap().build(&grid).unwrap();

        let ids: Vec<&str> = forest[0].children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1.3", "1.1", "1.2"]);
    }

    #[test]
    fn test_new_subtree_closes_deeper_slots() {
        let grid = grid_of(&[
            &["1", "First"],
            &["", "1.1", "First child"],
            &["2", "Second"],
            &["", "", "2.x.1", "Stale depth"],
            &["", "2.1", "Second child"],
        ]);
        let forest = TreeBuilder::new(3).unwrap().build(&grid).unwrap();

        // Row 4 has no open level-1 ancestor after "2" reset the path, so
        // it is dropped; row 5 nests under "2".
        assert_eq!(forest.len(), 2);
        assert!(forest[0].children[0].children.is_empty());
        assert_eq!(forest[1].children.len(), 1);
        assert_eq!(forest[1].children[0].id, "2.1");
    }

    #[test]
    fn test_empty_grid() {
        let forest = TreeBuilder::new(2).unwrap().build(&Grid::new()).unwrap();
        assert!(forest.is_empty());
    }

    #[test]
    fn test_metadata_only_row_produces_nothing() {
        let mut row = Row::new();
        for _ in 0..3 {
            row.push(CellValue::Empty);
        }
        row.push(CellValue::text("a description"));
        let grid = Grid::from_rows(vec![row]);

        let forest = TreeBuilder::new(2).unwrap().build(&grid).unwrap();
        assert!(forest.is_empty());
    }

    #[test]
    fn test_malformed_list_cell_errors_without_id() {
        // Metadata extraction runs before the level scan, so a bad list
        // cell fails the build even when the row defines no node.
        let mut row = Row::new();
        for _ in 0..3 {
            row.push(CellValue::Empty);
        }
        row.push(CellValue::Empty); // description
        row.push(CellValue::Int(7)); // tag
        let grid = Grid::from_rows(vec![row]);

        let err = TreeBuilder::new(2).unwrap().build(&grid).unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata { .. }));
    }

    #[test]
    fn test_metadata_attached_sparsely() {
        // levels = 1, so metadata columns start at index 2.
        let mut row = Row::new();
        row.push(CellValue::text("1"));
        row.push(CellValue::text("Root"));
        row.push(CellValue::text("Base rules")); // description
        row.push(CellValue::text("safety,\ncore")); // tag
        row.push(CellValue::Empty); // conformityTopic
        row.push(CellValue::text("")); // status, empty text is falsy
        row.push(CellValue::Int(85)); // thresholdValue
        let grid = Grid::from_rows(vec![row]);

        let forest = TreeBuilder::new(1).unwrap().build(&grid).unwrap();
        let node = &forest[0];
        let keys: Vec<&str> = node.metadata.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["description", "tag", "thresholdValue"]);
        assert_eq!(
            node.metadata["tag"],
            MetadataValue::List(vec!["safety".to_string(), "core".to_string()])
        );
        assert_eq!(
            node.metadata["thresholdValue"],
            MetadataValue::Scalar(CellValue::Int(85))
        );
    }

    #[test]
    fn test_zero_valued_id_cell_is_skipped() {
        let mut row = Row::new();
        row.push(CellValue::Int(0));
        row.push(CellValue::text("ignored"));
        let grid = Grid::from_rows(vec![row]);

        let forest = TreeBuilder::new(1).unwrap().build(&grid).unwrap();
        assert!(forest.is_empty());
    }

    #[test]
    fn test_numeric_id_and_absent_name() {
        let mut row = Row::new();
        row.push(CellValue::Int(42));
        let grid = Grid::from_rows(vec![row]);

        let forest = TreeBuilder::new(1).unwrap().build(&grid).unwrap();
        assert_eq!(forest[0].id, "42");
        assert_eq!(forest[0].name, "");
    }

    #[test]
    fn test_levels_beyond_populated_columns_is_harmless() {
        let grid = grid_of(&[&["1", "Root"]]);
        let forest = TreeBuilder::new(6).unwrap().build(&grid).unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, "1");
    }

    #[test]
    fn test_idempotent_rebuild() {
        let grid = grid_of(&[
            &["1", "Root"],
            &["", "1.1", "Child"],
            &["2", "Other"],
        ]);
        let builder = TreeBuilder::new(2).unwrap();
        let first = builder.build(&grid).unwrap();
        let second = builder.build(&grid).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_detect_levels() {
        assert_eq!(detect_levels(10, 7), 2);
        assert_eq!(detect_levels(12, 7), 4);
        assert_eq!(detect_levels(8, 7), 0);
        assert_eq!(detect_levels(3, 7), 0);
        assert_eq!(detect_levels(0, 0), 0);
    }
}
