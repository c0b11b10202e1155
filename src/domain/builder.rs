//! Tree builder turning nested source records into an attack tree structure.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::AttackTree;
use crate::domain::entities::NodeRecord;

/// Value assigned to records that carry none.
pub const DEFAULT_VALUE: f64 = 0.0;

/// Constructs attack trees from nested records.
///
/// No validation happens here: records without a value default to `0`.
#[derive(Debug, Default)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the node/edge structure for `record` and all of its descendants.
    ///
    /// One node per record (merged by name), one edge from each record to each of its
    /// children. Records are visited in pre-order, so for duplicate names the record
    /// visited last determines the stored value.
    #[instrument(level = "debug", skip(self, record), fields(root = %record.name))]
    pub fn build(&self, record: &NodeRecord) -> AttackTree {
        let mut tree = AttackTree::new();
        let mut stack: Vec<(&NodeRecord, Option<Index>)> = vec![(record, None)];

        while let Some((current, parent)) = stack.pop() {
            let idx = tree.upsert_node(&current.name, current.value.unwrap_or(DEFAULT_VALUE));
            if let Some(parent_idx) = parent {
                tree.add_edge(parent_idx, idx);
            }

            // Push children in reverse order for left-to-right traversal
            for child in current.children.iter().rev() {
                stack.push((child, Some(idx)));
            }
        }

        debug!(
            "built tree: {} nodes, {} edges",
            tree.node_count(),
            tree.edge_count()
        );
        tree
    }
}

/// Build an attack tree with default settings.
pub fn build_tree(record: &NodeRecord) -> AttackTree {
    TreeBuilder::new().build(record)
}
