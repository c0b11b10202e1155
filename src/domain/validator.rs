//! Per-mode validation of node values.

use tracing::{debug, instrument};

use crate::domain::arena::{AttackTree, TreeNode};
use crate::domain::entities::Mode;
use crate::domain::error::{DomainError, DomainResult};

/// Read-only checker of node values against the numeric domain of a mode.
///
/// Holds a reference to the tree and scans all nodes; it never mutates anything,
/// so it can be run again after leaf values have been edited.
pub struct Validator<'a> {
    tree: &'a AttackTree,
}

impl<'a> Validator<'a> {
    pub fn new(tree: &'a AttackTree) -> Self {
        Self { tree }
    }

    /// Fails on the first node whose value violates the mode's domain.
    #[instrument(level = "debug", skip(self))]
    pub fn validate(&self, mode: Mode) -> DomainResult<()> {
        match self.tree.nodes().find_map(|(_, node)| check(node, mode)) {
            Some(err) => Err(err),
            None => {
                debug!("all {} node values valid", self.tree.node_count());
                Ok(())
            }
        }
    }

    /// Every violation in the tree, in node order.
    pub fn violations(&self, mode: Mode) -> Vec<DomainError> {
        self.tree
            .nodes()
            .filter_map(|(_, node)| check(node, mode))
            .collect()
    }
}

fn check(node: &TreeNode, mode: Mode) -> Option<DomainError> {
    let rule = mode.rule();
    if rule.accepts(node.value) {
        None
    } else {
        Some(DomainError::DomainViolation {
            name: node.name.clone(),
            value: node.value,
            rule,
        })
    }
}

/// Validate all node values of `tree` for `mode`.
pub fn validate(tree: &AttackTree, mode: Mode) -> DomainResult<()> {
    Validator::new(tree).validate(mode)
}
