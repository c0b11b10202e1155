//! Reduction of a whole tree to one headline number.

use tracing::{instrument, warn};

use crate::domain::arena::AttackTree;
use crate::domain::entities::Mode;

/// Overall figure for the tree. Pure, never mutates.
///
/// Monetary: sum of all current leaf values, re-scanned directly from the leaves so the
/// result does not depend on whether propagation has run.
/// Probability: value of the unique root; zero or several roots yield `0.0`.
#[instrument(level = "debug", skip(tree))]
pub fn aggregate(tree: &AttackTree, mode: Mode) -> f64 {
    match mode {
        Mode::Monetary => tree
            .nodes()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.value)
            .sum(),
        Mode::Probability => {
            let roots = tree.roots();
            match roots.as_slice() {
                [root] => tree.node(*root).map_or(0.0, |node| node.value),
                _ => {
                    warn!(
                        "expected exactly one root, found {}; aggregate defaults to 0",
                        roots.len()
                    );
                    0.0
                }
            }
        }
    }
}
