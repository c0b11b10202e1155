//! Bottom-up propagation of values from leaves to internal nodes.

use tracing::{instrument, trace};

use crate::domain::arena::AttackTree;
use crate::domain::entities::Mode;
use crate::domain::error::DomainResult;

/// Decimal digits kept for derived probabilities.
pub const PROBABILITY_DIGITS: i32 = 6;

/// Recompute every internal node from its direct children.
///
/// Nodes are processed in reverse topological order, so all children of a node hold
/// their final values when it is reached. Leaves are never written. A cycle fails
/// before any value is touched.
#[instrument(level = "debug", skip(tree))]
pub fn propagate(tree: &mut AttackTree, mode: Mode) -> DomainResult<()> {
    let order = tree.topological_order()?;

    for idx in order.into_iter().rev() {
        let Some(node) = tree.node(idx) else {
            continue;
        };
        if node.is_leaf() {
            continue;
        }
        let children = node
            .children
            .iter()
            .filter_map(|&child| tree.node(child).map(|c| c.value));
        let derived = combine(mode, children);
        trace!("derived {:?} -> {}", idx, derived);
        tree.set_value_at(idx, derived);
    }
    Ok(())
}

/// Combine child values into the parent's value.
///
/// Monetary: plain sum. Probability: `1 - prod(1 - p)`, the chance that at least one
/// independent child path succeeds, rounded to [`PROBABILITY_DIGITS`].
pub fn combine(mode: Mode, children: impl IntoIterator<Item = f64>) -> f64 {
    match mode {
        Mode::Monetary => children.into_iter().sum(),
        Mode::Probability => {
            let miss: f64 = children.into_iter().map(|p| 1.0 - p).product();
            round_to(1.0 - miss, PROBABILITY_DIGITS)
        }
    }
}

fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}
