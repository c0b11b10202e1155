use std::collections::{HashMap, VecDeque};
use std::fmt;

use generational_arena::{Arena, Index};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

/// Tree node in the arena-based attack tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Unique node name; the public identity of the node
    pub name: String,
    /// Leaf input, or derived value once propagation has run
    pub value: f64,
    /// Indices of parent nodes (incoming edges)
    pub parents: Vec<Index>,
    /// Indices of child nodes (outgoing edges)
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A leaf name with its current value, as offered to value editors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafValue {
    pub name: String,
    pub value: f64,
}

/// Arena-based node/edge structure of one attack tree.
///
/// Nodes are keyed by name: inserting an existing name updates that node instead of
/// creating a second one, so duplicate names merge their edges. Nothing is ever removed,
/// so arena iteration follows insertion order.
#[derive(Debug, Default)]
pub struct AttackTree {
    /// Arena storage for all nodes
    arena: Arena<TreeNode>,
    /// Name identity -> arena slot
    index: HashMap<String, Index>,
    edge_count: usize,
}

impl AttackTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or overwrite the value of the node already carrying `name`.
    #[instrument(level = "trace", skip(self))]
    pub fn upsert_node(&mut self, name: &str, value: f64) -> Index {
        if let Some(&idx) = self.index.get(name) {
            if let Some(node) = self.arena.get_mut(idx) {
                debug!("merging duplicate node '{}'", name);
                node.value = value;
            }
            return idx;
        }

        let idx = self.arena.insert(TreeNode {
            name: name.to_string(),
            value,
            parents: Vec::new(),
            children: Vec::new(),
        });
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Add a directed parent -> child edge. Returns false if the edge already existed.
    #[instrument(level = "trace", skip(self))]
    pub fn add_edge(&mut self, parent: Index, child: Index) -> bool {
        let exists = match self.arena.get(parent) {
            Some(node) => node.children.contains(&child),
            None => return false,
        };
        if exists || !self.arena.contains(child) {
            return false;
        }

        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.parents.push(parent);
        }
        self.edge_count += 1;
        true
    }

    pub fn node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn find(&self, name: &str) -> Option<Index> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.find(name).and_then(|idx| self.arena.get(idx))
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).map(|node| node.value)
    }

    /// Overwrite the value of a named node. Returns false for unknown names.
    pub fn set_value(&mut self, name: &str, value: f64) -> bool {
        match self.find(name).and_then(|idx| self.arena.get_mut(idx)) {
            Some(node) => {
                node.value = value;
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_value_at(&mut self, idx: Index, value: f64) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.value = value;
        }
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (Index, &TreeNode)> {
        self.arena.iter()
    }

    /// All edges as (parent name, child name) pairs.
    pub fn edges(&self) -> Vec<(String, String)> {
        self.nodes()
            .flat_map(|(_, parent)| {
                parent.children.iter().filter_map(move |&child| {
                    self.arena
                        .get(child)
                        .map(|c| (parent.name.clone(), c.name.clone()))
                })
            })
            .collect()
    }

    /// Collects all leaf nodes (nodes without outgoing edges) with their current values.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<LeafValue> {
        self.nodes()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| LeafValue {
                name: node.name.clone(),
                value: node.value,
            })
            .collect()
    }

    /// All nodes without incoming edges.
    pub fn roots(&self) -> Vec<Index> {
        self.nodes()
            .filter(|(_, node)| node.is_root())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// The root node, if exactly one node has no incoming edge.
    pub fn root(&self) -> Option<Index> {
        match self.roots().as_slice() {
            [root] => Some(*root),
            _ => None,
        }
    }

    /// Longest root-to-leaf path, counted in nodes. Zero for an empty or rootless tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.topological_order()
            .map(|order| {
                let mut depth: HashMap<Index, usize> = HashMap::with_capacity(order.len());
                for idx in order.iter().rev() {
                    let below = self.arena[*idx]
                        .children
                        .iter()
                        .filter_map(|c| depth.get(c))
                        .max()
                        .copied()
                        .unwrap_or(0);
                    depth.insert(*idx, below + 1);
                }
                depth.values().max().copied().unwrap_or(0)
            })
            .unwrap_or(0)
    }

    /// Returns a topological order (parents before children) using Kahn's algorithm.
    ///
    /// Fails with a structural error when the edges contain a cycle (self-loops included).
    #[instrument(level = "debug", skip(self))]
    pub fn topological_order(&self) -> DomainResult<Vec<Index>> {
        let count = self.arena.len();
        let mut in_degree: HashMap<Index, usize> = HashMap::with_capacity(count);
        let mut queue = VecDeque::with_capacity(count);
        let mut order = Vec::with_capacity(count);

        for (idx, node) in self.arena.iter() {
            in_degree.insert(idx, node.parents.len());
            if node.parents.is_empty() {
                queue.push_back(idx);
            }
        }

        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            for child in &self.arena[idx].children {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(*child);
                    }
                }
            }
        }

        if order.len() != count {
            // Every node left with a positive in-degree sits on or below a cycle.
            let stuck = self
                .arena
                .iter()
                .find(|(idx, _)| in_degree.get(idx).is_some_and(|d| *d > 0))
                .map(|(_, node)| node.name.clone())
                .unwrap_or_default();
            return Err(DomainError::Structural {
                reason: format!("cycle detected involving node '{}'", stuck),
            });
        }

        Ok(order)
    }
}
