//! Analysis result handed to reporting collaborators.

use serde::Serialize;

use crate::domain::{AttackTree, Mode};

/// Final value of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub name: String,
    pub value: f64,
    pub leaf: bool,
    /// Names of direct children, in edge order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
}

/// Everything a renderer needs: node values, edges, mode and the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub title: String,
    pub root: String,
    pub mode: Mode,
    pub total: f64,
    pub nodes: Vec<NodeReport>,
    pub edges: Vec<(String, String)>,
}

impl AnalysisReport {
    /// Snapshot the tree after propagation and aggregation.
    pub fn from_tree(tree: &AttackTree, root: &str, mode: Mode, total: f64) -> Self {
        let nodes = tree
            .nodes()
            .map(|(_, node)| NodeReport {
                name: node.name.clone(),
                value: node.value,
                leaf: node.is_leaf(),
                children: node
                    .children
                    .iter()
                    .filter_map(|&c| tree.node(c).map(|child| child.name.clone()))
                    .collect(),
            })
            .collect();

        Self {
            title: format!("{} Attack Tree", root),
            root: root.to_string(),
            mode,
            total,
            nodes,
            edges: tree.edges(),
        }
    }

    pub fn node(&self, name: &str) -> Option<&NodeReport> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.node(name).map(|n| n.value)
    }
}
