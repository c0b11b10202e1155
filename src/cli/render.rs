//! Text rendering of analysis reports and raw hierarchies.

use std::collections::HashSet;

use colored::Colorize;
use termtree::Tree;

use crate::application::AnalysisReport;
use crate::config::Settings;
use crate::domain::{Mode, NodeRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Bucket a value by its position in `min..=max`.
pub fn severity(value: f64, min: f64, max: f64) -> Severity {
    let span = max - min;
    let ratio = if span > 0.0 { (value - min) / span } else { 0.0 };
    if ratio < 1.0 / 3.0 {
        Severity::Low
    } else if ratio < 2.0 / 3.0 {
        Severity::Medium
    } else {
        Severity::High
    }
}

/// `£5000` or `P=0.94`.
pub fn format_value(value: f64, mode: Mode, settings: &Settings) -> String {
    match mode {
        Mode::Monetary => format!("{}{:.0}", settings.currency_symbol, value),
        Mode::Probability => format!("P={:.*}", settings.probability_decimals, value),
    }
}

pub fn summary(report: &AnalysisReport, settings: &Settings) -> String {
    match report.mode {
        Mode::Monetary => format!(
            "Total Aggregated Leaf Impact: {}{:.2}",
            settings.currency_symbol, report.total
        ),
        Mode::Probability => format!(
            "Overall Probability of Attack Success: {:.2}%",
            report.total * 100.0
        ),
    }
}

/// Hierarchy of the report below its root, labelled with final values.
///
/// Shared nodes appear under every parent; an edge back to an ancestor is not followed.
pub fn report_tree(report: &AnalysisReport, settings: &Settings) -> Tree<String> {
    let (min, max) = report
        .nodes
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), n| {
            (lo.min(n.value), hi.max(n.value))
        });
    let mut path = HashSet::new();
    subtree(report, &report.root, settings, (min, max), &mut path)
}

fn subtree<'a>(
    report: &'a AnalysisReport,
    name: &'a str,
    settings: &Settings,
    range: (f64, f64),
    path: &mut HashSet<&'a str>,
) -> Tree<String> {
    let Some(node) = report.node(name) else {
        return Tree::new(name.to_string());
    };

    let value = format_value(node.value, report.mode, settings);
    let value = if settings.color {
        match severity(node.value, range.0, range.1) {
            Severity::Low => value.green().to_string(),
            Severity::Medium => value.yellow().to_string(),
            Severity::High => value.red().to_string(),
        }
    } else {
        value
    };
    let label = format!("{} ({})", node.name, value);

    path.insert(name);
    let mut children = Vec::with_capacity(node.children.len());
    for child in &node.children {
        if !path.contains(child.as_str()) {
            children.push(subtree(report, child, settings, range, path));
        }
    }
    path.remove(name);

    Tree::new(label).with_leaves(children)
}

/// Hierarchy exactly as loaded, before any merging or propagation.
pub fn record_tree(record: &NodeRecord) -> Tree<String> {
    let label = match record.value {
        Some(value) => format!("{} ({})", record.name, value),
        None => record.name.clone(),
    };
    Tree::new(label).with_leaves(record.children.iter().map(record_tree))
}
