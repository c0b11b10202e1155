//! Attack tree analysis service
//!
//! Runs one full analysis: build, validate, edit leaves, validate again,
//! propagate and aggregate.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::error_ext::IoResultExt;
use crate::application::ingest::load_attack_tree;
use crate::application::report::AnalysisReport;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    aggregate, build_tree, propagate, validate, AttackTree, DomainError, Mode, NodeRecord,
    Validator,
};
use crate::infrastructure::traits::{FileSystem, LeafEditor, LeafUpdates};

/// Service for analysing attack trees.
pub struct AnalysisService {
    fs: Arc<dyn FileSystem>,
}

impl AnalysisService {
    /// Create a new analysis service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load the nested record stored in a JSON, YAML or XML file.
    pub fn load(&self, path: &Path) -> ApplicationResult<NodeRecord> {
        load_attack_tree(self.fs.as_ref(), path)
    }

    /// Load a file and build its node/edge structure without validating it.
    pub fn load_tree(&self, path: &Path) -> ApplicationResult<(NodeRecord, AttackTree)> {
        let record = self.load(path)?;
        let tree = build_tree(&record);
        Ok((record, tree))
    }

    /// Analyse the tree stored in `path`.
    pub fn analyze_file(
        &self,
        path: &Path,
        mode: Mode,
        editor: &dyn LeafEditor,
    ) -> ApplicationResult<AnalysisReport> {
        let record = self.load(path)?;
        self.analyze(&record, mode, editor)
    }

    /// Run the full pipeline on an already loaded record.
    #[instrument(level = "debug", skip(self, record, editor), fields(root = %record.name))]
    pub fn analyze(
        &self,
        record: &NodeRecord,
        mode: Mode,
        editor: &dyn LeafEditor,
    ) -> ApplicationResult<AnalysisReport> {
        let mut tree = build_tree(record);
        validate(&tree, mode)?;

        let updates = editor
            .edit(mode, &tree.leaves())
            .with_context("collect leaf values")?;
        debug!("analyze: {} leaf update(s)", updates.len());
        apply_updates(&mut tree, &updates)?;
        validate(&tree, mode)?;

        propagate(&mut tree, mode)?;
        let total = aggregate(&tree, mode);
        info!("analysis of '{}' in {} mode: {}", record.name, mode, total);

        Ok(AnalysisReport::from_tree(&tree, &record.name, mode, total))
    }

    /// Every problem that would stop an analysis: all domain violations, plus a
    /// structural error if the tree has no topological order.
    pub fn check(&self, record: &NodeRecord, mode: Mode) -> Vec<DomainError> {
        let tree = build_tree(record);
        let mut problems = Validator::new(&tree).violations(mode);
        if let Err(e) = tree.topological_order() {
            problems.push(e);
        }
        problems
    }
}

/// Write edited values onto leaves. Names that are unknown or internal are rejected
/// before anything is written.
fn apply_updates(tree: &mut AttackTree, updates: &LeafUpdates) -> ApplicationResult<()> {
    if let Some(name) = updates
        .keys()
        .find(|name| !tree.get(name).is_some_and(|node| node.is_leaf()))
    {
        return Err(ApplicationError::UnknownLeaf(name.clone()));
    }
    for (name, value) in updates {
        tree.set_value(name, *value);
    }
    Ok(())
}
