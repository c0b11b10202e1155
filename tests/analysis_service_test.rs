//! Tests for AnalysisService

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use atree::application::services::AnalysisService;
use atree::application::ApplicationError;
use atree::domain::{DomainError, LeafValue, Mode, NodeRecord};
use atree::infrastructure::editor::{KeepEditor, PresetEditor};
use atree::infrastructure::traits::{LeafEditor, LeafUpdates, RealFileSystem};
use atree::util::testing;

const TOLERANCE: f64 = 1e-9;

fn service() -> AnalysisService {
    AnalysisService::new(Arc::new(RealFileSystem))
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/trees")
        .join(name)
}

/// Helper to create temp tree files for testing
fn create_tree_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write tree file");
    path
}

/// Records what it was offered and answers with fixed updates.
struct RecordingEditor {
    offered: std::cell::RefCell<Vec<LeafValue>>,
    updates: LeafUpdates,
}

impl LeafEditor for RecordingEditor {
    fn edit(&self, _mode: Mode, leaves: &[LeafValue]) -> io::Result<LeafUpdates> {
        self.offered.borrow_mut().extend_from_slice(leaves);
        Ok(self.updates.clone())
    }
}

struct FailingEditor;

impl LeafEditor for FailingEditor {
    fn edit(&self, _mode: Mode, _leaves: &[LeafValue]) -> io::Result<LeafUpdates> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin closed"))
    }
}

#[test]
fn given_probability_fixture_when_analyzing_then_root_probability_aggregated() {
    testing::init_test_setup();

    let report = service()
        .analyze_file(&fixture("probability.json"), Mode::Probability, &KeepEditor)
        .unwrap();

    assert_eq!(report.title, "Steal Customer Data Attack Tree");
    assert_eq!(report.mode, Mode::Probability);
    assert!((report.total - 0.976).abs() < TOLERANCE, "{}", report.total);
    assert!((report.value("Compromise Employee").unwrap() - 0.94).abs() < TOLERANCE);
    assert_eq!(report.edges.len(), 4);
}

#[test]
fn given_monetary_fixture_when_analyzing_then_leaf_sum_aggregated() {
    let report = service()
        .analyze_file(&fixture("monetary.yaml"), Mode::Monetary, &KeepEditor)
        .unwrap();

    assert_eq!(report.total, 6000.0);
    assert_eq!(report.value("Encrypt File Servers"), Some(5000.0));
    assert_eq!(report.value("Ransomware Outage"), Some(6000.0));
    let root = report.node("Ransomware Outage").unwrap();
    assert!(!root.leaf);
    assert_eq!(root.children, vec!["Encrypt File Servers", "Regulatory Fine"]);
}

#[test]
fn given_preset_updates_when_analyzing_then_applied_before_propagation() {
    let record = service().load(&fixture("monetary.yaml")).unwrap();
    let editor = PresetEditor::new([("Regulatory Fine".to_string(), 4000.0)]);

    let report = service().analyze(&record, Mode::Monetary, &editor).unwrap();

    assert_eq!(report.value("Regulatory Fine"), Some(4000.0));
    assert_eq!(report.total, 9000.0);
}

#[test]
fn given_editor_when_analyzing_then_offered_current_leaf_values_in_order() {
    let record = service().load(&fixture("probability.json")).unwrap();
    let editor = RecordingEditor {
        offered: Default::default(),
        updates: LeafUpdates::new(),
    };

    service()
        .analyze(&record, Mode::Probability, &editor)
        .unwrap();

    let offered = editor.offered.into_inner();
    let names: Vec<&str> = offered.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Phishing", "Bribery", "Exploit Web App"]);
    assert_eq!(offered[0].value, 0.7);
}

#[rstest]
#[case::unknown("Nonexistent")]
#[case::internal("Compromise Employee")]
fn given_update_for_non_leaf_when_analyzing_then_unknown_leaf(#[case] name: &str) {
    let record = service().load(&fixture("probability.json")).unwrap();
    let editor = PresetEditor::new([(name.to_string(), 0.5)]);

    let err = service()
        .analyze(&record, Mode::Probability, &editor)
        .unwrap_err();

    match err {
        ApplicationError::UnknownLeaf(n) => assert_eq!(n, name),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn given_out_of_domain_update_when_analyzing_then_revalidation_fails() {
    let record = service().load(&fixture("probability.json")).unwrap();
    let editor = PresetEditor::new([("Phishing".to_string(), 1.7)]);

    let err = service()
        .analyze(&record, Mode::Probability, &editor)
        .unwrap_err();

    assert_eq!(
        err.domain().and_then(|e| e.node_name()),
        Some("Phishing"),
        "{:?}",
        err
    );
}

#[test]
fn given_wrong_mode_when_analyzing_then_domain_violation() {
    let err = service()
        .analyze_file(&fixture("probability.json"), Mode::Monetary, &KeepEditor)
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::DomainViolation { .. })
    ));
}

#[test]
fn given_failing_editor_when_analyzing_then_operation_failed() {
    let record = service().load(&fixture("probability.json")).unwrap();

    let err = service()
        .analyze(&record, Mode::Probability, &FailingEditor)
        .unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}

#[test]
fn given_cycle_fixture_when_analyzing_then_structural_error() {
    let err = service()
        .analyze_file(&fixture("cycle.json"), Mode::Probability, &KeepEditor)
        .unwrap_err();

    let domain = err.domain().expect("domain error");
    assert!(domain.is_structural());
    assert!(err.to_string().contains("cycle detected"), "{}", err);
}

#[test]
fn given_cycle_and_bad_values_when_checking_then_all_problems_reported() {
    let temp = TempDir::new().unwrap();
    let path = create_tree_file(
        &temp,
        "broken.json",
        r#"{"name": "Root", "children": [
            {"name": "A", "value": 1.5, "children": [{"name": "A"}]},
            {"name": "B", "value": -1}
        ]}"#,
    );
    let record = service().load(&path).unwrap();

    let problems = service().check(&record, Mode::Probability);

    assert_eq!(problems.len(), 2, "{:?}", problems);
    assert_eq!(problems[0].node_name(), Some("B"));
    assert!(problems[1].is_structural());
}

#[test]
fn given_valid_tree_when_checking_then_no_problems() {
    let record = NodeRecord::branch("Root", vec![NodeRecord::leaf("A", 0.2)]);

    assert!(service().check(&record, Mode::Probability).is_empty());
}

#[test]
fn given_xml_fixture_when_loading_tree_then_structure_without_validation() {
    let (record, tree) = service().load_tree(&fixture("probability.xml")).unwrap();

    assert_eq!(record.name, "Steal Customer Data");
    assert_eq!(tree.node_count(), 5);
    assert_eq!(tree.depth(), 3);
}
