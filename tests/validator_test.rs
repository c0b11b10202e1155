//! Tests for mode-specific value validation.

use rstest::rstest;

use atree::domain::{build_tree, validate, DomainError, DomainRule, Mode, NodeRecord, Validator};

fn tree_with_leaf(value: f64) -> atree::domain::AttackTree {
    build_tree(&NodeRecord::branch(
        "Root",
        vec![NodeRecord::leaf("Leaf", value)],
    ))
}

#[rstest]
#[case(0.0)]
#[case(0.5)]
#[case(1.0)]
fn given_value_in_unit_interval_when_validating_probability_then_ok(#[case] value: f64) {
    assert!(validate(&tree_with_leaf(value), Mode::Probability).is_ok());
}

#[rstest]
#[case(-0.1)]
#[case(1.5)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn given_value_outside_unit_interval_when_validating_probability_then_violation(
    #[case] value: f64,
) {
    let err = validate(&tree_with_leaf(value), Mode::Probability).unwrap_err();

    match err {
        DomainError::DomainViolation { name, rule, .. } => {
            assert_eq!(name, "Leaf");
            assert_eq!(rule, DomainRule::UnitInterval);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[rstest]
#[case(0.0)]
#[case(1.0)]
#[case(5000.0)]
fn given_non_negative_integer_when_validating_monetary_then_ok(#[case] value: f64) {
    assert!(validate(&tree_with_leaf(value), Mode::Monetary).is_ok());
}

#[rstest]
#[case(-5.0)]
#[case(12.5)]
#[case(0.5)]
#[case(f64::INFINITY)]
fn given_negative_or_fractional_when_validating_monetary_then_violation(#[case] value: f64) {
    let err = validate(&tree_with_leaf(value), Mode::Monetary).unwrap_err();

    assert_eq!(err.node_name(), Some("Leaf"));
    assert!(!err.is_structural());
    assert!(
        err.to_string()
            .starts_with("invalid monetary value: node 'Leaf'"),
        "{}",
        err
    );
}

#[test]
fn given_internal_node_value_when_validating_then_internal_nodes_checked_too() {
    let record = NodeRecord {
        name: "Root".into(),
        value: Some(7.0),
        children: vec![NodeRecord::leaf("Leaf", 0.5)],
    };

    let err = validate(&build_tree(&record), Mode::Probability).unwrap_err();

    assert_eq!(err.node_name(), Some("Root"));
}

#[test]
fn given_several_bad_values_when_collecting_then_reports_all() {
    let record = NodeRecord::branch(
        "Root",
        vec![
            NodeRecord::leaf("A", 1.5),
            NodeRecord::leaf("B", 0.5),
            NodeRecord::leaf("C", -2.0),
        ],
    );
    let tree = build_tree(&record);

    let violations = Validator::new(&tree).violations(Mode::Probability);

    let names: Vec<_> = violations.iter().filter_map(|e| e.node_name()).collect();
    assert_eq!(names, vec!["A", "C"]);
}

#[test]
fn given_default_zero_values_when_validating_either_mode_then_ok() {
    let record = NodeRecord::branch("Root", vec![NodeRecord::branch("Empty", vec![])]);
    let tree = build_tree(&record);

    assert!(validate(&tree, Mode::Monetary).is_ok());
    assert!(validate(&tree, Mode::Probability).is_ok());
}
