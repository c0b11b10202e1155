//! Tests for loading attack tree files.

use std::path::{Path, PathBuf};

use rstest::rstest;
use tempfile::TempDir;

use atree::application::{load_attack_tree, parse_tree, ApplicationError, TreeFormat};
use atree::domain::NodeRecord;
use atree::infrastructure::traits::RealFileSystem;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/trees")
        .join(name)
}

fn leaf_names(record: &NodeRecord) -> Vec<String> {
    if record.children.is_empty() {
        return vec![record.name.clone()];
    }
    record.children.iter().flat_map(leaf_names).collect()
}

#[rstest]
#[case::json("probability.json")]
#[case::xml("probability.xml")]
fn given_probability_fixture_when_loading_then_same_record(#[case] file: &str) {
    let record = load_attack_tree(&RealFileSystem, &fixture(file)).unwrap();

    assert_eq!(record.name, "Steal Customer Data");
    assert_eq!(record.value, None);
    assert_eq!(
        leaf_names(&record),
        vec!["Phishing", "Bribery", "Exploit Web App"]
    );
    assert_eq!(record.children[0].children[1].value, Some(0.8));
}

#[test]
fn given_json_and_xml_fixtures_when_loading_then_records_equal() {
    let json = load_attack_tree(&RealFileSystem, &fixture("probability.json")).unwrap();
    let xml = load_attack_tree(&RealFileSystem, &fixture("probability.xml")).unwrap();

    assert_eq!(json, xml);
}

#[test]
fn given_yaml_fixture_when_loading_then_values_are_numbers() {
    let record = load_attack_tree(&RealFileSystem, &fixture("monetary.yaml")).unwrap();

    assert_eq!(record.name, "Ransomware Outage");
    assert_eq!(record.children[0].children[0].value, Some(2000.0));
    assert_eq!(record.children[1].value, Some(1000.0));
}

#[rstest]
#[case("tree.json", TreeFormat::Json)]
#[case("tree.JSON", TreeFormat::Json)]
#[case("tree.yaml", TreeFormat::Yaml)]
#[case("tree.yml", TreeFormat::Yaml)]
#[case("dir/tree.Xml", TreeFormat::Xml)]
fn given_known_extension_when_detecting_format_then_matches(
    #[case] path: &str,
    #[case] expected: TreeFormat,
) {
    assert_eq!(TreeFormat::from_path(Path::new(path)).unwrap(), expected);
}

#[rstest]
#[case("tree.txt")]
#[case("tree")]
#[case("tree.json.bak")]
fn given_unknown_extension_when_loading_then_unsupported_format(#[case] name: &str) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(name);
    std::fs::write(&path, "{}").unwrap();

    let err = load_attack_tree(&RealFileSystem, &path).unwrap_err();

    assert!(matches!(err, ApplicationError::UnsupportedFormat(_)), "{:?}", err);
}

#[test]
fn given_missing_file_when_loading_then_operation_failed_with_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.json");

    let err = load_attack_tree(&RealFileSystem, &path).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("missing.json"), "{}", err);
}

#[rstest]
#[case::json_missing_name(r#"{"value": 1}"#, TreeFormat::Json)]
#[case::json_string_value(r#"{"name": "A", "value": "high"}"#, TreeFormat::Json)]
#[case::yaml_not_a_map("- a\n- b\n", TreeFormat::Yaml)]
#[case::xml_two_roots(r#"<n name="A"/><n name="B"/>"#, TreeFormat::Xml)]
#[case::xml_unclosed(r#"<n name="A">"#, TreeFormat::Xml)]
#[case::xml_bad_value(r#"<n name="A" value="x"/>"#, TreeFormat::Xml)]
#[case::xml_empty("", TreeFormat::Xml)]
fn given_malformed_content_when_parsing_then_parse_error(
    #[case] content: &str,
    #[case] format: TreeFormat,
) {
    let err = parse_tree(content, format).unwrap_err();

    match err {
        ApplicationError::Parse { format: f, .. } => assert_eq!(f, format),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn given_json_without_children_when_parsing_then_leaf() {
    let record = parse_tree(r#"{"name": "Solo", "value": 0.2}"#, TreeFormat::Json).unwrap();

    assert_eq!(record, NodeRecord::leaf("Solo", 0.2));
}
