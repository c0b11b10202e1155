//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Note: These tests run without a global config (temp directories only),
//! so they test local config merging onto defaults.

use std::fs;

use tempfile::TempDir;

use atree::config::{local_config_path, Settings};
use atree::domain::Mode;

#[test]
fn given_no_local_config_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.currency_symbol, "£");
    assert_eq!(settings.probability_decimals, 2);
}

#[test]
fn given_local_config_when_load_then_overrides_only_given_fields() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
default_mode = "monetary"
currency_symbol = "€"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.default_mode, Some(Mode::Monetary));
    assert_eq!(settings.currency_symbol, "€");
    assert_eq!(settings.probability_decimals, 2, "unset field keeps default");
}

#[test]
fn given_invalid_mode_in_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "default_mode = \"euros\"\n").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().starts_with("config error:"), "{}", err);
    assert!(err.to_string().contains(".atree.toml"), "{}", err);
}

#[test]
fn given_malformed_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "interactive = [\n").unwrap();

    assert!(Settings::load(Some(dir.path())).is_err());
}

#[test]
fn given_template_written_as_local_config_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), Settings::template()).unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.default_mode, None);
    assert!(settings.interactive);
}
