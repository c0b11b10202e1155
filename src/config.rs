//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/atree/atree.toml`
//! 3. Local config: `<project_dir>/.atree.toml`
//! 4. Environment variables: `ATREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::Mode;

/// Unified configuration for atree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Mode used when `--mode` is not given (None: ask interactively)
    pub default_mode: Option<Mode>,
    /// Currency symbol for monetary values
    pub currency_symbol: String,
    /// Decimals shown for node probabilities
    pub probability_decimals: usize,
    /// Prompt for leaf values during analysis
    pub interactive: bool,
    /// Colour node values by severity
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_mode: None,
            currency_symbol: "£".into(),
            probability_decimals: 2,
            interactive: true,
            color: true,
        }
    }
}

/// Raw settings for intermediate parsing (every field optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_mode: Option<Mode>,
    pub currency_symbol: Option<String>,
    pub probability_decimals: Option<usize>,
    pub interactive: Option<bool>,
    pub color: Option<bool>,
}

/// Get the XDG config directory for atree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "atree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("atree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".atree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where it is set.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_mode: overlay.default_mode.or(self.default_mode),
            currency_symbol: overlay
                .currency_symbol
                .clone()
                .unwrap_or_else(|| self.currency_symbol.clone()),
            probability_decimals: overlay
                .probability_decimals
                .unwrap_or(self.probability_decimals),
            interactive: overlay.interactive.unwrap_or(self.interactive),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory holding a local `.atree.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Project-local config
        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("loading local config {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply ATREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ATREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("default_mode") {
            let mode = val.parse::<Mode>().map_err(|e| ApplicationError::Config {
                message: format!("ATREE_DEFAULT_MODE: {}", e),
            })?;
            settings.default_mode = Some(mode);
        }
        if let Ok(val) = config.get_string("currency_symbol") {
            settings.currency_symbol = val;
        }
        if let Ok(val) = config.get_int("probability_decimals") {
            settings.probability_decimals =
                usize::try_from(val).map_err(|_| ApplicationError::Config {
                    message: format!("ATREE_PROBABILITY_DECIMALS: invalid value {}", val),
                })?;
        }
        if let Ok(val) = config.get_bool("interactive") {
            settings.interactive = val;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# atree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/atree/atree.toml   (your baseline)
#   Local:  <project_dir>/.atree.toml     (project-specific overrides)
#   Env:    ATREE_* environment variables (explicit overrides)

# Interpretation of node values when --mode is not given: "monetary" or "probability".
# Unset means: ask interactively.
# default_mode = "probability"

# Currency symbol for monetary values
# currency_symbol = "£"

# Decimals shown for node probabilities
# probability_decimals = 2

# Prompt for leaf values during analysis
# interactive = true

# Colour node values by severity
# color = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
