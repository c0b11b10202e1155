//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::Mode;

/// Attack tree analyser: monetary impact and attack success probability
#[derive(Parser, Debug)]
#[command(name = "atree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Project directory for local config (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate, propagate and aggregate an attack tree
    Analyze {
        /// Attack tree file (.json, .yaml, .yml, .xml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Interpretation of node values
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
        /// Override a leaf value (repeatable)
        #[arg(short, long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, f64)>,
        /// Do not prompt for leaf values
        #[arg(long)]
        no_input: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check every node value against the mode's domain
    Validate {
        /// Attack tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Interpretation of node values
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// List leaf nodes with their input values
    Leaves {
        /// Attack tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show the hierarchy as loaded
    Tree {
        /// Attack tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a template config file
    Template,
    /// Write the template to the global config file (if absent)
    Init,
    /// Show config file locations
    Path,
}

/// Value interpretation selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Monetary impact (e.g. £5000)
    Monetary,
    /// Probability of attack success (0.0 - 1.0)
    Probability,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Monetary => Mode::Monetary,
            ModeArg::Probability => Mode::Probability,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Parse `NAME=VALUE`; the value follows the last `=` so names may contain one.
pub fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing node name in '{}'", s));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid number '{}' for '{}'", value.trim(), name))?;
    Ok((name.to_string(), value))
}
