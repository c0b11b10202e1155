//! Leaf value editors: interactive prompting, preset updates, and no-op.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::domain::{LeafValue, Mode};
use crate::infrastructure::traits::{LeafEditor, LeafUpdates};

/// Prompts for every leaf on stdin/stdout. Blank input keeps the current value.
#[derive(Debug, Clone)]
pub struct StdinEditor {
    currency_symbol: String,
}

impl StdinEditor {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }
}

impl LeafEditor for StdinEditor {
    fn edit(&self, mode: Mode, leaves: &[LeafValue]) -> io::Result<LeafUpdates> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        prompt_leaves(
            &mut stdin.lock(),
            &mut stdout.lock(),
            mode,
            leaves,
            &self.currency_symbol,
        )
    }
}

/// Prompt loop behind [`StdinEditor`], generic over its streams.
///
/// Each leaf is asked for until the answer is blank (keep) or a number inside the
/// mode's domain. End of input keeps all remaining leaves.
pub fn prompt_leaves<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    mode: Mode,
    leaves: &[LeafValue],
    currency_symbol: &str,
) -> io::Result<LeafUpdates> {
    let mut updates = LeafUpdates::new();
    writeln!(
        output,
        "\nEnter updated values for leaf nodes (leave blank to keep current):"
    )?;

    'leaves: for leaf in leaves {
        let current = match mode {
            Mode::Monetary => format!("{}{}", currency_symbol, leaf.value.trunc()),
            Mode::Probability => format!("P={:.2}", leaf.value),
        };

        loop {
            write!(output, "{} [current: {}]: ", leaf.name, current)?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break 'leaves;
            }
            let raw = line.trim();
            if raw.is_empty() {
                break;
            }

            match raw.parse::<f64>() {
                Ok(value) if mode.accepts(value) => {
                    debug!("leaf '{}' updated to {}", leaf.name, value);
                    updates.insert(leaf.name.clone(), value);
                    break;
                }
                Ok(_) => match mode {
                    Mode::Probability => {
                        writeln!(output, "Value must be between 0.0 and 1.0 for probability.")?
                    }
                    Mode::Monetary => {
                        writeln!(output, "Monetary value must be a non-negative whole number.")?
                    }
                },
                Err(_) => writeln!(
                    output,
                    "Invalid input. Please enter a numeric value or leave blank to skip."
                )?,
            }
        }
    }

    Ok(updates)
}

/// Applies a fixed set of updates, e.g. from `--set NAME=VALUE` arguments.
#[derive(Debug, Clone, Default)]
pub struct PresetEditor {
    updates: LeafUpdates,
}

impl PresetEditor {
    pub fn new(updates: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            updates: updates.into_iter().collect(),
        }
    }
}

impl LeafEditor for PresetEditor {
    fn edit(&self, _mode: Mode, _leaves: &[LeafValue]) -> io::Result<LeafUpdates> {
        Ok(self.updates.clone())
    }
}

/// Keeps every leaf value as loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepEditor;

impl LeafEditor for KeepEditor {
    fn edit(&self, _mode: Mode, _leaves: &[LeafValue]) -> io::Result<LeafUpdates> {
        Ok(LeafUpdates::new())
    }
}
