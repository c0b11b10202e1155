//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Interpretation of node values, fixed for a whole analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Values are monetary losses (non-negative whole amounts).
    Monetary,
    /// Values are attack success probabilities in `[0, 1]`.
    Probability,
}

impl Mode {
    /// The numeric domain every pre-propagation value must satisfy.
    pub fn rule(self) -> DomainRule {
        match self {
            Mode::Monetary => DomainRule::NonNegativeInteger,
            Mode::Probability => DomainRule::UnitInterval,
        }
    }

    /// Check a single value against this mode's domain.
    pub fn accepts(self, value: f64) -> bool {
        self.rule().accepts(value)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Monetary => write!(f, "monetary"),
            Mode::Probability => write!(f, "probability"),
        }
    }
}

/// Error returned when a mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported mode '{}' (expected 'monetary' or 'probability')",
            self.0
        )
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monetary" => Ok(Mode::Monetary),
            "probability" => Ok(Mode::Probability),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// A numeric domain rule, named in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainRule {
    /// `0.0 <= v <= 1.0`
    UnitInterval,
    /// `v >= 0` and `v` has no fractional part (exact, no tolerance)
    NonNegativeInteger,
}

impl DomainRule {
    pub fn accepts(self, value: f64) -> bool {
        match self {
            DomainRule::UnitInterval => (0.0..=1.0).contains(&value),
            DomainRule::NonNegativeInteger => {
                value.is_finite() && value >= 0.0 && value == value.trunc()
            }
        }
    }

    /// The mode this rule belongs to.
    pub fn mode(self) -> Mode {
        match self {
            DomainRule::UnitInterval => Mode::Probability,
            DomainRule::NonNegativeInteger => Mode::Monetary,
        }
    }
}

impl fmt::Display for DomainRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainRule::UnitInterval => write!(f, "must be between 0 and 1"),
            DomainRule::NonNegativeInteger => write!(f, "must be a non-negative integer"),
        }
    }
}

/// Nested source record as delivered by ingestion.
///
/// `value` is meaningful for leaves only; `children` defaults to empty (a leaf).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRecord>,
}

impl NodeRecord {
    /// Leaf record carrying a value.
    pub fn leaf(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            children: Vec::new(),
        }
    }

    /// Internal record without a value of its own.
    pub fn branch(name: impl Into<String>, children: Vec<NodeRecord>) -> Self {
        Self {
            name: name.into(),
            value: None,
            children,
        }
    }
}
