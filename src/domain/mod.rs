//! Domain layer: the attack tree value model
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).
//! Operations run in strict order: build, validate, propagate, aggregate.

pub mod aggregator;
pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod propagator;
pub mod validator;

pub use aggregator::aggregate;
pub use arena::{AttackTree, LeafValue, TreeNode};
pub use builder::{build_tree, TreeBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use propagator::propagate;
pub use validator::{validate, Validator};
