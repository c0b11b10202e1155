//! atree: attack tree value model
//!
//! Architecture:
//! - `domain`: tree structure, validation, propagation and aggregation (no I/O)
//! - `application`: ingestion, analysis service, reports
//! - `infrastructure`: I/O traits, leaf editors, service container
//! - `cli`: argument parsing, command dispatch, rendering

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
