//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use crate::domain::{LeafValue, Mode};

/// Leaf name -> new value. Leaves not present keep their current value.
pub type LeafUpdates = BTreeMap<String, f64>;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Value-editing collaborator.
///
/// Offered the current leaf values for the active mode; returns a possibly partial
/// set of updates. Updates are re-validated by the caller before propagation.
pub trait LeafEditor {
    fn edit(&self, mode: Mode, leaves: &[LeafValue]) -> io::Result<LeafUpdates>;
}

/// Real filesystem implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}
