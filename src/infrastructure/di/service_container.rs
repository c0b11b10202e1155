//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::AnalysisService;
use crate::config::Settings;
use crate::infrastructure::editor::{KeepEditor, PresetEditor, StdinEditor};
use crate::infrastructure::traits::{FileSystem, LeafEditor, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Analysis pipeline: load, build, validate, edit, propagate, aggregate
    pub analysis: AnalysisService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let analysis = AnalysisService::new(fs.clone());

        Self {
            settings,
            fs,
            analysis,
        }
    }

    /// Pick the leaf editor for a run.
    ///
    /// Preset updates win; otherwise prompt unless input is disabled by flag or config.
    pub fn leaf_editor(&self, presets: &[(String, f64)], no_input: bool) -> Box<dyn LeafEditor> {
        if !presets.is_empty() {
            Box::new(PresetEditor::new(presets.iter().cloned()))
        } else if no_input || !self.settings.interactive {
            Box::new(KeepEditor)
        } else {
            Box::new(StdinEditor::new(self.settings.currency_symbol.clone()))
        }
    }
}
