//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{DashboardService, TreeService};
use crate::config::Settings;
use crate::infrastructure::traits::{
    CommandEditor, Editor, FileSystem, HttpClient, RealFileSystem, ReqwestClient, Selector,
    SkimSelector,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// HTTP abstraction for remote payloads
    pub http: Arc<dyn HttpClient>,

    /// Interactive node picker
    pub selector: Arc<dyn Selector>,

    /// Editor for config files
    pub editor: Arc<dyn Editor>,

    pub tree_service: TreeService,
    pub dashboard_service: DashboardService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let editor = Arc::new(CommandEditor::new(settings.editor.clone()));
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(ReqwestClient::default()),
            Arc::new(SkimSelector),
            editor,
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        http: Arc<dyn HttpClient>,
        selector: Arc<dyn Selector>,
        editor: Arc<dyn Editor>,
    ) -> Self {
        let settings = Arc::new(settings);
        let tree_service = TreeService::new(fs.clone(), http.clone());
        let dashboard_service = DashboardService::new(fs.clone(), http.clone());

        Self {
            settings,
            fs,
            http,
            selector,
            editor,
            tree_service,
            dashboard_service,
        }
    }
}
