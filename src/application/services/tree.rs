//! Evolution tree service
//!
//! Loads `evolution_tree.json` into a [`TreeView`].

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::loader::TreeView;
use crate::application::source::{ResourceReader, Source};
use crate::application::ApplicationResult;
use crate::domain::EvolutionTree;
use crate::infrastructure::traits::{FileSystem, HttpClient};

/// Service for loading evolution trees.
pub struct TreeService {
    reader: ResourceReader,
}

impl TreeService {
    /// Create a new tree service.
    pub fn new(fs: Arc<dyn FileSystem>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            reader: ResourceReader::new(fs, http),
        }
    }

    /// Read and validate a tree. Shape violations surface as domain errors.
    #[instrument(level = "debug", skip(self, source), fields(source = %source))]
    pub fn load(&self, source: &Source) -> ApplicationResult<EvolutionTree> {
        let payload = self.reader.read(source)?;
        let tree = EvolutionTree::from_json(&payload)?;
        debug!("load: {} nodes, root '{}'", tree.len(), tree.root_name());
        Ok(tree)
    }

    /// Mount a view and run its single load attempt.
    pub fn open(&self, source: &Source, initial_depth: usize) -> TreeView {
        let (mut view, ticket) = TreeView::mount(source.to_string(), initial_depth);
        let result = self.load(source);
        view.complete(ticket, result);
        view
    }
}
