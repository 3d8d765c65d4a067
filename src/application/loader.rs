//! One-shot loading of the evolution tree into a view.
//!
//! A [`TreeView`] is mounted with exactly one [`LoadTicket`]. Completing the
//! ticket moves the view from `Loading` to `Ready` or `Unavailable`; a ticket
//! that arrives after the view was unmounted, or that belongs to another
//! view, is dropped without touching any state.

use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::Index;
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{EvolutionTree, ExpansionState};

/// Shown while the load is outstanding.
pub const LOADING_MESSAGE: &str = "loading...";

/// Shown for every failure kind; details go to the log only.
pub const UNAVAILABLE_MESSAGE: &str = "data unavailable";

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// State of a one-shot load.
#[derive(Debug)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Unavailable { reason: String },
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, LoadState::Unavailable { .. })
    }

    /// Collapse any load error into `Unavailable`.
    pub fn from_result(result: ApplicationResult<T>) -> Self {
        match result {
            Ok(value) => LoadState::Ready(value),
            Err(e) => LoadState::Unavailable {
                reason: match e {
                    ApplicationError::Unavailable { reason, .. } => reason,
                    other => other.to_string(),
                },
            },
        }
    }

    /// Static user-facing indicator, `None` once ready.
    pub fn status_message(&self) -> Option<&'static str> {
        match self {
            LoadState::Loading => Some(LOADING_MESSAGE),
            LoadState::Ready(_) => None,
            LoadState::Unavailable { .. } => Some(UNAVAILABLE_MESSAGE),
        }
    }
}

/// Proof of the single outstanding read of a mounted view.
#[derive(Debug)]
pub struct LoadTicket {
    generation: u64,
}

/// A loaded tree plus the expansion state the user mutates.
#[derive(Debug)]
pub struct LoadedTree {
    pub tree: EvolutionTree,
    pub expansion: ExpansionState,
}

impl LoadedTree {
    pub fn new(tree: EvolutionTree, initial_depth: usize) -> Self {
        let expansion = ExpansionState::initial(&tree, initial_depth);
        Self { tree, expansion }
    }

    /// Flip the flag of the node at `path`; returns the new expanded flag.
    pub fn toggle(&mut self, path: &str) -> ApplicationResult<bool> {
        let idx = self.tree.find(path)?;
        Ok(self.expansion.toggle(idx).unwrap_or(false))
    }

    /// Expand the node at `path` and every ancestor, so it shows its children.
    pub fn expand(&mut self, path: &str) -> ApplicationResult<Index> {
        let idx = self.tree.find(path)?;
        self.expansion.reveal(&self.tree, idx);
        self.expansion.set(idx, true);
        Ok(idx)
    }

    /// Collapse the node at `path`; descendants keep their own flags.
    pub fn collapse(&mut self, path: &str) -> ApplicationResult<Index> {
        let idx = self.tree.find(path)?;
        self.expansion.set(idx, false);
        Ok(idx)
    }
}

/// Tree view lifecycle: mount, complete once, unmount.
#[derive(Debug)]
pub struct TreeView {
    resource: String,
    initial_depth: usize,
    generation: u64,
    mounted: bool,
    state: LoadState<LoadedTree>,
}

impl TreeView {
    /// Mount a view in `Loading` state and hand out its only ticket.
    pub fn mount(resource: impl Into<String>, initial_depth: usize) -> (Self, LoadTicket) {
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        let view = Self {
            resource: resource.into(),
            initial_depth,
            generation,
            mounted: true,
            state: LoadState::Loading,
        };
        debug!("mount: {} (generation {})", view.resource, generation);
        (view, LoadTicket { generation })
    }

    /// Apply the outcome of the read. Returns whether it was applied.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: ApplicationResult<EvolutionTree>,
    ) -> bool {
        if !self.mounted {
            debug!("complete: view unmounted, discarding result");
            return false;
        }
        if ticket.generation != self.generation || !self.state.is_loading() {
            debug!("complete: stale ticket {}, discarding result", ticket.generation);
            return false;
        }
        let initial_depth = self.initial_depth;
        self.state = LoadState::from_result(result.map(|t| LoadedTree::new(t, initial_depth)));
        if let LoadState::Unavailable { reason } = &self.state {
            warn!("load {} failed: {}", self.resource, reason);
        }
        true
    }

    /// Detach the view; any later completion is ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn state(&self) -> &LoadState<LoadedTree> {
        &self.state
    }

    pub fn loaded(&self) -> Option<&LoadedTree> {
        match &self.state {
            LoadState::Ready(loaded) => Some(loaded),
            _ => None,
        }
    }

    /// Take the loaded tree, or the `Unavailable` error for any other state.
    pub fn into_loaded(self) -> ApplicationResult<LoadedTree> {
        match self.state {
            LoadState::Ready(loaded) => Ok(loaded),
            LoadState::Loading => Err(ApplicationError::Unavailable {
                resource: self.resource,
                reason: "load did not complete".to_string(),
            }),
            LoadState::Unavailable { reason } => Err(ApplicationError::Unavailable {
                resource: self.resource,
                reason,
            }),
        }
    }
}
