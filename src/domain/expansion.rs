//! Expand/collapse state layered over an immutable tree.
//!
//! Every node keeps its own flag. Visibility is derived: a node is visible
//! iff all of its ancestors are expanded. Collapsing a node never touches the
//! flags below it, so expanding it again restores the subtree as it was.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::EvolutionTree;

/// Depth up to which nodes start expanded when the payload gives no hint.
pub const DEFAULT_INITIAL_DEPTH: usize = 2;

/// Per-node expanded/collapsed flags for one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionState {
    flags: HashMap<Index, bool>,
}

impl ExpansionState {
    /// Seed flags: an explicit `collapsed` hint wins, otherwise nodes at
    /// depth <= `initial_depth` are expanded.
    #[instrument(level = "debug", skip(tree))]
    pub fn initial(tree: &EvolutionTree, initial_depth: usize) -> Self {
        let flags = tree
            .iter()
            .map(|(idx, node)| {
                let expanded = match node.collapsed_hint {
                    Some(collapsed) => !collapsed,
                    None => node.depth <= initial_depth,
                };
                (idx, expanded)
            })
            .collect();
        Self { flags }
    }

    /// Own flag of a node; unknown nodes read as collapsed.
    pub fn is_expanded(&self, idx: Index) -> bool {
        self.flags.get(&idx).copied().unwrap_or(false)
    }

    /// Flip the node's own flag and return the new value.
    ///
    /// Returns `None` for an index that does not belong to the tree.
    pub fn toggle(&mut self, idx: Index) -> Option<bool> {
        let flag = self.flags.get_mut(&idx)?;
        *flag = !*flag;
        debug!("toggle: {:?} -> expanded={}", idx, *flag);
        Some(*flag)
    }

    /// Set the node's own flag, returning the previous value.
    pub fn set(&mut self, idx: Index, expanded: bool) -> Option<bool> {
        let flag = self.flags.get_mut(&idx)?;
        Some(std::mem::replace(flag, expanded))
    }

    /// A node is visible iff every ancestor is expanded. The root is always visible.
    pub fn is_visible(&self, tree: &EvolutionTree, idx: Index) -> bool {
        tree.get_node(idx).is_some()
            && tree
                .ancestors(idx)
                .into_iter()
                .all(|ancestor| self.is_expanded(ancestor))
    }

    /// Expand every ancestor of `idx` so that it becomes visible.
    /// Flags of other nodes are left alone.
    pub fn reveal(&mut self, tree: &EvolutionTree, idx: Index) {
        for ancestor in tree.ancestors(idx) {
            self.set(ancestor, true);
        }
    }

    pub fn expand_all(&mut self) {
        self.flags.values_mut().for_each(|f| *f = true);
    }

    pub fn collapse_all(&mut self) {
        self.flags.values_mut().for_each(|f| *f = false);
    }

    /// Visible nodes in pre-order.
    #[instrument(level = "trace", skip(self, tree))]
    pub fn visible_nodes(&self, tree: &EvolutionTree) -> Vec<Index> {
        let mut result = Vec::new();
        let mut stack = vec![tree.root()];
        while let Some(idx) = stack.pop() {
            let Some(node) = tree.get_node(idx) else {
                continue;
            };
            result.push(idx);
            if self.is_expanded(idx) {
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        result
    }

    /// Number of descendants currently hidden below a collapsed node.
    pub fn hidden_below(&self, tree: &EvolutionTree, idx: Index) -> usize {
        if self.is_expanded(idx) {
            return 0;
        }
        tree.iter_from(idx).count().saturating_sub(1)
    }
}
