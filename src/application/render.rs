//! Terminal rendering of the visible part of a tree.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{EvolutionTree, ExpansionState, NodeKind, SymbolSizePolicy};

const EXPANDED_MARKER: &str = "[-]";
const COLLAPSED_MARKER: &str = "[+]";

/// Renders what a user would currently see: collapsed nodes are shown with
/// their hidden descendant count, and their subtrees are left out.
#[derive(Debug, Clone, Default)]
pub struct TreeRenderer {
    symbols: Option<SymbolSizePolicy>,
}

impl TreeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the resolved symbol size to every label.
    pub fn with_symbol_sizes(mut self, symbols: SymbolSizePolicy) -> Self {
        self.symbols = Some(symbols);
        self
    }

    #[instrument(level = "debug", skip_all)]
    pub fn render(&self, tree: &EvolutionTree, expansion: &ExpansionState) -> Tree<String> {
        self.build(tree, expansion, tree.root())
    }

    fn build(&self, tree: &EvolutionTree, expansion: &ExpansionState, idx: Index) -> Tree<String> {
        let Some(node) = tree.get_node(idx) else {
            return Tree::new(String::new());
        };
        let base = match &node.kind {
            NodeKind::Leaf(attrs) => format!("{} ({}, {})", node.name, attrs.year, attrs.kind),
            NodeKind::Branch => node.name.clone(),
        };
        let mut label = if node.children.is_empty() {
            base
        } else if expansion.is_expanded(idx) {
            format!("{} {}", EXPANDED_MARKER, base)
        } else {
            format!(
                "{} {} ({} hidden)",
                COLLAPSED_MARKER,
                base,
                expansion.hidden_below(tree, idx)
            )
        };
        if let Some(symbols) = &self.symbols {
            label.push_str(&format!(" <{}>", symbols.size_of(node, tree.root_name())));
        }

        let mut rendered = Tree::new(label);
        if expansion.is_expanded(idx) {
            for &child in &node.children {
                rendered.push(self.build(tree, expansion, child));
            }
        }
        rendered
    }
}
