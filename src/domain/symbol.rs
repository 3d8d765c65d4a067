//! Marker size per node role.

use crate::domain::arena::TreeNode;

pub const ROOT_SYMBOL_SIZE: f64 = 40.0;
pub const LEAF_SYMBOL_SIZE: f64 = 10.0;
pub const DEFAULT_SYMBOL_SIZE: f64 = 15.0;

/// Maps node shape to a rendered marker size.
///
/// Precedence: root, then leaf, then an explicit `symbolSize` override,
/// then the default. A leaf's own override is therefore ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolSizePolicy {
    pub root: f64,
    pub leaf: f64,
    pub default: f64,
}

impl Default for SymbolSizePolicy {
    fn default() -> Self {
        Self {
            root: ROOT_SYMBOL_SIZE,
            leaf: LEAF_SYMBOL_SIZE,
            default: DEFAULT_SYMBOL_SIZE,
        }
    }
}

impl SymbolSizePolicy {
    pub fn size_of(&self, node: &TreeNode, root_name: &str) -> f64 {
        if node.name == root_name {
            self.root
        } else if node.is_leaf() {
            self.leaf
        } else if let Some(size) = node.symbol_size {
            size
        } else {
            self.default
        }
    }
}
