use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::error::DomainError;
use crate::domain::node::{Attributes, NodeKind, RawNode};

/// Separator between segments of a node path.
pub const PATH_SEPARATOR: char = '/';

/// Prefix marking a positional path (`#0/2`) instead of a name path.
pub const INDEX_PATH_PREFIX: char = '#';

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
    /// Explicit marker size from the payload
    pub symbol_size: Option<f64>,
    /// Initial collapse hint from the payload
    pub collapsed_hint: Option<bool>,
    /// Marker color from the payload
    pub color: Option<String>,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in payload order
    pub children: Vec<Index>,
    /// Distance from the root (root is 0)
    pub depth: usize,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        match &self.kind {
            NodeKind::Leaf(attrs) => Some(attrs),
            NodeKind::Branch => None,
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Node counts of a loaded tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of nodes at each depth, root first
    pub per_depth: Vec<usize>,
    pub leaves: usize,
    pub total: usize,
}

impl TreeStats {
    /// Number of levels (a lone root has depth 1).
    pub fn depth(&self) -> usize {
        self.per_depth.len()
    }
}

/// Immutable evolution tree held in a generational arena.
///
/// Node indices stay valid for the lifetime of the tree and serve as the
/// node identity for expansion state.
#[derive(Debug)]
pub struct EvolutionTree {
    arena: Arena<TreeNode>,
    root: Index,
}

impl EvolutionTree {
    /// Build the tree from its wire form, validating every node once.
    #[instrument(level = "debug", skip(raw), fields(root = %raw.name))]
    pub fn from_raw(raw: &RawNode) -> Result<Self, DomainError> {
        let mut arena = Arena::new();
        let root = Self::insert(&mut arena, raw, None, 0, &raw.name)?;
        let mut tree = Self { arena, root };

        // (node, parent index, depth, display path)
        let mut stack: Vec<(&RawNode, Index, usize, String)> = Vec::new();
        Self::push_children(&mut stack, raw, root, 1, &raw.name);

        while let Some((node, parent_idx, depth, path)) = stack.pop() {
            let idx = Self::insert(&mut tree.arena, node, Some(parent_idx), depth, &path)?;
            if let Some(parent) = tree.arena.get_mut(parent_idx) {
                parent.children.push(idx);
            }
            Self::push_children(&mut stack, node, idx, depth + 1, &path);
        }

        Ok(tree)
    }

    /// Parse and validate a JSON payload in one step.
    pub fn from_json(payload: &str) -> Result<Self, DomainError> {
        Self::from_raw(&RawNode::from_json(payload)?)
    }

    fn push_children<'a>(
        stack: &mut Vec<(&'a RawNode, Index, usize, String)>,
        node: &'a RawNode,
        idx: Index,
        depth: usize,
        path: &str,
    ) {
        // Reverse so siblings pop, and therefore attach, in payload order
        for child in node.children.iter().flatten().rev() {
            let mut child_path = format!("{}{}", path, PATH_SEPARATOR);
            push_escaped(&mut child_path, &child.name);
            stack.push((child, idx, depth, child_path));
        }
    }

    fn insert(
        arena: &mut Arena<TreeNode>,
        raw: &RawNode,
        parent: Option<Index>,
        depth: usize,
        path: &str,
    ) -> Result<Index, DomainError> {
        if raw.name.trim().is_empty() {
            return Err(DomainError::malformed(path, "node name is empty"));
        }
        let kind = raw.kind(path);
        let node = TreeNode {
            name: raw.name.clone(),
            kind,
            symbol_size: raw.symbol_size,
            collapsed_hint: raw.collapsed,
            color: raw.item_style.as_ref().and_then(|s| s.color.clone()),
            parent,
            children: Vec::new(),
            depth,
        };
        Ok(arena.insert(node))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_node(&self) -> &TreeNode {
        &self.arena[self.root]
    }

    pub fn root_name(&self) -> &str {
        &self.root_node().name
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal, children left to right.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order traversal of the subtree rooted at `idx`.
    pub fn iter_from(&self, idx: Index) -> TreeIterator<'_> {
        TreeIterator::new(self, idx)
    }

    /// Ancestors of `idx`, nearest first. The node itself is excluded.
    pub fn ancestors(&self, idx: Index) -> Vec<Index> {
        let mut result = Vec::new();
        let mut current = self.get_node(idx).and_then(|n| n.parent);
        while let Some(parent_idx) = current {
            result.push(parent_idx);
            current = self.get_node(parent_idx).and_then(|n| n.parent);
        }
        result
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects all leaf (model) nodes in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(idx, _)| idx)
            .collect()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn stats(&self) -> TreeStats {
        let mut per_depth: Vec<usize> = Vec::new();
        let mut leaves = 0;
        for (_, node) in self.iter() {
            if per_depth.len() <= node.depth {
                per_depth.resize(node.depth + 1, 0);
            }
            per_depth[node.depth] += 1;
            if node.is_leaf() {
                leaves += 1;
            }
        }
        TreeStats {
            total: per_depth.iter().sum(),
            per_depth,
            leaves,
        }
    }

    /// Name path from the root, e.g. `Root/GPT/Attention`.
    ///
    /// Separators inside names are escaped (`训练\/推理`), and a sibling that
    /// repeats an earlier sibling's name carries its occurrence (`GPT~1`), so
    /// `find(path_of(idx))` always yields `idx`.
    pub fn path_of(&self, idx: Index) -> Option<String> {
        self.get_node(idx)?;
        let mut chain = self.ancestors(idx);
        chain.reverse();
        chain.push(idx);

        let mut path = String::new();
        for (i, &node_idx) in chain.iter().enumerate() {
            let node = self.get_node(node_idx)?;
            if i > 0 {
                path.push(PATH_SEPARATOR);
            } else if node.name.starts_with(INDEX_PATH_PREFIX) {
                path.push(ESCAPE);
            }
            push_escaped(&mut path, &node.name);
            let occurrence = self.occurrence(node_idx);
            if occurrence > 0 {
                path.push(OCCURRENCE_MARKER);
                path.push_str(&occurrence.to_string());
            }
        }
        Some(path)
    }

    /// How many earlier siblings share this node's name.
    fn occurrence(&self, idx: Index) -> usize {
        let Some(node) = self.get_node(idx) else {
            return 0;
        };
        let Some(parent) = node.parent.and_then(|p| self.get_node(p)) else {
            return 0;
        };
        parent
            .children
            .iter()
            .take_while(|&&c| c != idx)
            .filter(|&&c| self.get_node(c).is_some_and(|n| n.name == node.name))
            .count()
    }

    /// Positional path from the root, e.g. `#0/2`. The root is `#`.
    pub fn index_path_of(&self, idx: Index) -> Option<String> {
        self.get_node(idx)?;
        let mut positions = Vec::new();
        let mut current = idx;
        while let Some(parent_idx) = self.get_node(current).and_then(|n| n.parent) {
            let parent = self.get_node(parent_idx)?;
            let pos = parent.children.iter().position(|&c| c == current)?;
            positions.push(pos.to_string());
            current = parent_idx;
        }
        positions.reverse();
        Some(format!(
            "{}{}",
            INDEX_PATH_PREFIX,
            positions.join(&PATH_SEPARATOR.to_string())
        ))
    }

    /// Resolve a name path (`Root/A/B`) or positional path (`#0/1`).
    ///
    /// A bare name picks the first of equally named siblings; `name~N` picks
    /// the N-th repeat. `\` escapes the next character.
    #[instrument(level = "debug", skip(self))]
    pub fn find(&self, path: &str) -> Result<Index, DomainError> {
        let not_found = || DomainError::NodeNotFound(path.to_string());

        if let Some(positions) = path.strip_prefix(INDEX_PATH_PREFIX) {
            let mut current = self.root;
            for segment in positions.split(PATH_SEPARATOR).filter(|s| !s.is_empty()) {
                let pos: usize = segment.parse().map_err(|_| not_found())?;
                let node = self.get_node(current).ok_or_else(not_found)?;
                current = *node.children.get(pos).ok_or_else(not_found)?;
            }
            return Ok(current);
        }

        let segments = split_name_path(path).ok_or_else(not_found)?;
        let mut segments = segments.into_iter();
        match segments.next() {
            Some(root) if root.occurrence == 0 && root.name == self.root_name() => {}
            _ => return Err(not_found()),
        }
        let mut current = self.root;
        for segment in segments {
            let node = self.get_node(current).ok_or_else(not_found)?;
            current = node
                .children
                .iter()
                .copied()
                .filter(|&c| self.get_node(c).is_some_and(|n| n.name == segment.name))
                .nth(segment.occurrence)
                .ok_or_else(not_found)?;
        }
        Ok(current)
    }
}

const ESCAPE: char = '\\';
const OCCURRENCE_MARKER: char = '~';

fn push_escaped(path: &mut String, name: &str) {
    for c in name.chars() {
        if matches!(c, ESCAPE | PATH_SEPARATOR | OCCURRENCE_MARKER) {
            path.push(ESCAPE);
        }
        path.push(c);
    }
}

/// One unescaped segment of a name path.
#[derive(Debug, PartialEq, Eq)]
struct Segment {
    name: String,
    occurrence: usize,
}

/// Split a name path into segments, honouring escapes. Empty segments are
/// skipped; a dangling escape or a non-numeric occurrence yields `None`.
fn split_name_path(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut name = String::new();
    let mut occurrence: Option<String> = None;
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => {
                let escaped = chars.next()?;
                match occurrence.as_mut() {
                    Some(digits) => digits.push(escaped),
                    None => name.push(escaped),
                }
            }
            PATH_SEPARATOR => {
                if let Some(segment) = finish_segment(&mut name, occurrence.take())? {
                    segments.push(segment);
                }
            }
            OCCURRENCE_MARKER if occurrence.is_none() => occurrence = Some(String::new()),
            _ => match occurrence.as_mut() {
                Some(digits) => digits.push(c),
                None => name.push(c),
            },
        }
    }
    if let Some(segment) = finish_segment(&mut name, occurrence)? {
        segments.push(segment);
    }
    Some(segments)
}

fn finish_segment(name: &mut String, occurrence: Option<String>) -> Option<Option<Segment>> {
    let occurrence = match occurrence {
        Some(digits) => digits.parse().ok()?,
        None if name.is_empty() => return Some(None),
        None => 0,
    };
    Some(Some(Segment {
        name: std::mem::take(name),
        occurrence,
    }))
}

pub struct TreeIterator<'a> {
    tree: &'a EvolutionTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a EvolutionTree, start: Index) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
