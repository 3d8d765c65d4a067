//! Tooltip text for a hovered node.
//!
//! Three branches, chosen by node role: the root shows its name only, a leaf
//! shows its attributes with a truncated description, and an intermediate
//! node shows its name and the number of direct children.

use std::borrow::Cow;

use crate::domain::arena::{EvolutionTree, TreeNode};
use crate::domain::node::{Attributes, NodeKind};

/// Maximum description length in characters before truncation.
pub const DEFAULT_MAX_DESC_LEN: usize = 150;

/// Appended to a truncated description.
pub const ELLIPSIS: &str = "...";

/// Output flavour of the formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TooltipStyle {
    /// Markup handed to the chart engine's tooltip box
    #[default]
    Html,
    /// Plain lines for terminal output
    Plain,
}

/// Cut `desc` after `max_len` characters and append [`ELLIPSIS`].
///
/// The cut is positional, not word aware; a description of exactly
/// `max_len` characters is returned unchanged.
pub fn truncate_desc(desc: &str, max_len: usize) -> Cow<'_, str> {
    match desc.char_indices().nth(max_len) {
        Some((byte_pos, _)) => Cow::Owned(format!("{}{}", &desc[..byte_pos], ELLIPSIS)),
        None => Cow::Borrowed(desc),
    }
}

/// Deterministic, side-effect free tooltip formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipFormatter {
    pub max_desc_len: usize,
    pub style: TooltipStyle,
}

impl Default for TooltipFormatter {
    fn default() -> Self {
        Self {
            max_desc_len: DEFAULT_MAX_DESC_LEN,
            style: TooltipStyle::Html,
        }
    }
}

impl TooltipFormatter {
    pub fn new(max_desc_len: usize, style: TooltipStyle) -> Self {
        Self {
            max_desc_len,
            style,
        }
    }

    pub fn plain(max_desc_len: usize) -> Self {
        Self::new(max_desc_len, TooltipStyle::Plain)
    }

    /// Format `node`; the root is recognised by name equality with `root_name`.
    pub fn format(&self, node: &TreeNode, root_name: &str) -> String {
        if node.name == root_name {
            return self.root(&node.name);
        }
        match &node.kind {
            NodeKind::Leaf(attrs) => self.leaf(&node.name, attrs),
            NodeKind::Branch => self.branch(&node.name, node.children.len()),
        }
    }

    /// Convenience over [`format`](Self::format) using the tree's root name.
    pub fn format_in(&self, tree: &EvolutionTree, node: &TreeNode) -> String {
        self.format(node, tree.root_name())
    }

    fn root(&self, name: &str) -> String {
        match self.style {
            TooltipStyle::Html => format!(
                r#"<div style="font-size: 16px; font-weight: bold; color: #3b82f6;">{}</div>"#,
                escape_html(name)
            ),
            TooltipStyle::Plain => name.to_string(),
        }
    }

    fn leaf(&self, name: &str, attrs: &Attributes) -> String {
        let desc = truncate_desc(attrs.desc.as_deref().unwrap_or(""), self.max_desc_len);
        match self.style {
            TooltipStyle::Html => [
                r#"<div style="max-width: 350px; word-wrap: break-word; white-space: normal;">"#
                    .to_string(),
                format!(
                    r#"<div style="font-size: 14px; font-weight: bold; color: #3b82f6; margin-bottom: 8px; word-break: break-word;">{}</div>"#,
                    escape_html(name)
                ),
                format!(
                    r#"<div style="margin-bottom: 6px; color: #94a3b8;"><span style="color: #10b981;">📅 {}</span> | <span style="color: #f59e0b;">📋 {}</span></div>"#,
                    escape_html(&attrs.year.to_string()),
                    escape_html(&attrs.kind)
                ),
                format!(
                    r#"<div style="margin-bottom: 6px; padding: 8px; background: rgba(59, 130, 246, 0.1); border-radius: 4px;"><div style="font-size: 11px; color: #8b5cf6; margin-bottom: 4px;">创新机制：</div><div style="font-size: 11px; color: #e2e8f0; word-break: break-word;">{}</div></div>"#,
                    escape_html(&attrs.topic)
                ),
                format!(
                    r#"<div style="font-size: 11px; line-height: 1.5; color: #cbd5e1; word-break: break-word;">{}</div>"#,
                    escape_html(&desc)
                ),
                "</div>".to_string(),
            ]
            .concat(),
            TooltipStyle::Plain => format!(
                "{}\n{} | {}\ntopic: {}\n{}",
                name, attrs.year, attrs.kind, attrs.topic, desc
            ),
        }
    }

    fn branch(&self, name: &str, child_count: usize) -> String {
        match self.style {
            TooltipStyle::Html => {
                let count = if child_count > 0 {
                    format!("{} 个子节点", child_count)
                } else {
                    String::new()
                };
                format!(
                    r#"<div style="font-size: 14px; font-weight: bold; color: #8b5cf6;">{}</div><div style="font-size: 12px; color: #94a3b8; margin-top: 4px;">{}</div>"#,
                    escape_html(name),
                    count
                )
            }
            TooltipStyle::Plain if child_count > 0 => {
                format!("{}\n{} children", name, child_count)
            }
            TooltipStyle::Plain => name.to_string(),
        }
    }
}

/// Format with the default HTML formatter (150 character descriptions).
pub fn format(node: &TreeNode, root_name: &str) -> String {
    TooltipFormatter::default().format(node, root_name)
}

fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
