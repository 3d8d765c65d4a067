//! Tree node model: the loose wire shape and the parsed, discriminated form.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::domain::error::DomainError;

/// Publication year of a model.
///
/// The upstream generator writes integers, but hand-edited payloads
/// sometimes carry strings; both are kept verbatim for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(i64),
    Text(String),
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Year::Number(n) => write!(f, "{}", n),
            Year::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Descriptive record carried by leaf (model) nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub year: Year,
    /// Document type of the innovation (e.g. "方法改进")
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub kind: String,
    /// Second-level innovation mechanism
    #[serde(default, deserialize_with = "null_as_empty")]
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

/// Hand-edited payloads write `null` for unknown labels; they display as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Marker style forwarded untouched to the chart engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Node exactly as it appears in `evolution_tree.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ItemStyle>,
}

impl RawNode {
    /// Parse a payload holding a single root object.
    pub fn from_json(payload: &str) -> Result<Self, DomainError> {
        serde_json::from_str(payload).map_err(|e| DomainError::malformed("$", e.to_string()))
    }

    /// Resolve the node role. `attributes` decides: a node that also has
    /// children is still a leaf, and its children stay in the tree.
    pub fn kind(&self, path: &str) -> NodeKind {
        match &self.attributes {
            Some(attrs) => {
                if self.children.as_ref().is_some_and(|c| !c.is_empty()) {
                    warn!("{}: node has both attributes and children, treating as leaf", path);
                }
                NodeKind::Leaf(attrs.clone())
            }
            None => NodeKind::Branch,
        }
    }
}

/// Explicit role of a node, decided once at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A concrete model with descriptive attributes
    Leaf(Attributes),
    /// Root, base model or topic grouping
    Branch,
}
