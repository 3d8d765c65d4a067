//! Domain layer: tree model and the pure policies over it
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod dashboard;
pub mod error;
pub mod expansion;
pub mod node;
pub mod symbol;
pub mod tooltip;

pub use arena::{EvolutionTree, TreeNode, TreeStats};
pub use dashboard::{ChartKind, DashboardData};
pub use error::DomainError;
pub use expansion::{ExpansionState, DEFAULT_INITIAL_DEPTH};
pub use node::{Attributes, NodeKind, RawNode, Year};
pub use symbol::SymbolSizePolicy;
pub use tooltip::{TooltipFormatter, TooltipStyle, DEFAULT_MAX_DESC_LEN};
