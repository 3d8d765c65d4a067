//! ECharts option documents built from loaded payloads
//!
//! Options are plain JSON values; the rendering engine is an external consumer.

pub mod charts;
pub mod tree;

pub use charts::chart_option;
pub use tree::{TreeChartSettings, TreeOptionBuilder};
