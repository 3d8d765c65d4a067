//! Evolution-tree viewer library
//!
//! Loads a hierarchical innovation tree (root, base models, level-1 topics,
//! models), keeps per-node expand/collapse state, formats node tooltips and
//! exports chart option documents for the tree and the dashboard charts.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
