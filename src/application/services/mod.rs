//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, HttpClient)
//! but are themselves concrete structs, not traits.

mod dashboard;
mod tree;

pub use dashboard::{DashboardService, DashboardSummary};
pub use tree::TreeService;
