//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod loader;
pub mod options;
pub mod render;
pub mod services;
pub mod source;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use loader::{
    LoadState, LoadTicket, LoadedTree, TreeView, LOADING_MESSAGE, UNAVAILABLE_MESSAGE,
};
pub use options::{chart_option, TreeChartSettings, TreeOptionBuilder};
pub use render::TreeRenderer;
pub use source::{ResourceReader, Source};
