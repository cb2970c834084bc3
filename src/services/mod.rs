//! External service interactions
//!
//! - Dataset loading from built-in YAML or a data directory
//! - CSV export of the current view

pub mod dataset;
pub mod export;

pub use dataset::{load_builtin, load_dataset, Dataset};
pub use export::export_to_dir;
