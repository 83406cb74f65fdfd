//! Core model: devices, device graphs and the table entry tree.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod capability;
pub mod description;
pub mod device;
pub mod devicegraph;
pub mod entry;
pub mod error;
pub mod search;
pub mod size;
pub mod storage;

pub use devicegraph::Devicegraph;
pub use storage::StorageManager;
