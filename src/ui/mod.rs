//! Ratatui widgets.  They read the graph and the app state but never
//! mutate the graph.

pub mod columns;
pub mod description;
pub mod device_table;
pub mod layout;
pub mod popup;
pub mod tabs;
pub mod theme;
