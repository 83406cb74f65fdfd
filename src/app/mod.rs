//! Application layer: per-page UI state, buttons and input handling.

pub mod buttons;
pub mod context;
pub mod event;
pub mod handler;
pub mod pages;
pub mod settings;
pub mod state;
