//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// All colours used by the widgets.
pub struct Theme;

impl Theme {
    // ── device table ───────────────────────────────────────────
    pub fn header_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    /// Device name of a row with children.
    pub fn parent_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn device_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn value_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── description panel ──────────────────────────────────────
    pub fn section_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn label_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn active_tab_style() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn command_input_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    // ── popups ─────────────────────────────────────────────────
    pub fn error_style() -> Style {
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }
}
