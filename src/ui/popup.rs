//! Popup overlay widgets: settings menu, controls submenu and the modal
//! dialogs raised by buttons and actions.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::app::settings::{SettingsItem, SETTINGS_ITEMS};
use crate::app::state::{AppState, Dialog};
use crate::config::{AppConfig, Command};

use super::theme::Theme;

// ───────────────────────────────────────── settings popup ────

/// Settings menu popup overlay.
pub struct SettingsPopup<'a> {
    pub state: &'a AppState,
}

impl<'a> Widget for SettingsPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (SETTINGS_ITEMS.len() as u16) + 6;
        let popup = centered_fixed(44, height, area);
        Clear.render(popup, buf);

        let block = popup_block(" Settings ", Color::DarkGray);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = Vec::new();
        lines.push(Line::raw(""));
        for (i, item) in SETTINGS_ITEMS.iter().enumerate() {
            let (prefix, style) = item_style(i == self.state.settings_selected);
            let label = format!("{prefix}{:<24}", item.label());

            let value = match item {
                SettingsItem::Submenu { .. } => None,
                SettingsItem::Toggle { get, .. } => Some(if get(self.state) {
                    ("[ON]".to_string(), Style::default().fg(Color::Green))
                } else {
                    ("[OFF]".to_string(), Style::default().fg(Color::DarkGray))
                }),
                SettingsItem::Cycle { value, .. } => {
                    Some((format!("< {} >", value(self.state)), Style::default().fg(Color::Yellow)))
                }
            };

            match value {
                None => lines.push(Line::from(Span::styled(format!("{label} ›"), style))),
                Some((text, value_style)) => lines.push(Line::from(vec![
                    Span::styled(label, style),
                    Span::styled(text, value_style),
                ])),
            }
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter/Space: toggle  Esc: close",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── controls popup ────

/// Interactive controls / keybinding popup overlay.
pub struct ControlsPopup<'a> {
    pub config: &'a AppConfig,
    pub selected: usize,
    pub awaiting_rebind: bool,
}

impl<'a> Widget for ControlsPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // commands + 2 blanks + reset + hint + 2 border
        let height = (Command::ALL.len() as u16) + 7;
        let popup = centered_fixed(52, height, area);
        Clear.render(popup, buf);

        let block = popup_block(" Controls ", Color::DarkGray);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = Vec::new();

        lines.push(Line::raw(""));

        // ── Command rows ────────────────────────────────────────
        for (i, &command) in Command::ALL.iter().enumerate() {
            let is_selected = i == self.selected;
            let (prefix, base_style) = item_style(is_selected);

            let keys_display = if is_selected && self.awaiting_rebind {
                "Press a key…".to_string()
            } else {
                self.config.display_bindings(command)
            };

            let key_style = if is_selected && self.awaiting_rebind {
                Style::default()
                    .fg(Color::Yellow)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else if is_selected {
                Style::default().fg(Color::Yellow).bg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Yellow)
            };

            // Label left-aligned, keys right-aligned.
            let label_col = format!("{prefix}{:<22}", command.label());
            let keys_width = (inner.width as usize).saturating_sub(label_col.chars().count()).max(1);
            let keys_col = format!("{keys_display:>keys_width$}");

            lines.push(Line::from(vec![
                Span::styled(label_col, base_style),
                Span::styled(keys_col, key_style),
            ]));
        }

        // ── Reset option ────────────────────────────────────────
        lines.push(Line::raw(""));
        let (reset_prefix, reset_style) = item_style(self.selected == Command::ALL.len());
        lines.push(Line::from(Span::styled(
            format!("{reset_prefix}⟳ Reset to defaults"),
            reset_style,
        )));

        // ── Hint bar ────────────────────────────────────────────
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter: add key  Del: clear  Esc: back",
            dim,
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── dialogs ───────────

/// Modal dialog at the front of the queue.
pub struct DialogPopup<'a> {
    pub dialog: &'a Dialog,
}

impl<'a> Widget for DialogPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dim = Style::default().fg(Color::DarkGray);
        let (title, border, body, hint): (&str, Color, Vec<Line>, &str) = match self.dialog {
            Dialog::Error(message) => (
                " Error ",
                Color::Red,
                vec![Line::from(Span::styled(message.as_str(), Theme::error_style()))],
                "Enter: close",
            ),
            Dialog::Warning(message) => (
                " Warning ",
                Color::Yellow,
                vec![Line::from(Span::styled(message.as_str(), Theme::warning_style()))],
                "Enter: close",
            ),
            Dialog::Confirm { message, .. } => (
                " Confirm ",
                Color::Yellow,
                vec![Line::raw(message.as_str())],
                "y/Enter: yes  n/Esc: no",
            ),
            Dialog::Input { title, value, .. } => (
                *title,
                Color::Cyan,
                vec![Line::from(vec![
                    Span::styled(value.as_str(), Theme::command_input_style()),
                    Span::styled("█", Theme::command_input_style()),
                ])],
                "Enter: apply  Esc: cancel",
            ),
            Dialog::Summary { title, lines } => (
                *title,
                Color::Green,
                lines.iter().map(|l| Line::raw(format!("• {l}"))).collect(),
                "Enter: close",
            ),
        };

        let width = 60u16.min(area.width.saturating_sub(4)).max(20);
        let text_width = width.saturating_sub(4).max(1) as usize;
        let body_rows: u16 = body
            .iter()
            .map(|l| (l.width().max(1)).div_ceil(text_width) as u16)
            .sum();
        let height = body_rows + 6;
        let popup = centered_fixed(width, height, area);
        Clear.render(popup, buf);

        let block = popup_block(&format!(" {} ", title.trim()), border);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = vec![Line::raw("")];
        lines.extend(body);
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(hint, dim)));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner.inner(ratatui::layout::Margin::new(1, 0)), buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

fn popup_block(title: &str, border: Color) -> Block<'static> {
    Block::default()
        .title(title.to_string())
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

fn item_style(selected: bool) -> (&'static str, Style) {
    if selected {
        (
            " ▸ ",
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("   ", Style::default().fg(Color::White))
    }
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_dialog_renders_its_message() {
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        let dialog = Dialog::Error("No device selected".into());
        DialogPopup { dialog: &dialog }.render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Error"));
        assert!(text.contains("No device selected"));
    }

    #[test]
    fn centered_rect_is_clamped() {
        let r = centered_fixed(100, 10, Rect::new(0, 0, 40, 20));
        assert_eq!(r, Rect::new(0, 5, 40, 10));
    }
}
