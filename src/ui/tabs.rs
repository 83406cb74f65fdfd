//! Page tab bar.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::pages::Page;

use super::layout::tab_spans;
use super::theme::Theme;

pub struct PageTabs {
    pub current: Page,
    /// Pending change count shown at the right end.
    pub pending: usize,
}

impl Widget for PageTabs {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (i, (page, _, _)) in tab_spans(area.x).into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("│", Theme::dim_style()));
            }
            let style = if page == self.current {
                Theme::active_tab_style()
            } else {
                Theme::title_style()
            };
            spans.push(Span::styled(format!(" {} ", page.label()), style));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        if self.pending > 0 {
            let text = format!(" {} pending ", self.pending);
            let width = text.chars().count() as u16;
            if width < area.width {
                let x = area.x + area.width - width;
                buf.set_string(x, area.y, text, Theme::warning_style());
            }
        }
    }
}
