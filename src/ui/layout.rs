//! Splits the terminal into tab bar, table, description and status bar.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::pages::Page;

/// Primary screen layout: page tabs on top, the device table with an optional
/// description panel beside it, and a bottom status / filter bar.
pub struct AppLayout {
    pub tabs_area: Rect,
    pub table_area: Rect,
    pub description_area: Option<Rect>,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect, show_description: bool, split_pct: u16) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // page tabs
                Constraint::Min(3),    // table (+ description)
                Constraint::Length(1), // status / filter bar
            ])
            .split(area);

        let (table_area, description_area) = if show_description {
            let split_pct = split_pct.min(100);
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(split_pct),
                    Constraint::Percentage(100 - split_pct),
                ])
                .split(rows[1]);
            (cols[0], Some(cols[1]))
        } else {
            (rows[1], None)
        };

        Self {
            tabs_area: rows[0],
            table_area,
            description_area,
            status_area: rows[2],
        }
    }

    /// Page whose tab label covers the given cell.
    pub fn tab_at(&self, col: u16, row: u16) -> Option<Page> {
        if row != self.tabs_area.y {
            return None;
        }
        tab_spans(self.tabs_area.x)
            .into_iter()
            .find(|(_, start, width)| col >= *start && col < start + width)
            .map(|(page, _, _)| page)
    }
}

/// Horizontal position and width of every tab label, as drawn by the tab bar:
/// ` Label ` separated by `│`.
pub fn tab_spans(x: u16) -> Vec<(Page, u16, u16)> {
    let mut spans = Vec::with_capacity(Page::ALL.len());
    let mut start = x;
    for page in Page::ALL {
        let width = page.label().chars().count() as u16 + 2;
        spans.push((page, start, width));
        start += width + 1;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_panel_takes_the_rest_of_the_split() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 100, 30), true, 60);
        assert_eq!(layout.table_area.width, 60);
        assert_eq!(layout.description_area.map(|a| a.width), Some(40));
        assert_eq!(layout.table_area.height, 28);

        let layout = AppLayout::from_area(Rect::new(0, 0, 100, 30), false, 60);
        assert_eq!(layout.table_area.width, 100);
        assert!(layout.description_area.is_none());
    }

    #[test]
    fn clicks_on_tab_labels_pick_the_page() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 120, 30), false, 60);
        assert_eq!(layout.tab_at(1, 0), Some(Page::System));
        // " System " is 8 cells wide, then the separator.
        assert_eq!(layout.tab_at(8, 0), None);
        assert_eq!(layout.tab_at(9, 0), Some(Page::HardDisks));
        assert_eq!(layout.tab_at(9, 1), None);
    }
}
