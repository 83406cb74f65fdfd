//! Ratatui widget that renders a device table: a header row plus the
//! flattened, indented [`TableItem`] tree with ▼/▶ markers on rows that
//! have children.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::entry::{RowId, TableItem};

use super::columns::Column;
use super::theme::Theme;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the table widget (selected index, scroll offset).
#[derive(Debug, Default)]
pub struct DeviceTableState {
    /// Index into the *visible* rows.
    pub selected: usize,
    /// First visible row.
    pub offset: usize,
}

impl DeviceTableState {
    /// Ensure the selected row is visible within a viewport of `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected - height + 1;
        }
    }
}

// ───────────────────────────────────────── row model ─────────

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: RowId,
    pub depth: usize,
    pub has_children: bool,
    pub open: bool,
    pub values: Vec<String>,
}

/// Visible rows of `items`: children of closed rows are skipped.
pub fn flatten(items: &[TableItem]) -> Vec<TableRow> {
    let mut rows = Vec::new();
    for item in items {
        collect_rows(item, 0, &mut rows);
    }
    rows
}

fn collect_rows(item: &TableItem, depth: usize, rows: &mut Vec<TableRow>) {
    rows.push(TableRow {
        id: item.id,
        depth,
        has_children: !item.children.is_empty(),
        open: item.open,
        values: item.values.clone(),
    });
    if !item.open {
        return;
    }
    for child in &item.children {
        collect_rows(child, depth + 1, rows);
    }
}

// ───────────────────────────────────────── widget ────────────

/// The table widget itself, created fresh each frame.
pub struct DeviceTable<'a> {
    columns: &'a [Column],
    rows: &'a [TableRow],
    block: Option<Block<'a>>,
    /// Shown instead of rows when there are none.
    empty_text: &'a str,
}

impl<'a> DeviceTable<'a> {
    pub fn new(columns: &'a [Column], rows: &'a [TableRow]) -> Self {
        Self {
            columns,
            rows,
            block: None,
            empty_text: "No devices",
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn empty_text(mut self, text: &'a str) -> Self {
        self.empty_text = text;
        self
    }

    /// Width of every column.  The device column takes what the others leave.
    fn widths(&self, total: u16) -> Vec<u16> {
        let fixed: u16 = self
            .columns
            .iter()
            .map(|c| c.width().saturating_add(1))
            .sum();
        let rest = total.saturating_sub(fixed).max(12);
        self.columns
            .iter()
            .map(|c| match c.width() {
                0 => rest,
                w => w,
            })
            .collect()
    }
}

impl<'a> StatefulWidget for DeviceTable<'a> {
    type State = DeviceTableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };
        if inner.height == 0 {
            return;
        }

        let widths = self.widths(inner.width);

        let header: Vec<Span> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, &w)| Span::styled(fit(c.title(), w as usize + 1), Theme::header_style()))
            .collect();
        buf.set_line(inner.x, inner.y, &Line::from(header), inner.width);

        let body_height = inner.height.saturating_sub(1) as usize;
        if self.rows.is_empty() {
            if body_height > 0 {
                let line = Line::from(Span::styled(self.empty_text, Theme::dim_style()));
                buf.set_line(inner.x, inner.y + 1, &line, inner.width);
            }
            return;
        }

        state.selected = state.selected.min(self.rows.len() - 1);
        state.clamp_scroll(body_height);

        let visible = self
            .rows
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(body_height);

        for (i, (row_idx, row)) in visible.enumerate() {
            let y = inner.y + 1 + i as u16;
            let is_selected = row_idx == state.selected;

            let mut spans = Vec::with_capacity(self.columns.len());
            for (col, (value, &w)) in self.columns.iter().zip(row.values.iter().zip(&widths)) {
                let text = if *col == Column::Device {
                    let icon = match (row.has_children, row.open) {
                        (false, _) => "  ",
                        (true, true) => "▼ ",
                        (true, false) => "▶ ",
                    };
                    format!("{}{icon}{value}", "  ".repeat(row.depth))
                } else {
                    value.clone()
                };
                let style = if is_selected {
                    Theme::selected_style()
                } else if *col == Column::Device && row.has_children {
                    Theme::parent_style()
                } else if *col == Column::Device {
                    Theme::device_style()
                } else {
                    Theme::value_style()
                };
                spans.push(Span::styled(fit(&text, w as usize + 1), style));
            }

            buf.set_line(inner.x, y, &Line::from(spans), inner.width);
        }
    }
}

/// Plain-text rendering of `rows` for non-interactive output: a header line
/// and one line per row, columns padded to their widest cell.
pub fn plain_text(columns: &[Column], rows: &[TableRow]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .zip(&row.values)
                .map(|(col, value)| match col {
                    Column::Device => format!("{}{value}", "  ".repeat(row.depth)),
                    _ => value.clone(),
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.title().chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_text_line(&mut out, columns.iter().map(|c| c.title()), &widths);
    for row in &cells {
        push_text_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_text_line<'s>(out: &mut String, cells: impl Iterator<Item = &'s str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Pad or cut `text` to exactly `width` characters, keeping one trailing space
/// as column separator.
fn fit(text: &str, width: usize) -> String {
    let max = width.saturating_sub(1);
    let count = text.chars().count();
    if count > max {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}… ")
    } else {
        format!("{text:<width$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sid: u32, open: bool, children: Vec<TableItem>) -> TableItem {
        TableItem {
            id: RowId::Device(sid),
            values: vec![format!("dev{sid}")],
            open,
            children,
        }
    }

    #[test]
    fn closed_rows_hide_their_children() {
        let items = vec![
            item(1, true, vec![item(2, false, vec![item(3, true, vec![])]), item(4, true, vec![])]),
            item(5, true, vec![]),
        ];
        let rows = flatten(&items);
        let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![RowId::Device(1), RowId::Device(2), RowId::Device(4), RowId::Device(5)]
        );
        assert_eq!(rows[1].depth, 1);
        assert!(rows[1].has_children);
        assert!(!rows[2].has_children);
    }

    #[test]
    fn plain_text_indents_the_device_column() {
        let rows = flatten(&[TableItem {
            id: RowId::Device(1),
            values: vec!["sda".into(), "500.00 GiB".into()],
            open: true,
            children: vec![TableItem {
                id: RowId::Device(2),
                values: vec!["sda1".into(), "10.00 GiB".into()],
                open: true,
                children: vec![],
            }],
        }]);
        let text = plain_text(&[Column::Device, Column::Size], &rows);
        assert_eq!(
            text,
            "Device  Size\nsda     500.00 GiB\n  sda1  10.00 GiB\n"
        );
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("abc", 6), "abc   ");
        assert_eq!(fit("abcdefgh", 6), "abcd… ");
    }

    #[test]
    fn scroll_follows_the_selection() {
        let mut state = DeviceTableState {
            selected: 10,
            offset: 0,
        };
        state.clamp_scroll(4);
        assert_eq!(state.offset, 7);

        state.selected = 2;
        state.clamp_scroll(4);
        assert_eq!(state.offset, 2);
    }
}
