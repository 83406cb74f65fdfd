//! Read-only description panel for the selected row.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::core::description::Section;

use super::theme::Theme;

pub struct DescriptionPanel<'a> {
    sections: &'a [Section],
    block: Option<Block<'a>>,
}

impl<'a> DescriptionPanel<'a> {
    pub fn new(sections: &'a [Section]) -> Self {
        Self {
            sections,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        if self.sections.is_empty() {
            return vec![Line::from(Span::styled("Nothing selected", Theme::dim_style()))];
        }
        let label_width = self
            .sections
            .iter()
            .flat_map(|s| s.items.iter())
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        let mut lines = Vec::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                lines.push(Line::raw(""));
            }
            lines.push(Line::from(Span::styled(section.title, Theme::section_style())));
            for (label, value) in &section.items {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {label:<label_width$}  "), Theme::label_style()),
                    Span::raw(value.as_str()),
                ]));
            }
        }
        lines
    }
}

impl<'a> Widget for DescriptionPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let mut paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_separated_and_labels_aligned() {
        let sections = vec![
            Section {
                title: "Device",
                items: vec![("Device", "/dev/sda1".into()), ("Size", "10.00 GiB".into())],
            },
            Section {
                title: "Filesystem",
                items: vec![("Type", "Ext4".into())],
            },
        ];
        let panel = DescriptionPanel::new(&sections);
        let lines: Vec<String> = panel.lines().iter().map(|l| l.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "Device",
                "  Device  /dev/sda1",
                "  Size    10.00 GiB",
                "",
                "Filesystem",
                "  Type    Ext4",
            ]
        );
    }
}
