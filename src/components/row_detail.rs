//! Row detail dialog component
//!
//! Opened by a drill-down. Shows every field of the row, formatted by its
//! column where one exists, followed by a summary of its direct children.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::overlay_area;
use crate::model::column::Column;
use crate::model::events::RowRef;
use crate::model::format::{format_value, FormatLocale, NULL_DISPLAY};
use crate::model::row::Row;
use crate::model::table::DrillTable;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

#[derive(Default)]
pub struct RowDetailDialog {
    pub scroll_offset: usize,
}

impl Component for RowDetailDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ScrollDown => self.scroll_offset = self.scroll_offset.saturating_add(1),
            Action::ScrollUp => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the table, see draw_with_row
        Ok(())
    }
}

impl RowDetailDialog {
    pub fn draw_with_row(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        table: &DrillTable,
        locale: &FormatLocale,
        row_ref: &RowRef,
        depth: usize,
    ) -> Result<()> {
        let dialog_area = overlay_area(area, 3);
        frame.render_widget(Clear, dialog_area);

        let content = match table.forest().get(&row_ref.path) {
            Some(row) => detail_lines(row, table.columns(), locale, depth),
            None => vec![Line::from(Span::styled(
                format!("Row {} is no longer in the dataset", row_ref.id),
                Style::default().fg(Color::Red),
            ))],
        };

        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;
        let max_scroll = total.saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Drill-down: {} ", row_ref.id))
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

fn label_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn section(title: String) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Lines describing `row` and its direct children
fn detail_lines(
    row: &Row,
    columns: &[Column],
    locale: &FormatLocale,
    depth: usize,
) -> Vec<Line<'static>> {
    let label_width = columns
        .iter()
        .map(|c| c.label.chars().count())
        .chain(row.fields.keys().map(|k| k.chars().count()))
        .max()
        .unwrap_or(0)
        + 2;

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {:<label_width$}", "Id"), label_style()),
            Span::raw(row.id.clone()),
        ]),
        Line::from(vec![
            Span::styled(format!(" {:<label_width$}", "Level"), label_style()),
            Span::raw(depth.to_string()),
        ]),
        Line::from(""),
    ];

    for column in columns {
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<label_width$}", column.label), label_style()),
            Span::raw(format_value(row.get(&column.key), column.column_type, locale)),
        ]));
    }

    // Fields the schema does not show
    let extra: Vec<(&String, String)> = row
        .fields
        .iter()
        .filter(|(key, _)| !columns.iter().any(|c| &c.key == *key))
        .map(|(key, value)| (key, value.raw_text().unwrap_or_else(|| NULL_DISPLAY.to_string())))
        .collect();
    if !extra.is_empty() {
        lines.push(Line::from(""));
        lines.push(section(" Other fields".to_string()));
        for (key, value) in extra {
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {:<label_width$}", key),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(value),
            ]));
        }
    }

    if row.has_children() {
        lines.push(Line::from(""));
        lines.push(section(format!(" Children ({})", row.children.len())));
        for child in &row.children {
            let summary: Vec<String> = columns
                .iter()
                .map(|c| format_value(child.get(&c.key), c.column_type, locale))
                .collect();
            let marker = if child.has_children() { "▶" } else { "•" };
            lines.push(Line::from(vec![
                Span::styled(format!("  {} ", marker), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:<8} ", child.id),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(summary.join("  ")),
            ]));
        }
    }

    lines
}
