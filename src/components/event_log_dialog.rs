//! Event log dialog component
//!
//! Lists the drill-down, row click and row action events emitted this
//! session, newest first, with details for the selected entry.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::overlay_area;
use crate::model::event_log::EventLogEntry;
use crate::model::events::TableEvent;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

/// Event log dialog
#[derive(Default)]
pub struct EventLogDialog {
    pub selected_index: usize,
}

impl Component for EventLogDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ModalUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ModalDown),
            KeyCode::Esc | KeyCode::Char('L') | KeyCode::Char('q') => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ModalUp => self.selected_index = self.selected_index.saturating_sub(1),
            Action::ModalDown => self.selected_index += 1,
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the log entries, see draw_with_entries
        Ok(())
    }
}

impl EventLogDialog {
    pub fn draw_with_entries(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        entries: &[EventLogEntry],
    ) -> Result<()> {
        let dialog_area = overlay_area(area, 2);
        frame.render_widget(Clear, dialog_area);

        let title_style = Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD);

        if entries.is_empty() {
            let paragraph = Paragraph::new(
                "No events yet. Drill into a row, open one with Enter, or use a row action.",
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Event Log ")
                    .title_style(title_style),
            );
            frame.render_widget(paragraph, dialog_area);
            return Ok(());
        }

        self.selected_index = self.selected_index.min(entries.len() - 1);

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(dialog_area);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(main_chunks[0]);

        let items: Vec<ListItem> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if i == self.selected_index {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };

                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", entry.icon()),
                        Style::default().fg(event_color(&entry.event)),
                    ),
                    Span::styled(
                        format!("{} ", entry.formatted_time()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(entry.summary(), style),
                ]))
                .style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Events ({}) ", entries.len()))
                .title_style(title_style),
        );
        frame.render_widget(list, content_chunks[0]);

        if let Some(entry) = entries.get(self.selected_index) {
            let detail = Paragraph::new(entry_detail(entry)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Details ")
                    .title_style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
            );
            frame.render_widget(detail, content_chunks[1]);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(
                " Esc/L ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Close  "),
            Span::styled(
                " ↑/↓ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Select"),
        ]))
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, main_chunks[1]);

        Ok(())
    }
}

fn event_color(event: &TableEvent) -> Color {
    match event {
        TableEvent::DrillDown { .. } => Color::Cyan,
        TableEvent::RowClick { .. } => Color::White,
        TableEvent::RowAction { action, .. } if action == "delete" => Color::Red,
        TableEvent::RowAction { .. } => Color::Green,
    }
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<8}", label),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

fn entry_detail(entry: &EventLogEntry) -> Vec<Line<'static>> {
    let row = entry.event.row();
    let mut lines = vec![
        field("Time", entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
        field("View", entry.view.name().to_string()),
        field("Event", entry.event.kind().to_string()),
        Line::from(""),
        field("Row", entry.row_label.clone()),
        field("Id", row.id.clone()),
        field("Path", row.path.to_string()),
    ];

    match &entry.event {
        TableEvent::DrillDown { depth, .. } => {
            lines.push(field("Depth", depth.to_string()));
        }
        TableEvent::RowAction { action, .. } => {
            lines.push(field("Action", action.clone()));
        }
        TableEvent::RowClick { .. } => {}
    }

    lines
}
