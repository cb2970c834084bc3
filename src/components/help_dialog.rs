//! Help dialog component
//!
//! Lists every keyboard and mouse binding of the table browser.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::overlay_area;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
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

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = overlay_area(area, 4);
        frame.render_widget(Clear, dialog_area);

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        let max_scroll = total.saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(max_scroll).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
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

fn add_section(lines: &mut Vec<Line<'static>>, title: &str) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  {} ", title),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("  {}", "─".repeat(title.chars().count() + 2)),
        Style::default().fg(Color::DarkGray),
    )));
}

fn add_shortcut(lines: &mut Vec<Line<'static>>, key: &str, description: &str) {
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {:14}", key),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(description.to_string(), Style::default().fg(Color::White)),
    ]));
}

/// Build the help content with all keyboard shortcuts
fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    add_section(&mut lines, "Navigation");
    add_shortcut(&mut lines, "j / ↓", "Next row");
    add_shortcut(&mut lines, "k / ↑", "Previous row");
    add_shortcut(&mut lines, "g / G", "First / last row");
    add_shortcut(&mut lines, "Tab", "Next dataset");
    add_shortcut(&mut lines, "Shift+Tab", "Previous dataset");

    add_section(&mut lines, "Hierarchy");
    add_shortcut(&mut lines, "Space", "Toggle the row's children");
    add_shortcut(&mut lines, "→ / l", "Expand row");
    add_shortcut(&mut lines, "← / h", "Collapse row, or go to parent");

    add_section(&mut lines, "Row Events");
    add_shortcut(&mut lines, "Enter", "Open row (row click)");
    add_shortcut(&mut lines, "d", "Drill down into the row");
    add_shortcut(&mut lines, "v / e / x", "View / edit / delete action");

    add_section(&mut lines, "Sorting & Paging");
    add_shortcut(&mut lines, "1-9", "Sort by column, again to reverse");
    add_shortcut(&mut lines, "] / PgDn", "Next page");
    add_shortcut(&mut lines, "[ / PgUp", "Previous page");

    add_section(&mut lines, "Search");
    add_shortcut(&mut lines, "/", "Filter rows");
    add_shortcut(&mut lines, "Enter", "Keep filter, leave search");
    add_shortcut(&mut lines, "Esc", "Clear filter");

    add_section(&mut lines, "Mouse");
    add_shortcut(&mut lines, "Header", "Sort by that column");
    add_shortcut(&mut lines, "▶ / ▼", "Expand or collapse");
    add_shortcut(&mut lines, "Underlined", "Drill down");
    add_shortcut(&mut lines, "[action]", "Row action");
    add_shortcut(&mut lines, "Page buttons", "Change page");

    add_section(&mut lines, "Data");
    add_shortcut(&mut lines, "E", "Export view to CSV");
    add_shortcut(&mut lines, "R", "Reload datasets");
    add_shortcut(&mut lines, "L", "Event log");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit / Close dialog");

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_table_bindings() {
        let text: Vec<String> = build_help_content()
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text.iter().any(|l| l.contains("Drill down into the row")));
        assert!(text.iter().any(|l| l.contains("Export view to CSV")));
    }

    #[test]
    fn test_scroll_never_underflows() {
        let mut dialog = HelpDialog::default();
        dialog.update(Action::ScrollUp).unwrap();
        assert_eq!(dialog.scroll_offset, 0);
        dialog.update(Action::ScrollDown).unwrap();
        assert_eq!(dialog.scroll_offset, 1);
    }
}
