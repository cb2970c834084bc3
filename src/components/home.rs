//! Home component - Main application screen
//!
//! Displays the dataset tabs, the active drill-through table, a status line
//! and the help bar. Owns one table component per view so each keeps its own
//! search, sort, page and expansion state while switching tabs.

use crate::action::Action;
use crate::component::Component;
use crate::components::{calculate_main_layout, DrillTableComponent};
use crate::model::format::FormatLocale;
use crate::model::ui::View;
use crate::services::dataset::Dataset;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Home Component
// ═══════════════════════════════════════════════════════════════════════════════

pub struct HomeComponent {
    /// Current active view
    pub active_view: View,

    /// One table per view, in `View::all()` order
    tables: Vec<DrillTableComponent>,
}

impl HomeComponent {
    /// Build from one dataset per view, in `View::all()` order
    pub fn new(datasets: Vec<Dataset>, locale: &FormatLocale, active_view: View) -> Self {
        let tables = datasets
            .into_iter()
            .map(|dataset| DrillTableComponent::new(dataset, locale.clone()))
            .collect();
        Self {
            active_view,
            tables,
        }
    }

    pub fn table(&self) -> Option<&DrillTableComponent> {
        self.tables.get(self.active_view.index())
    }

    pub fn table_mut(&mut self) -> Option<&mut DrillTableComponent> {
        self.tables.get_mut(self.active_view.index())
    }

    pub fn table_for(&mut self, view: View) -> Option<&mut DrillTableComponent> {
        self.tables.get_mut(view.index())
    }

    pub fn search_mode(&self) -> bool {
        self.table().is_some_and(|t| t.search_active)
    }

    pub fn next_view(&mut self) {
        self.leave_search();
        self.active_view = self.active_view.next();
    }

    pub fn previous_view(&mut self) {
        self.leave_search();
        self.active_view = self.active_view.prev();
    }

    fn leave_search(&mut self) {
        if let Some(table) = self.table_mut() {
            table.search_active = false;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for HomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),

            // Modals
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('L') => Some(Action::OpenEventLog),

            // Search
            KeyCode::Char('/') => Some(Action::EnterSearchMode),
            KeyCode::Esc if self.table().is_some_and(|t| !t.search_term().is_empty()) => {
                Some(Action::ClearSearch)
            }

            // Data
            KeyCode::Char('E') => Some(Action::ExportCsv),
            KeyCode::Char('R') => Some(Action::ReloadData),

            _ => match self.table_mut() {
                Some(table) => table.handle_key_event(key)?,
                None => None,
            },
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match self.table_mut() {
            Some(table) => table.handle_mouse_event(mouse),
            None => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextTab => {
                self.next_view();
                Ok(None)
            }
            Action::PrevTab => {
                self.previous_view();
                Ok(None)
            }
            other => match self.table_mut() {
                Some(table) => table.update(other),
                None => Ok(None),
            },
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.table_mut() {
            Some(table) => table.draw(frame, area),
            None => Ok(()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the home screen
pub struct HomeRenderContext<'a> {
    pub error: Option<&'a str>,
    pub status_message: Option<&'a str>,
    /// Events recorded so far
    pub event_count: usize,
}

/// Draw the home screen
pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    home: &mut HomeComponent,
    ctx: &HomeRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area);

    render_tabs(frame, layout.tabs, home);
    home.draw(frame, layout.table)?;
    render_status_bar(frame, layout.status, home, ctx);
    render_help_bar(frame, layout.help, home);

    Ok(())
}

fn render_tabs(frame: &mut Frame, area: Rect, home: &HomeComponent) {
    let views = View::all();
    let titles: Vec<&str> = views.iter().map(|v| v.name()).collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM))
        .select(home.active_view.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, home: &HomeComponent, ctx: &HomeRenderContext) {
    let mut spans = vec![];

    if let Some(table) = home.table() {
        spans.push(Span::styled(
            format!(" {} ", home.active_view.name()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            table.dataset().source.label(),
            Style::default().fg(Color::DarkGray),
        ));

        let search = table.search_term();
        if !search.is_empty() {
            spans.push(Span::styled(
                format!("  filter: {}", search),
                Style::default().fg(Color::Cyan),
            ));
        }
    }

    if ctx.event_count > 0 {
        spans.push(Span::styled(
            format!("  {} events", ctx.event_count),
            Style::default().fg(Color::Magenta),
        ));
    }

    // Error message replaces everything else
    if let Some(error) = ctx.error {
        spans.clear();
        spans.push(Span::styled(
            format!(" Error: {} ", error),
            Style::default().fg(Color::Red),
        ));
    }

    if let Some(status) = ctx.status_message {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn key_hint(key: &'static str, color: Color) -> Span<'static> {
    Span::styled(
        key,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn render_help_bar(frame: &mut Frame, area: Rect, home: &HomeComponent) {
    let help_spans = if home.search_mode() {
        vec![
            key_hint(" Esc ", Color::Yellow),
            Span::raw("Clear  "),
            key_hint(" Enter ", Color::Green),
            Span::raw("Keep filter  "),
            Span::styled(
                format!("Search: {}", home.table().map(|t| t.search_term()).unwrap_or("")),
                Style::default().fg(Color::Cyan),
            ),
        ]
    } else {
        vec![
            key_hint(" q ", Color::Yellow),
            Span::raw("Quit "),
            key_hint(" Space ", Color::Green),
            Span::raw("Expand "),
            key_hint(" d ", Color::Green),
            Span::raw("Drill "),
            key_hint(" Enter ", Color::Green),
            Span::raw("Open "),
            key_hint(" 1-9 ", Color::Cyan),
            Span::raw("Sort "),
            key_hint(" [ ] ", Color::Cyan),
            Span::raw("Page "),
            key_hint(" / ", Color::Cyan),
            Span::raw("Search "),
            key_hint(" L ", Color::Magenta),
            Span::raw("Events "),
            key_hint(" E ", Color::Blue),
            Span::raw("Export "),
            key_hint(" ? ", Color::White),
            Span::raw("Help"),
        ]
    };

    let paragraph = Paragraph::new(Line::from(help_spans))
        .alignment(ratatui::layout::Alignment::Left);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dataset::load_builtin;
    use crossterm::event::KeyModifiers;

    fn home() -> HomeComponent {
        let datasets = View::all()
            .iter()
            .map(|v| load_builtin(*v).unwrap())
            .collect();
        HomeComponent::new(datasets, &FormatLocale::default(), View::Customers)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_tab_switching_wraps() {
        let mut home = home();
        home.update(Action::PrevTab).unwrap();
        assert_eq!(home.active_view, View::Analytics);
        home.update(Action::NextTab).unwrap();
        assert_eq!(home.active_view, View::Customers);
    }

    #[test]
    fn test_views_keep_their_own_state() {
        let mut home = home();
        home.update(Action::SearchInput('a')).unwrap();
        home.update(Action::NextTab).unwrap();

        assert_eq!(home.table().unwrap().search_term(), "");
        home.update(Action::PrevTab).unwrap();
        assert_eq!(home.table().unwrap().search_term(), "a");
    }

    #[test]
    fn test_global_keys_take_priority() {
        let mut home = home();
        assert_eq!(
            home.handle_key_event(key(KeyCode::Char('q'))).unwrap(),
            Some(Action::OpenQuitDialog)
        );
        assert_eq!(
            home.handle_key_event(key(KeyCode::Char('E'))).unwrap(),
            Some(Action::ExportCsv)
        );
        // falls through to the table
        assert_eq!(
            home.handle_key_event(key(KeyCode::Char(']'))).unwrap(),
            Some(Action::NextPage)
        );
    }

    #[test]
    fn test_esc_clears_active_filter() {
        let mut home = home();
        assert_eq!(home.handle_key_event(key(KeyCode::Esc)).unwrap(), None);

        home.update(Action::SearchInput('x')).unwrap();
        assert_eq!(
            home.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::ClearSearch)
        );
    }
}
