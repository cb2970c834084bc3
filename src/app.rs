//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! App coordinates between components and turns table events into modals,
//! status messages and event log entries.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_home_screen, EventLogDialog, HelpDialog, HomeComponent, HomeRenderContext, QuitDialog,
    RowDetailDialog,
};
use crate::config::Config;
use crate::model::event_log::EventLog;
use crate::model::events::{TableEvent, TableEventHandler};
use crate::model::modal::{Modal, ModalStack};
use crate::model::row::Row;
use crate::model::ui::View;
use crate::services::{self, Dataset};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use log::{info, warn};
use ratatui::{layout::Rect, Frame};
use std::time::{Duration, Instant};

/// How long a status message stays in the status bar
const STATUS_TTL: Duration = Duration::from_secs(5);

// ═══════════════════════════════════════════════════════════════════════════════
// Dataset Loading
// ═══════════════════════════════════════════════════════════════════════════════

/// Load one dataset per view. A view whose file is rejected falls back to its
/// built-in data; the rejection is returned as a message for the status bar.
fn load_datasets(config: &Config) -> Result<(Vec<Dataset>, Vec<String>)> {
    let data_dir = config.data_path();
    let mut datasets = Vec::new();
    let mut failures = Vec::new();

    for view in View::all() {
        let dataset = match services::load_dataset(view, data_dir.as_deref()) {
            Ok(dataset) => dataset,
            Err(e) => {
                failures.push(format!("{}: {}", view.name(), e));
                services::load_builtin(view)?
            }
        };
        datasets.push(dataset);
    }

    Ok((datasets, failures))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Event Responses
// ═══════════════════════════════════════════════════════════════════════════════

/// What the app does after a table event
#[derive(Debug, Clone, PartialEq, Eq)]
enum Response {
    /// Open the drill-down detail at this depth
    OpenDetail(usize),
    Status(String),
}

/// Handler that turns a dispatched event into a `Response`
struct EventResponder {
    label: String,
    response: Option<Response>,
}

impl TableEventHandler for EventResponder {
    fn on_drill_down(&mut self, _row: &Row, depth: usize) {
        self.response = Some(Response::OpenDetail(depth));
    }

    fn on_row_click(&mut self, row: &Row) {
        let children = if row.has_children() {
            format!(" ({} children)", row.children.len())
        } else {
            String::new()
        };
        self.response = Some(Response::Status(format!(
            "Selected {}{}",
            self.label, children
        )));
    }

    fn on_row_action(&mut self, action: &str, _row: &Row) {
        let message = match action {
            "view" => format!("Viewing {}", self.label),
            "edit" => format!("Editing {}", self.label),
            "delete" => format!("Delete requested for {}", self.label),
            other => format!("{}: {}", other, self.label),
        };
        self.response = Some(Response::Status(message));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    pub config: Config,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Events emitted by the tables this session
    pub event_log: EventLog,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Error message to display
    pub error: Option<String>,

    /// Status message to display
    pub status_message: Option<String>,
    status_since: Option<Instant>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub home: HomeComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
    pub event_log_dialog: EventLogDialog,
    pub row_detail_dialog: RowDetailDialog,
}

impl App {
    /// Create the app with every dataset loaded
    pub fn new(config: Config) -> Result<App> {
        let (datasets, failures) = load_datasets(&config)?;
        let home = HomeComponent::new(datasets, &config.locale, config.default_view);

        let error = (!failures.is_empty()).then(|| failures.join("; "));

        Ok(App {
            config,
            modals: ModalStack::new(),
            event_log: EventLog::new(),
            should_quit: false,
            error,
            status_message: None,
            status_since: None,
            home,
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
            event_log_dialog: EventLogDialog::default(),
            row_detail_dialog: RowDetailDialog::default(),
        })
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_since = Some(Instant::now());
    }

    /// Record a table event and act on it
    fn handle_table_event(&mut self, event: TableEvent) {
        let view = self.home.active_view;
        let Some(table) = self.home.table() else {
            return;
        };

        let mut responder = EventResponder {
            label: table.row_label(event.row()),
            response: None,
        };
        if !event.dispatch(table.dataset().table.forest(), &mut responder) {
            warn!("{} event for missing row {}", view.name(), event.row().id);
            self.error = Some(format!("Row {} is no longer in the dataset", event.row().id));
            return;
        }

        info!("{} {}", view.name(), event);
        self.event_log
            .record(view, event.clone(), responder.label.clone());

        match responder.response {
            Some(Response::OpenDetail(depth)) => {
                self.row_detail_dialog.scroll_offset = 0;
                self.modals.push(Modal::RowDetail {
                    row: event.row().clone(),
                    depth,
                    scroll_offset: 0,
                });
            }
            Some(Response::Status(message)) => self.set_status(message),
            None => {}
        }
    }

    fn export_current_view(&mut self) {
        let Some(dir) = Config::exports_dir() else {
            self.error = Some("Could not determine export directory".to_string());
            return;
        };
        let stem = self.home.active_view.file_stem().to_string();
        let Some(table) = self.home.table_mut() else {
            return;
        };

        let locale = table.locale().clone();
        match services::export_to_dir(&mut table.dataset_mut().table, &locale, &dir, &stem) {
            Ok(path) => self.set_status(format!("Exported to {}", path.display())),
            Err(e) => self.error = Some(format!("Export failed: {}", e)),
        }
    }

    /// Reload every dataset. A view whose file is rejected keeps its current data.
    fn reload_datasets(&mut self) {
        let data_dir = self.config.data_path();
        let mut failures = Vec::new();
        let mut reloaded = 0;

        for view in View::all() {
            match services::load_dataset(view, data_dir.as_deref()) {
                Ok(dataset) => {
                    if let Some(table) = self.home.table_for(view) {
                        table.replace_dataset(dataset);
                        reloaded += 1;
                    }
                }
                Err(e) => failures.push(format!("{}: {}", view.name(), e)),
            }
        }

        if failures.is_empty() {
            self.error = None;
            self.set_status(format!("Reloaded {} datasets", reloaded));
        } else {
            self.error = Some(failures.join("; "));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.home.init()?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        // Esc dismisses an error before anything else
        if self.error.is_some() && key.code == KeyCode::Esc && !self.home.search_mode() {
            self.error = None;
            return Ok(None);
        }

        if self.home.search_mode() {
            self.handle_search_key_event(key)
        } else {
            self.home.handle_key_event(key)
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if !self.modals.is_empty() {
            return Ok(None);
        }
        self.home.handle_mouse_event(mouse)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                if self.status_since.is_some_and(|since| since.elapsed() >= STATUS_TTL) {
                    self.status_message = None;
                    self.status_since = None;
                }
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Table Events
            // ─────────────────────────────────────────────────────────────────
            Action::Table(event) => self.handle_table_event(event),

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.event_count = self.event_log.len();
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help { scroll_offset: 0 });
            }
            Action::OpenEventLog => {
                self.event_log_dialog.selected_index = 0;
                self.modals.push(Modal::EventLog { selected_index: 0 });
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ModalUp | Action::ModalDown => {
                self.event_log_dialog.update(action)?;
                let last = self.event_log.len().saturating_sub(1);
                self.event_log_dialog.selected_index =
                    self.event_log_dialog.selected_index.min(last);
                if let Some(Modal::EventLog { selected_index }) = self.modals.top_mut() {
                    *selected_index = self.event_log_dialog.selected_index;
                }
            }
            Action::ScrollUp | Action::ScrollDown => match self.modals.top_mut() {
                Some(Modal::Help { scroll_offset }) => {
                    self.help_dialog.update(action)?;
                    *scroll_offset = self.help_dialog.scroll_offset;
                }
                Some(Modal::RowDetail { scroll_offset, .. }) => {
                    self.row_detail_dialog.update(action)?;
                    *scroll_offset = self.row_detail_dialog.scroll_offset;
                }
                _ => {}
            },

            // ─────────────────────────────────────────────────────────────────
            // Data
            // ─────────────────────────────────────────────────────────────────
            Action::ExportCsv => self.export_current_view(),
            Action::ReloadData => self.reload_datasets(),

            // ─────────────────────────────────────────────────────────────────
            // Navigation, table and search (delegate to HomeComponent)
            // ─────────────────────────────────────────────────────────────────
            other => return self.home.update(other),
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let ctx = HomeRenderContext {
            error: self.error.as_deref(),
            status_message: self.status_message.as_deref(),
            event_count: self.event_log.len(),
        };
        draw_home_screen(frame, area, &mut self.home, &ctx)?;

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help { .. } => self.help_dialog.handle_key_event(key),
            Modal::RowDetail { .. } => self.row_detail_dialog.handle_key_event(key),
            Modal::EventLog { .. } => self.event_log_dialog.handle_key_event(key),
        }
    }

    fn handle_search_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::ClearSearch),
            KeyCode::Enter => Some(Action::ExitSearchMode),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(c) => Some(Action::SearchInput(c)),
            _ => None,
        };
        Ok(action)
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::Help { .. } => self.help_dialog.draw(frame, area)?,
            Modal::RowDetail { row, depth, .. } => {
                if let Some(table) = self.home.table() {
                    self.row_detail_dialog.draw_with_row(
                        frame,
                        area,
                        &table.dataset().table,
                        table.locale(),
                        row,
                        *depth,
                    )?;
                }
            }
            Modal::EventLog { .. } => {
                self.event_log_dialog
                    .draw_with_entries(frame, area, self.event_log.entries())?;
            }
        }
        Ok(())
    }
}
