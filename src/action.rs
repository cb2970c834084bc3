//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::events::{ClickTarget, TableEvent};
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for time-based updates
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move the cursor to the next visible row
    NextItem,
    /// Move the cursor to the previous visible row
    PrevItem,
    /// Jump to the first visible row
    FirstItem,
    /// Jump to the last visible row
    LastItem,
    /// Switch to the next dataset tab
    NextTab,
    /// Switch to the previous dataset tab
    PrevTab,

    // ─────────────────────────────────────────────────────────────────────────
    // Table
    // ─────────────────────────────────────────────────────────────────────────
    /// Activate a region of a visible row
    Activate { index: usize, target: ClickTarget },
    /// Expand the row under the cursor if it is collapsed
    ExpandRow,
    /// Collapse the row under the cursor, or move to its parent
    CollapseRow,
    /// Sort by the column at this position
    SortColumn(usize),
    NextPage,
    PrevPage,
    GoToPage(usize),
    /// An event emitted by the table
    Table(TableEvent),

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    /// Scroll dialog content up one line
    ScrollUp,
    /// Scroll dialog content down one line
    ScrollDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Open the event log overlay
    OpenEventLog,
    /// Close the current modal
    CloseModal,
    /// Navigate up in modal
    ModalUp,
    /// Navigate down in modal
    ModalDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────
    /// Enter search mode
    EnterSearchMode,
    /// Exit search mode, keeping the term
    ExitSearchMode,
    /// Add character to search term
    SearchInput(char),
    /// Remove last character from search term
    SearchBackspace,
    /// Exit search mode and clear the term
    ClearSearch,

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────
    /// Export the current view to CSV
    ExportCsv,
    /// Reload every dataset from disk
    ReloadData,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::FirstItem => write!(f, "FirstItem"),
            Action::LastItem => write!(f, "LastItem"),
            Action::NextTab => write!(f, "NextTab"),
            Action::PrevTab => write!(f, "PrevTab"),
            Action::Activate { index, target } => write!(f, "Activate({}, {:?})", index, target),
            Action::ExpandRow => write!(f, "ExpandRow"),
            Action::CollapseRow => write!(f, "CollapseRow"),
            Action::SortColumn(i) => write!(f, "SortColumn({})", i),
            Action::NextPage => write!(f, "NextPage"),
            Action::PrevPage => write!(f, "PrevPage"),
            Action::GoToPage(page) => write!(f, "GoToPage({})", page),
            Action::Table(event) => write!(f, "Table({})", event),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenEventLog => write!(f, "OpenEventLog"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
            Action::EnterSearchMode => write!(f, "EnterSearchMode"),
            Action::ExitSearchMode => write!(f, "ExitSearchMode"),
            Action::SearchInput(c) => write!(f, "SearchInput('{}')", c),
            Action::SearchBackspace => write!(f, "SearchBackspace"),
            Action::ClearSearch => write!(f, "ClearSearch"),
            Action::ExportCsv => write!(f, "ExportCsv"),
            Action::ReloadData => write!(f, "ReloadData"),
        }
    }
}
