//! Event emitter - the outbound contract of the table
//!
//! Activating a visible row produces at most one `TableEvent`. Events carry a
//! `RowRef` rather than a borrowed row so callers can queue them; `dispatch`
//! resolves the reference back into the forest for callback-style handlers.

use super::row::{Row, RowForest, RowPath};
use std::fmt;

/// Stable reference to a row in the forest
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowRef {
    pub path: RowPath,
    pub id: String,
}

/// Events emitted by the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// A drillable cell was activated
    DrillDown { row: RowRef, depth: usize },
    /// The row body was activated
    RowClick { row: RowRef },
    /// One of the caller-defined action buttons was activated
    RowAction { action: String, row: RowRef },
}

impl TableEvent {
    pub fn row(&self) -> &RowRef {
        match self {
            TableEvent::DrillDown { row, .. }
            | TableEvent::RowClick { row }
            | TableEvent::RowAction { row, .. } => row,
        }
    }

    /// Short name used in the event log
    pub fn kind(&self) -> &'static str {
        match self {
            TableEvent::DrillDown { .. } => "drill-down",
            TableEvent::RowClick { .. } => "row-click",
            TableEvent::RowAction { .. } => "row-action",
        }
    }

    /// Deliver the event to `handler` with the referenced row resolved.
    ///
    /// Returns false when the row no longer exists in `forest`.
    pub fn dispatch(&self, forest: &RowForest, handler: &mut dyn TableEventHandler) -> bool {
        let Some(row) = forest.get(&self.row().path) else {
            return false;
        };

        match self {
            TableEvent::DrillDown { depth, .. } => handler.on_drill_down(row, *depth),
            TableEvent::RowClick { .. } => handler.on_row_click(row),
            TableEvent::RowAction { action, .. } => handler.on_row_action(action, row),
        }
        true
    }
}

impl fmt::Display for TableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableEvent::DrillDown { row, depth } => {
                write!(f, "DrillDown({}, depth {})", row.id, depth)
            }
            TableEvent::RowClick { row } => write!(f, "RowClick({})", row.id),
            TableEvent::RowAction { action, row } => {
                write!(f, "RowAction({}, {})", action, row.id)
            }
        }
    }
}

/// Interactive region of a visible row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// The expand/collapse glyph
    Expand,
    /// A cell of the named column
    Drill { column: String },
    /// An action button
    Action(String),
    /// Anywhere else on the row
    Row,
}

/// Callback-style consumer of table events. Every method defaults to a no-op.
pub trait TableEventHandler {
    fn on_drill_down(&mut self, row: &Row, depth: usize) {
        let _ = (row, depth);
    }

    fn on_row_click(&mut self, row: &Row) {
        let _ = row;
    }

    fn on_row_action(&mut self, action: &str, row: &Row) {
        let _ = (action, row);
    }
}
