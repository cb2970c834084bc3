//! In-session log of table events

use super::events::TableEvent;
use super::ui::View;
use chrono::{DateTime, Local};

/// Entries kept before the oldest are dropped
pub const MAX_ENTRIES: usize = 100;

/// A single emitted event
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub timestamp: DateTime<Local>,
    pub view: View,
    pub event: TableEvent,
    /// Display label of the row at the time of the event
    pub row_label: String,
}

impl EventLogEntry {
    pub fn icon(&self) -> &str {
        match self.event {
            TableEvent::DrillDown { .. } => "⤵",
            TableEvent::RowClick { .. } => "•",
            TableEvent::RowAction { .. } => "⚡",
        }
    }

    pub fn formatted_time(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }

    /// One-line description for the log list
    pub fn summary(&self) -> String {
        match &self.event {
            TableEvent::DrillDown { depth, .. } => {
                format!("drill into {} (level {})", self.row_label, depth)
            }
            TableEvent::RowClick { .. } => format!("open {}", self.row_label),
            TableEvent::RowAction { action, .. } => format!("{} {}", action, self.row_label),
        }
    }
}

/// Newest-first event list capped at `MAX_ENTRIES`
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<EventLogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, view: View, event: TableEvent, row_label: impl Into<String>) {
        let entry = EventLogEntry {
            timestamp: Local::now(),
            view,
            event,
            row_label: row_label.into(),
        };

        self.entries.insert(0, entry);
        if self.entries.len() > MAX_ENTRIES {
            self.entries.truncate(MAX_ENTRIES);
        }
    }

    pub fn entries(&self) -> &[EventLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::events::RowRef;
    use crate::model::row::RowPath;

    fn click(id: &str) -> TableEvent {
        TableEvent::RowClick {
            row: RowRef {
                path: RowPath::root(0),
                id: id.to_string(),
            },
        }
    }

    #[test]
    fn test_newest_first() {
        let mut log = EventLog::new();
        log.record(View::Customers, click("1"), "MegaMart Chain");
        log.record(View::Customers, click("2"), "QuickShop Express");

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].row_label, "QuickShop Express");
    }

    #[test]
    fn test_capped() {
        let mut log = EventLog::new();
        for i in 0..(MAX_ENTRIES + 20) {
            log.record(View::Products, click(&i.to_string()), format!("row {}", i));
        }

        assert_eq!(log.len(), MAX_ENTRIES);
        assert_eq!(log.entries()[0].row_label, format!("row {}", MAX_ENTRIES + 19));
    }

    #[test]
    fn test_summary() {
        let mut log = EventLog::new();
        log.record(
            View::Analytics,
            TableEvent::DrillDown {
                row: RowRef {
                    path: RowPath(vec![0, 1]),
                    id: "1-2".to_string(),
                },
                depth: 1,
            },
            "August 2024",
        );
        assert_eq!(log.entries()[0].summary(), "drill into August 2024 (level 1)");
    }
}
