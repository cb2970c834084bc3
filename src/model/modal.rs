//! Modal stack for managing overlays

use super::events::RowRef;

/// Represents a modal overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Help dialog showing all keyboard shortcuts
    Help { scroll_offset: usize },
    /// Detail view opened by a drill-down
    RowDetail {
        row: RowRef,
        depth: usize,
        scroll_offset: usize,
    },
    /// Event log list and detail view
    EventLog { selected_index: usize },
}

/// A stack of modal overlays
///
/// Modals are rendered from bottom to top, with only the top modal
/// receiving input events.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    /// Get a reference to the top modal without removing it
    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::row::RowPath;

    fn detail() -> Modal {
        Modal::RowDetail {
            row: RowRef {
                path: RowPath(vec![0, 2]),
                id: "1-3".to_string(),
            },
            depth: 1,
            scroll_offset: 0,
        }
    }

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::QuitConfirm);
        stack.push(detail());

        assert_eq!(stack.pop(), Some(detail()));
        assert_eq!(stack.pop(), Some(Modal::QuitConfirm));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_modal_stack_top_mut() {
        let mut stack = ModalStack::new();
        stack.push(Modal::EventLog { selected_index: 0 });

        if let Some(Modal::EventLog { selected_index }) = stack.top_mut() {
            *selected_index = 2;
        }

        assert_eq!(stack.top(), Some(&Modal::EventLog { selected_index: 2 }));
    }
}
