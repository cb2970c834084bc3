//! Expansion controller - which rows show their children
//!
//! Expansion is tracked by row id. Because ids are only unique among
//! siblings, two rows in different subtrees that share an id expand together.

use super::row::{RowForest, RowPath};
use std::collections::HashSet;

/// Set of expanded row ids, scoped to one table instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet {
    expanded: HashSet<String>,
}

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the id if absent, remove it if present. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

/// One rendered line of the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub path: RowPath,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

/// Flatten the page window plus every expanded subtree into render order.
///
/// `window` holds top-level indices already filtered, sorted and paginated.
/// Each row is followed by its children (author order, depth + 1) when it is
/// expanded, recursively. Uses an explicit stack, so depth is not limited by
/// the call stack.
pub fn flatten_visible(
    forest: &RowForest,
    window: &[usize],
    expansion: &ExpansionSet,
    expandable: bool,
) -> Vec<VisibleRow> {
    flatten(forest, window, expandable, |id| expansion.is_expanded(id))
}

/// Flatten `window` with every subtree fully open, ignoring expansion state
pub fn flatten_all(forest: &RowForest, window: &[usize]) -> Vec<VisibleRow> {
    flatten(forest, window, true, |_| true)
}

fn flatten(
    forest: &RowForest,
    window: &[usize],
    expandable: bool,
    is_open: impl Fn(&str) -> bool,
) -> Vec<VisibleRow> {
    let mut visible = Vec::with_capacity(window.len());
    let mut stack: Vec<RowPath> = window.iter().rev().map(|&i| RowPath::root(i)).collect();

    while let Some(path) = stack.pop() {
        let Some(row) = forest.get(&path) else {
            continue;
        };

        let has_children = expandable && row.has_children();
        let expanded = has_children && is_open(&row.id);

        if expanded {
            for child_index in (0..row.children.len()).rev() {
                stack.push(path.child(child_index));
            }
        }

        visible.push(VisibleRow {
            depth: path.depth(),
            path,
            has_children,
            expanded,
        });
    }

    visible
}
