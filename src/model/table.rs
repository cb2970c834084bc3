//! Drill-through table - the memoized filter → sort → paginate → expand pipeline
//!
//! `DrillTable` owns the row forest, the column schema and the per-instance
//! view state. Derived data is cached in three layers:
//!
//! - filtered indices, keyed by (data version, search term)
//! - ordered indices, keyed by (filtered version, sort state)
//! - page window, keyed by (ordered version, current page)
//!
//! Expansion is applied on top of the page window at read time, so toggling a
//! row never re-runs any of the stages above.

use super::column::Column;
use super::events::{ClickTarget, RowRef, TableEvent};
use super::expansion::{flatten_all, flatten_visible, ExpansionSet, VisibleRow};
use super::filter::filter_rows;
use super::pagination::Pagination;
use super::row::{Row, RowForest};
use super::sort::{sort_rows, SortState};
use crate::error::TableError;
use log::debug;
use std::collections::HashSet;

/// Default action buttons
pub const DEFAULT_ACTIONS: [&str; 3] = ["view", "edit", "delete"];

/// Caller-supplied rendering options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Show expand affordances on rows with children
    pub expandable: bool,
    pub show_actions: bool,
    /// Action names accepted from `ClickTarget::Action`
    pub actions: Vec<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            expandable: true,
            show_actions: false,
            actions: DEFAULT_ACTIONS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// View state of one table instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableState {
    pub search: String,
    pub sort: SortState,
    pub pagination: Pagination,
    pub expansion: ExpansionSet,
}

/// How many times each pipeline stage actually ran
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub filter_runs: usize,
    pub sort_runs: usize,
    pub page_runs: usize,
}

#[derive(Debug, Clone)]
struct Cached<K> {
    key: K,
    version: u64,
    indices: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct DrillTable {
    columns: Vec<Column>,
    forest: RowForest,
    options: TableOptions,
    state: TableState,

    data_version: u64,
    next_version: u64,
    filtered: Option<Cached<(u64, String)>>,
    ordered: Option<Cached<(u64, SortState)>>,
    window: Option<Cached<(u64, usize)>>,
    stats: PipelineStats,
}

impl DrillTable {
    /// Build a table, rejecting duplicate column keys
    pub fn new(
        columns: Vec<Column>,
        forest: RowForest,
        options: TableOptions,
    ) -> Result<Self, TableError> {
        let mut keys = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !keys.insert(column.key.as_str()) {
                return Err(TableError::DuplicateColumn {
                    key: column.key.clone(),
                });
            }
        }

        Ok(Self {
            columns,
            forest,
            options,
            state: TableState::default(),
            data_version: 0,
            next_version: 1,
            filtered: None,
            ordered: None,
            window: None,
            stats: PipelineStats::default(),
        })
    }

    /// Start from a caller-supplied state; the page is clamped to the data
    pub fn with_state(mut self, state: TableState) -> Self {
        let page = state.pagination.current_page;
        self.state = state;
        self.set_page(page);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn forest(&self) -> &RowForest {
        &self.forest
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn row(&self, visible: &VisibleRow) -> Option<&Row> {
        self.forest.get(&visible.path)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State changes
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the row data. Expansion is kept; the page is clamped.
    pub fn set_rows(&mut self, forest: RowForest) {
        self.forest = forest;
        self.data_version = self.bump();
        let page = self.state.pagination.current_page;
        self.set_page(page);
    }

    /// Change the search term. Returns false when the term is unchanged.
    pub fn set_search(&mut self, term: &str) -> bool {
        if self.state.search == term {
            return false;
        }
        self.state.search = term.to_string();
        self.state.pagination.reset();
        true
    }

    /// Header activation on `column_key`. Non-sortable or unknown columns are
    /// ignored and return false.
    pub fn toggle_sort(&mut self, column_key: &str) -> bool {
        if !self.column(column_key).is_some_and(|c| c.sortable) {
            return false;
        }
        self.state.sort.toggle(column_key);
        self.state.pagination.reset();
        true
    }

    /// Jump to `page`, clamped to `[1, max(1, page_count)]`
    pub fn set_page(&mut self, page: usize) {
        let len = self.filtered_len();
        self.state.pagination.set_page(page, len);
    }

    pub fn next_page(&mut self) {
        let page = self.state.pagination.current_page.saturating_add(1);
        self.set_page(page);
    }

    pub fn prev_page(&mut self) {
        let page = self.state.pagination.current_page.saturating_sub(1);
        self.set_page(page);
    }

    /// Flip the expansion of `id`. Returns the new state.
    pub fn toggle_expand(&mut self, id: &str) -> bool {
        self.state.expansion.toggle(id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derived views
    // ─────────────────────────────────────────────────────────────────────────

    /// Number of top-level rows passing the search
    pub fn filtered_len(&mut self) -> usize {
        self.ensure_filtered();
        self.filtered.as_ref().map_or(0, |c| c.indices.len())
    }

    /// Top-level indices on the current page
    pub fn page_window(&mut self) -> &[usize] {
        self.ensure_window();
        self.window.as_ref().map_or(&[][..], |c| c.indices.as_slice())
    }

    /// Rendered lines for the current page, expansion applied
    pub fn visible_rows(&mut self) -> Vec<VisibleRow> {
        self.ensure_window();
        let window = self.window.as_ref().map_or(&[][..], |c| c.indices.as_slice());
        flatten_visible(
            &self.forest,
            window,
            &self.state.expansion,
            self.options.expandable,
        )
    }

    /// Every filtered and sorted row with its complete subtree, across all pages
    pub fn all_rows_expanded(&mut self) -> Vec<VisibleRow> {
        self.ensure_ordered();
        let ordered = self.ordered.as_ref().map_or(&[][..], |c| c.indices.as_slice());
        flatten_all(&self.forest, ordered)
    }

    pub fn page_count(&mut self) -> usize {
        let len = self.filtered_len();
        self.state.pagination.page_count(len)
    }

    pub fn range_label(&mut self) -> String {
        let len = self.filtered_len();
        self.state.pagination.range_label(len)
    }

    pub fn page_numbers(&mut self) -> Vec<usize> {
        let len = self.filtered_len();
        self.state.pagination.page_numbers(len)
    }

    pub fn has_next_page(&mut self) -> bool {
        let len = self.filtered_len();
        self.state.pagination.has_next(len)
    }

    /// True when there is nothing to show: no rows, or no rows matching the search
    pub fn is_empty_state(&mut self) -> bool {
        self.filtered_len() == 0
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Activation
    // ─────────────────────────────────────────────────────────────────────────

    /// Route a click on visible row `visible_index`.
    ///
    /// Each activation yields at most one event; interactive regions (expand
    /// glyph, drillable cell, action button) never also produce a `RowClick`.
    pub fn activate(&mut self, visible_index: usize, target: ClickTarget) -> Option<TableEvent> {
        let visible = self.visible_rows().into_iter().nth(visible_index)?;
        let id = self.forest.get(&visible.path)?.id.clone();

        let event = match target {
            ClickTarget::Expand => {
                if visible.has_children {
                    let expanded = self.toggle_expand(&id);
                    debug!("row {} expanded: {}", id, expanded);
                }
                return None;
            }
            ClickTarget::Drill { column } => {
                if !self.column(&column).is_some_and(|c| c.drillable) {
                    return None;
                }
                TableEvent::DrillDown {
                    row: RowRef {
                        path: visible.path,
                        id,
                    },
                    depth: visible.depth,
                }
            }
            ClickTarget::Action(action) => {
                if !self.options.show_actions || !self.options.actions.contains(&action) {
                    return None;
                }
                TableEvent::RowAction {
                    action,
                    row: RowRef {
                        path: visible.path,
                        id,
                    },
                }
            }
            ClickTarget::Row => TableEvent::RowClick {
                row: RowRef {
                    path: visible.path,
                    id,
                },
            },
        };

        debug!("emit {}", event);
        Some(event)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Memoization
    // ─────────────────────────────────────────────────────────────────────────

    fn bump(&mut self) -> u64 {
        let version = self.next_version;
        self.next_version += 1;
        version
    }

    fn ensure_filtered(&mut self) {
        let key = (self.data_version, self.state.search.clone());
        if self.filtered.as_ref().is_some_and(|c| c.key == key) {
            return;
        }

        let indices = filter_rows(self.forest.rows(), &self.state.search);
        self.stats.filter_runs += 1;
        debug!(
            "filter {:?}: {} of {} rows",
            self.state.search,
            indices.len(),
            self.forest.len()
        );

        let version = self.bump();
        self.filtered = Some(Cached {
            key,
            version,
            indices,
        });
    }

    fn ensure_ordered(&mut self) {
        self.ensure_filtered();
        let Some(filtered) = self.filtered.as_ref() else {
            return;
        };

        let key = (filtered.version, self.state.sort.clone());
        if self.ordered.as_ref().is_some_and(|c| c.key == key) {
            return;
        }

        let mut indices = filtered.indices.clone();
        sort_rows(self.forest.rows(), &mut indices, &self.state.sort);
        self.stats.sort_runs += 1;
        debug!("sort {:?}: {} rows", self.state.sort, indices.len());

        let version = self.bump();
        self.ordered = Some(Cached {
            key,
            version,
            indices,
        });
    }

    fn ensure_window(&mut self) {
        self.ensure_ordered();
        let Some(ordered) = self.ordered.as_ref() else {
            return;
        };

        let page = self.state.pagination.current_page;
        let key = (ordered.version, page);
        if self.window.as_ref().is_some_and(|c| c.key == key) {
            return;
        }

        let range = self.state.pagination.window(ordered.indices.len());
        let indices = ordered.indices[range].to_vec();
        self.stats.page_runs += 1;

        let version = self.bump();
        self.window = Some(Cached {
            key,
            version,
            indices,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::column::ColumnType;
    use crate::model::value::CellValue;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name").sortable().drillable(),
            Column::new("revenue", "Revenue")
                .sortable()
                .with_type(ColumnType::Currency),
            Column::new("status", "Status"),
        ]
    }

    fn row(id: &str, revenue: f64) -> Row {
        Row::leaf(
            id,
            [
                ("name", CellValue::text(id)),
                ("revenue", CellValue::Currency(revenue)),
                ("status", CellValue::text("Active")),
            ],
        )
    }

    fn abc_table() -> DrillTable {
        let forest = RowForest::new(vec![
            row("A", 3.0).with_children(vec![row("A1", 1.0), row("A2", 2.0)]),
            row("B", 2.0),
            row("C", 1.0),
        ])
        .unwrap();
        DrillTable::new(columns(), forest, TableOptions::default()).unwrap()
    }

    fn many_rows(n: usize) -> DrillTable {
        let rows = (0..n)
            .map(|i| {
                let r = row(&format!("r{:02}", i), i as f64);
                if i == 12 {
                    r.with_children(vec![row("child", 0.0)])
                } else {
                    r
                }
            })
            .collect();
        let forest = RowForest::new(rows).unwrap();
        DrillTable::new(columns(), forest, TableOptions::default()).unwrap()
    }

    fn visible_ids(table: &mut DrillTable) -> Vec<(String, usize)> {
        table
            .visible_rows()
            .iter()
            .map(|v| (table.row(v).unwrap().id.clone(), v.depth))
            .collect()
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let cols = vec![Column::new("name", "Name"), Column::new("name", "Again")];
        let err = DrillTable::new(cols, RowForest::empty(), TableOptions::default()).unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn { key } if key == "name"));
    }

    #[test]
    fn test_expand_scenario() {
        let mut table = abc_table();
        assert_eq!(
            visible_ids(&mut table),
            vec![("A".into(), 0), ("B".into(), 0), ("C".into(), 0)]
        );

        assert_eq!(table.activate(0, ClickTarget::Expand), None);
        assert_eq!(
            visible_ids(&mut table),
            vec![
                ("A".into(), 0),
                ("A1".into(), 1),
                ("A2".into(), 1),
                ("B".into(), 0),
                ("C".into(), 0)
            ]
        );
        assert_eq!(table.page_count(), 1);
    }

    #[test]
    fn test_children_keep_author_order_under_sort() {
        let mut table = abc_table();
        table.toggle_expand("A");
        table.toggle_sort("revenue");
        table.toggle_sort("revenue");

        // Desc by revenue: A(3) B(2) C(1); A's children stay A1, A2
        assert_eq!(
            visible_ids(&mut table),
            vec![
                ("A".into(), 0),
                ("A1".into(), 1),
                ("A2".into(), 1),
                ("B".into(), 0),
                ("C".into(), 0)
            ]
        );
    }

    #[test]
    fn test_expansion_independent_of_pagination() {
        let mut table = many_rows(25);
        table.set_page(2);
        assert_eq!(table.page_window().len(), 10);

        table.toggle_expand("r12");
        let visible = table.visible_rows();
        // the page still holds 10 top-level rows, plus one child line
        assert_eq!(visible.len(), 11);
        assert_eq!(visible.iter().filter(|v| v.depth == 0).count(), 10);
        assert_eq!(table.page_count(), 3);
        assert_eq!(table.range_label(), "Showing 11 to 20 of 25 entries");
    }

    #[test]
    fn test_memoization() {
        let mut table = many_rows(25);
        table.visible_rows();
        assert_eq!(
            table.stats(),
            PipelineStats {
                filter_runs: 1,
                sort_runs: 1,
                page_runs: 1
            }
        );

        // expansion re-runs nothing
        table.toggle_expand("r03");
        table.visible_rows();
        table.visible_rows();
        assert_eq!(table.stats().page_runs, 1);

        // paging re-runs only the window
        table.next_page();
        table.visible_rows();
        let stats = table.stats();
        assert_eq!((stats.filter_runs, stats.sort_runs, stats.page_runs), (1, 1, 2));

        // sorting keeps the filter result
        table.toggle_sort("name");
        table.visible_rows();
        let stats = table.stats();
        assert_eq!((stats.filter_runs, stats.sort_runs, stats.page_runs), (1, 2, 3));

        // searching re-runs everything
        table.set_search("r1");
        table.visible_rows();
        let stats = table.stats();
        assert_eq!((stats.filter_runs, stats.sort_runs, stats.page_runs), (2, 3, 4));

        // unchanged search is a no-op
        assert!(!table.set_search("r1"));
        table.visible_rows();
        assert_eq!(table.stats(), stats);
    }

    #[test]
    fn test_search_and_sort_reset_page() {
        let mut table = many_rows(25);
        table.set_page(3);
        assert_eq!(table.state().pagination.current_page, 3);

        table.toggle_sort("revenue");
        assert_eq!(table.state().pagination.current_page, 1);

        table.set_page(2);
        table.set_search("r");
        assert_eq!(table.state().pagination.current_page, 1);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut table = many_rows(25);
        table.set_page(99);
        assert_eq!(table.state().pagination.current_page, 3);
        table.next_page();
        assert_eq!(table.state().pagination.current_page, 3);
        table.set_page(0);
        assert_eq!(table.state().pagination.current_page, 1);
        table.prev_page();
        assert_eq!(table.state().pagination.current_page, 1);
    }

    #[test]
    fn test_non_sortable_column_ignored() {
        let mut table = abc_table();
        assert!(!table.toggle_sort("status"));
        assert!(!table.toggle_sort("missing"));
        assert_eq!(table.state().sort, SortState::default());
    }

    #[test]
    fn test_search_scenario() {
        let forest = RowForest::new(vec![
            Row::leaf("1", [("name", "MegaMart Chain")]),
            Row::leaf("2", [("name", "QuickShop Express")]),
        ])
        .unwrap();
        let mut table =
            DrillTable::new(vec![Column::new("name", "Name")], forest, TableOptions::default())
                .unwrap();

        table.set_search("megamart");
        assert_eq!(visible_ids(&mut table), vec![("1".into(), 0)]);
        assert!(!table.is_empty_state());

        table.set_search("zzz");
        assert!(table.visible_rows().is_empty());
        assert!(table.is_empty_state());
        assert_eq!(table.page_count(), 0);
    }

    #[test]
    fn test_empty_forest_is_empty_state() {
        let mut table =
            DrillTable::new(columns(), RowForest::empty(), TableOptions::default()).unwrap();
        assert!(table.is_empty_state());
        assert_eq!(table.range_label(), "Showing 0 of 0 entries");
    }

    #[test]
    fn test_activate_routing() {
        let mut table = abc_table();
        table.toggle_expand("A");

        let drill = table.activate(1, ClickTarget::Drill { column: "name".into() });
        assert_eq!(
            drill,
            Some(TableEvent::DrillDown {
                row: RowRef {
                    path: crate::model::row::RowPath(vec![0, 0]),
                    id: "A1".into()
                },
                depth: 1
            })
        );

        // non-drillable column produces nothing, not a row click
        assert_eq!(table.activate(1, ClickTarget::Drill { column: "status".into() }), None);

        let click = table.activate(3, ClickTarget::Row);
        assert!(matches!(click, Some(TableEvent::RowClick { row }) if row.id == "B"));

        // out of range
        assert_eq!(table.activate(9, ClickTarget::Row), None);
    }

    #[test]
    fn test_actions_require_show_actions() {
        let mut table = abc_table();
        assert_eq!(table.activate(0, ClickTarget::Action("view".into())), None);

        let options = TableOptions {
            show_actions: true,
            ..TableOptions::default()
        };
        let mut table = DrillTable::new(columns(), table.forest().clone(), options).unwrap();
        let event = table.activate(2, ClickTarget::Action("delete".into()));
        assert!(matches!(
            event,
            Some(TableEvent::RowAction { action, row }) if action == "delete" && row.id == "C"
        ));
        assert_eq!(table.activate(2, ClickTarget::Action("archive".into())), None);
    }

    #[test]
    fn test_expand_on_leaf_is_noop() {
        let mut table = abc_table();
        assert_eq!(table.activate(1, ClickTarget::Expand), None);
        assert!(table.state().expansion.is_empty());
    }

    #[test]
    fn test_with_state_clamps_page() {
        let mut state = TableState::default();
        state.pagination.current_page = 7;
        state.search = "r0".into();
        let table = many_rows(25).with_state(state);
        assert_eq!(table.state().pagination.current_page, 1);
        assert_eq!(table.state().search, "r0");
    }

    #[test]
    fn test_set_rows_invalidates_cache() {
        let mut table = many_rows(25);
        table.set_page(3);
        assert_eq!(table.filtered_len(), 25);

        table.set_rows(RowForest::new(vec![row("x", 1.0)]).unwrap());
        assert_eq!(table.filtered_len(), 1);
        assert_eq!(table.state().pagination.current_page, 1);
    }

    #[test]
    fn test_all_rows_expanded_spans_pages() {
        let mut table = many_rows(25);
        table.set_search("r1");
        // r10..r19, with r12's child
        assert_eq!(table.all_rows_expanded().len(), 11);
    }
}
