//! Drill-through table component
//!
//! Renders a `DrillTable` as styled lines: search box, header with sort
//! indicators, indented rows with expand glyphs, action buttons and the
//! pagination footer. The last render is kept as a hit map so mouse clicks
//! resolve to the same targets as keyboard commands.

use crate::action::Action;
use crate::component::Component;
use crate::model::column::{Column, ColumnType};
use crate::model::events::{ClickTarget, RowRef};
use crate::model::expansion::VisibleRow;
use crate::model::format::{format_value, FormatLocale};
use crate::services::dataset::Dataset;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use log::debug;
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use std::ops::Range;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a column may grow before its cells are truncated
const MAX_COLUMN_WIDTH: usize = 40;
const COLUMN_GAP: &str = " │ ";
/// Columns of indentation per tree level
const INDENT: usize = 2;

// ═══════════════════════════════════════════════════════════════════════════════
// Hit Map
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageTarget {
    Previous,
    Next,
    Page(usize),
}

/// A rendered table line
#[derive(Debug, Clone)]
struct LineHit {
    y: u16,
    index: usize,
    /// Horizontal extent of the expand glyph, for rows that have one
    glyph: Option<Range<u16>>,
}

/// Screen regions of the last render, in absolute terminal coordinates
#[derive(Debug, Clone, Default)]
struct HitMap {
    header_y: Option<u16>,
    /// Horizontal extent of each column, by position
    columns: Vec<Range<u16>>,
    rows: Vec<LineHit>,
    actions: Vec<(Range<u16>, String)>,
    footer_y: Option<u16>,
    pages: Vec<(Range<u16>, PageTarget)>,
}

impl HitMap {
    /// Resolve a click. The innermost interactive region wins, so a click on a
    /// glyph, button or drillable cell never also counts as a row click.
    fn hit_test(&self, x: u16, y: u16, columns: &[Column]) -> Option<Action> {
        if self.header_y == Some(y) {
            let position = self.columns.iter().position(|r| r.contains(&x))?;
            return Some(Action::SortColumn(position));
        }

        if self.footer_y == Some(y) {
            let (_, target) = self.pages.iter().find(|(r, _)| r.contains(&x))?;
            return Some(match target {
                PageTarget::Previous => Action::PrevPage,
                PageTarget::Next => Action::NextPage,
                PageTarget::Page(page) => Action::GoToPage(*page),
            });
        }

        let line = self.rows.iter().find(|r| r.y == y)?;

        let target = if line.glyph.as_ref().is_some_and(|g| g.contains(&x)) {
            ClickTarget::Expand
        } else if let Some((_, name)) = self.actions.iter().find(|(r, _)| r.contains(&x)) {
            ClickTarget::Action(name.clone())
        } else if let Some(column) = self
            .columns
            .iter()
            .position(|r| r.contains(&x))
            .and_then(|i| columns.get(i))
            .filter(|c| c.drillable)
        {
            ClickTarget::Drill {
                column: column.key.clone(),
            }
        } else {
            ClickTarget::Row
        };

        Some(Action::Activate {
            index: line.index,
            target,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Table Component
// ═══════════════════════════════════════════════════════════════════════════════

pub struct DrillTableComponent {
    dataset: Dataset,
    locale: FormatLocale,

    /// Index into the visible rows
    cursor: usize,
    scroll: usize,
    pub search_active: bool,

    hits: HitMap,
    /// (visible rows, rows that fit) at the last render
    viewport: (usize, usize),
}

impl DrillTableComponent {
    pub fn new(dataset: Dataset, locale: FormatLocale) -> Self {
        Self {
            dataset,
            locale,
            cursor: 0,
            scroll: 0,
            search_active: false,
            hits: HitMap::default(),
            viewport: (0, 0),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn dataset_mut(&mut self) -> &mut Dataset {
        &mut self.dataset
    }

    pub fn locale(&self) -> &FormatLocale {
        &self.locale
    }

    /// Swap in freshly loaded data, keeping search, sort, page and expansion
    pub fn replace_dataset(&mut self, mut dataset: Dataset) {
        let same_schema = dataset.table.columns() == self.dataset.table.columns()
            && dataset.table.options() == self.dataset.table.options();

        if same_schema {
            self.dataset.table.set_rows(dataset.table.forest().clone());
            self.dataset.title = dataset.title;
            self.dataset.description = dataset.description;
            self.dataset.source = dataset.source;
        } else {
            let state = self.dataset.table.state().clone();
            dataset.table = dataset.table.with_state(state);
            self.dataset = dataset;
        }
        self.reset_cursor();
    }

    pub fn search_term(&self) -> &str {
        &self.dataset.table.state().search
    }

    /// Row under the cursor
    pub fn current(&mut self) -> Option<VisibleRow> {
        self.dataset.table.visible_rows().into_iter().nth(self.cursor)
    }

    /// Display label of a row: its first column, formatted, or its id
    pub fn row_label(&self, row: &RowRef) -> String {
        let table = &self.dataset.table;
        let Some(found) = table.forest().get(&row.path) else {
            return row.id.clone();
        };
        table
            .columns()
            .first()
            .map(|c| (c, found.get(&c.key)))
            .filter(|(_, value)| !value.is_null())
            .map(|(c, value)| format_value(value, c.column_type, &self.locale))
            .unwrap_or_else(|| found.id.clone())
    }

    fn first_drillable(&self) -> Option<String> {
        self.dataset
            .table
            .columns()
            .iter()
            .find(|c| c.drillable)
            .map(|c| c.key.clone())
    }

    fn activate_action(&self, name: &str) -> Option<Action> {
        let options = self.dataset.table.options();
        if !options.show_actions {
            return None;
        }
        Some(Action::Activate {
            index: self.cursor,
            target: ClickTarget::Action(name.to_string()),
        })
    }

    fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.scroll = 0;
    }

    fn set_search(&mut self, term: &str) {
        if self.dataset.table.set_search(term) {
            debug!("search {:?} in {}", term, self.dataset.title);
            self.reset_cursor();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Build the lines for `area` (the inside of the border) and record the
    /// hit map for mouse handling.
    fn build_view(&mut self, area: Rect) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut hits = HitMap::default();
        let bottom = area.y.saturating_add(area.height);
        let left = area.x + 1;

        if let Some(description) = &self.dataset.description {
            lines.push(Line::from(Span::styled(
                format!(" {}", description),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(search_line(self.search_term(), self.search_active));

        let table = &mut self.dataset.table;
        let visible = table.visible_rows();
        let is_empty = table.is_empty_state();
        let range_label = table.range_label();
        let page_numbers = table.page_numbers();
        let has_next = table.has_next_page();
        let pagination = table.state().pagination;
        let sort = table.state().sort.clone();
        let options = table.options().clone();
        let columns = table.columns();

        // Cell text per visible row; the first column carries the tree prefix
        let cells: Vec<Vec<String>> = visible
            .iter()
            .map(|v| {
                let Some(row) = table.row(v) else {
                    return Vec::new();
                };
                columns
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        let text = format_value(row.get(&c.key), c.column_type, &self.locale);
                        if i == 0 {
                            format!("{}{}", tree_prefix(v, options.expandable), text)
                        } else {
                            text
                        }
                    })
                    .collect()
            })
            .collect();

        let widths = column_widths(columns, &cells);

        // Header
        let header_y = area.y + lines.len() as u16;
        let mut header_spans = vec![Span::raw(" ")];
        let mut x = left;
        for (i, (column, width)) in columns.iter().zip(&widths).enumerate() {
            if i > 0 {
                header_spans.push(Span::styled(COLUMN_GAP, Style::default().fg(Color::DarkGray)));
                x += COLUMN_GAP.width() as u16;
            }
            let direction = sort.direction_for(&column.key);
            let label = match direction {
                Some(d) => format!("{} {}", column.label, d.indicator()),
                None => column.label.clone(),
            };
            let style = if direction.is_some() {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            };
            header_spans.push(Span::styled(fit(&label, *width), style));
            hits.columns.push(x..x + *width as u16);
            x += *width as u16;
        }
        let actions_x = x + COLUMN_GAP.width() as u16;
        if options.show_actions {
            header_spans.push(Span::styled(COLUMN_GAP, Style::default().fg(Color::DarkGray)));
            header_spans.push(Span::styled(
                "Actions",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
            let mut ax = actions_x;
            for name in &options.actions {
                let button = format!("[{}]", name);
                let w = button.width() as u16;
                hits.actions.push((ax..ax + w, name.clone()));
                ax += w + 1;
            }
        }
        if header_y < bottom {
            hits.header_y = Some(header_y);
        }
        lines.push(Line::from(header_spans));

        let total_width = (x - left) as usize
            + if options.show_actions {
                COLUMN_GAP.width() + actions_width(&options.actions)
            } else {
                0
            };
        lines.push(Line::from(Span::styled(
            format!(" {}", "─".repeat(total_width)),
            Style::default().fg(Color::DarkGray),
        )));

        // Rows
        let rows_height = (area.height as usize).saturating_sub(lines.len() + 2);
        let n = visible.len();
        self.cursor = self.cursor.min(n.saturating_sub(1));
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        }
        if rows_height > 0 && self.cursor >= self.scroll + rows_height {
            self.scroll = self.cursor + 1 - rows_height;
        }
        self.scroll = self.scroll.min(n.saturating_sub(rows_height));
        self.viewport = (n, rows_height);

        let rows_start = lines.len();
        if is_empty {
            lines.push(Line::from(Span::styled(
                "   No data available",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        for (index, v) in visible
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(rows_height)
        {
            let y = area.y + lines.len() as u16;
            let selected = index == self.cursor;
            let base = if selected {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else if v.depth > 0 {
                Style::default().fg(Color::Gray)
            } else {
                Style::default().fg(Color::White)
            };

            let mut spans = vec![Span::styled(" ", base)];
            for (i, (column, width)) in columns.iter().zip(&widths).enumerate() {
                if i > 0 {
                    spans.push(Span::styled(COLUMN_GAP, base.fg(Color::DarkGray)));
                }
                let text = cells[index].get(i).map(String::as_str).unwrap_or("");
                let padded = if is_numeric(column.column_type) && i > 0 {
                    fit_right(text, *width)
                } else {
                    fit(text, *width)
                };
                let style = if column.drillable {
                    base.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)
                } else {
                    base
                };
                spans.push(Span::styled(padded, style));
            }

            if options.show_actions {
                spans.push(Span::styled(COLUMN_GAP, base.fg(Color::DarkGray)));
                for name in &options.actions {
                    let color = if name == "delete" { Color::Red } else { Color::Green };
                    spans.push(Span::styled(format!("[{}]", name), base.fg(color)));
                    spans.push(Span::styled(" ", base));
                }
            }

            let glyph_offset = INDENT * v.depth;
            let glyph = (v.has_children && glyph_offset < widths.first().copied().unwrap_or(0))
                .then(|| {
                    let gx = left + glyph_offset as u16;
                    gx..gx + 1
                });
            if y < bottom {
                hits.rows.push(LineHit { y, index, glyph });
            }
            lines.push(Line::from(spans));
        }

        while lines.len() < rows_start + rows_height {
            lines.push(Line::from(""));
        }

        // Footer
        lines.push(Line::from(Span::styled(
            format!(" {}", "─".repeat(total_width)),
            Style::default().fg(Color::DarkGray),
        )));
        let footer_y = area.y + lines.len() as u16;
        let mut footer = vec![Span::styled(
            format!(" {}  ", range_label),
            Style::default().fg(Color::Yellow),
        )];
        let mut fx = area.x + footer[0].content.width() as u16;

        if !page_numbers.is_empty() {
            let mut push_button = |label: String, style: Style, target: PageTarget| {
                let w = label.width() as u16;
                footer.push(Span::styled(label, style));
                hits.pages.push((fx..fx + w, target));
                fx += w;
                footer.push(Span::raw(" "));
                fx += 1;
            };

            let enabled = Style::default().fg(Color::Cyan);
            let disabled = Style::default().fg(Color::DarkGray);
            push_button(
                "‹ Prev".to_string(),
                if pagination.has_previous() { enabled } else { disabled },
                PageTarget::Previous,
            );
            for page in page_numbers {
                let style = if page == pagination.current_page {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                push_button(format!(" {} ", page), style, PageTarget::Page(page));
            }
            push_button(
                "Next ›".to_string(),
                if has_next { enabled } else { disabled },
                PageTarget::Next,
            );
        }
        if footer_y < bottom {
            hits.footer_y = Some(footer_y);
        }
        lines.push(Line::from(footer));

        self.hits = hits;
        lines
    }
}

fn search_line(term: &str, active: bool) -> Line<'static> {
    let mut spans = vec![Span::styled(" Search: ", Style::default().fg(Color::DarkGray))];
    if term.is_empty() && !active {
        spans.push(Span::styled(
            "press / to filter",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    } else {
        spans.push(Span::styled(term.to_string(), Style::default().fg(Color::White)));
    }
    if active {
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}

/// Indentation plus expand glyph for the first column
fn tree_prefix(row: &VisibleRow, expandable: bool) -> String {
    let indent = " ".repeat(INDENT * row.depth);
    if !expandable {
        return indent;
    }
    let glyph = match (row.has_children, row.expanded) {
        (true, true) => "▼ ",
        (true, false) => "▶ ",
        _ => "  ",
    };
    format!("{}{}", indent, glyph)
}

fn is_numeric(column_type: ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::Number | ColumnType::Currency | ColumnType::Percentage
    )
}

/// Display width of each column over the header and the given cells
fn column_widths(columns: &[Column], cells: &[Vec<String>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            // room for the sort indicator
            let header = column.label.width() + if column.sortable { 2 } else { 0 };
            let widest = cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.width())
                .max()
                .unwrap_or(0);
            header.max(widest).clamp(1, MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn actions_width(actions: &[String]) -> usize {
    actions.iter().map(|a| a.width() + 3).sum()
}

/// Pad or truncate `text` to exactly `width` display columns, left aligned
fn fit(text: &str, width: usize) -> String {
    let (mut out, used) = truncate(text, width);
    out.push_str(&" ".repeat(width - used));
    out
}

/// Pad or truncate `text` to exactly `width` display columns, right aligned
fn fit_right(text: &str, width: usize) -> String {
    let (out, used) = truncate(text, width);
    format!("{}{}", " ".repeat(width - used), out)
}

/// Longest prefix of `text` fitting `width`, with `…` when cut
fn truncate(text: &str, width: usize) -> (String, usize) {
    if text.width() <= width {
        return (text.to_string(), text.width());
    }
    if width == 0 {
        return (String::new(), 0);
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    (out, used + 1)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for DrillTableComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let index = self.cursor;
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstItem),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastItem),

            // Expansion
            KeyCode::Char(' ') => Some(Action::Activate {
                index,
                target: ClickTarget::Expand,
            }),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::ExpandRow),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::CollapseRow),

            // Events
            KeyCode::Enter => Some(Action::Activate {
                index,
                target: ClickTarget::Row,
            }),
            KeyCode::Char('d') => self.first_drillable().map(|column| Action::Activate {
                index,
                target: ClickTarget::Drill { column },
            }),
            KeyCode::Char('v') => self.activate_action("view"),
            KeyCode::Char('e') => self.activate_action("edit"),
            KeyCode::Char('x') => self.activate_action("delete"),

            // Sorting and paging
            KeyCode::Char(c @ '1'..='9') => Some(Action::SortColumn(c as usize - '1' as usize)),
            KeyCode::Char(']') | KeyCode::PageDown => Some(Action::NextPage),
            KeyCode::Char('[') | KeyCode::PageUp => Some(Action::PrevPage),

            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.hits
                    .hit_test(mouse.column, mouse.row, self.dataset.table.columns())
            }
            MouseEventKind::ScrollDown => Some(Action::NextItem),
            MouseEventKind::ScrollUp => Some(Action::PrevItem),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextItem => {
                let len = self.dataset.table.visible_rows().len();
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            Action::PrevItem => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Action::FirstItem => {
                self.cursor = 0;
            }
            Action::LastItem => {
                self.cursor = self.dataset.table.visible_rows().len().saturating_sub(1);
            }
            Action::Activate { index, target } => {
                self.cursor = index;
                if let Some(event) = self.dataset.table.activate(index, target) {
                    return Ok(Some(Action::Table(event)));
                }
            }
            Action::ExpandRow => {
                if let Some(v) = self.current() {
                    if v.has_children && !v.expanded {
                        self.update(Action::Activate {
                            index: self.cursor,
                            target: ClickTarget::Expand,
                        })?;
                    }
                }
            }
            Action::CollapseRow => {
                if let Some(v) = self.current() {
                    if v.expanded {
                        self.update(Action::Activate {
                            index: self.cursor,
                            target: ClickTarget::Expand,
                        })?;
                    } else if v.depth > 0 {
                        let visible = self.dataset.table.visible_rows();
                        if let Some(parent) = visible[..self.cursor]
                            .iter()
                            .rposition(|p| p.depth + 1 == v.depth)
                        {
                            self.cursor = parent;
                        }
                    }
                }
            }
            Action::SortColumn(position) => {
                let key = self
                    .dataset
                    .table
                    .columns()
                    .get(position)
                    .map(|c| c.key.clone());
                if let Some(key) = key {
                    if self.dataset.table.toggle_sort(&key) {
                        debug!("sort {} by {:?}", self.dataset.title, self.dataset.table.state().sort);
                        self.reset_cursor();
                    }
                }
            }
            Action::NextPage => {
                self.dataset.table.next_page();
                self.reset_cursor();
            }
            Action::PrevPage => {
                self.dataset.table.prev_page();
                self.reset_cursor();
            }
            Action::GoToPage(page) => {
                self.dataset.table.set_page(page);
                self.reset_cursor();
            }
            Action::EnterSearchMode => {
                self.search_active = true;
            }
            Action::ExitSearchMode => {
                self.search_active = false;
            }
            Action::SearchInput(c) => {
                let mut term = self.search_term().to_string();
                term.push(c);
                self.set_search(&term);
            }
            Action::SearchBackspace => {
                let mut term = self.search_term().to_string();
                term.pop();
                self.set_search(&term);
            }
            Action::ClearSearch => {
                self.search_active = false;
                self.set_search("");
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let border_color = if self.search_active {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.dataset.title))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = self.build_view(inner);
        frame.render_widget(Paragraph::new(lines), inner);

        let (total, visible_height) = self.viewport;
        if total > visible_height && visible_height > 0 {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}
