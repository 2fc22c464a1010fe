use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::projector::{preview, project, FileGroup, GroupedItem, PREVIEW_WORDS};
use crate::{FileSummary, ProgressSnapshot};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const NO_FILE_SUMMARY: &str = "No summary available for this file.";

/// Relevance as shown in a table cell, e.g. `0.875` -> `"87.50%"`.
pub fn format_relevance(relevance: f64) -> String {
    format!("{:.2}%", relevance * 100.0)
}

/// Reads a displayed relevance back into `[0, 1]` form.
pub fn parse_relevance(display: &str) -> Option<f64> {
    let trimmed = display.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let percent: f64 = number.parse().ok()?;
    percent.is_finite().then_some(percent / 100.0)
}

/// One rendered row. `full_text` is only kept when the preview is truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub local_index: usize,
    pub preview: String,
    pub full_text: Option<String>,
    pub relevance_display: String,
}

impl TableRow {
    fn render(grouped: &GroupedItem) -> Self {
        let text = &grouped.item.text;
        let preview = preview(text, PREVIEW_WORDS);
        let full_text = (preview != *text).then(|| text.clone());
        Self {
            local_index: grouped.local_index,
            preview,
            full_text,
            relevance_display: format_relevance(grouped.item.relevance),
        }
    }

    /// Untruncated text when available, else the preview.
    pub fn text(&self) -> &str {
        self.full_text.as_deref().unwrap_or(&self.preview)
    }
}

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    /// The row's local index.
    Number,
    Relevance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            column: SortColumn::Number,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortOrder {
    /// Same column flips direction; another column starts ascending.
    fn toggled(self, column: SortColumn) -> Self {
        let direction = match (self.column == column, self.direction) {
            (true, SortDirection::Ascending) => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        Self { column, direction }
    }

    fn compare(self, a: &TableRow, b: &TableRow) -> Ordering {
        let ordering = match self.column {
            SortColumn::Number => a.local_index.cmp(&b.local_index),
            SortColumn::Relevance => relevance_key(a).total_cmp(&relevance_key(b)),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

fn relevance_key(row: &TableRow) -> f64 {
    parse_relevance(&row.relevance_display).unwrap_or(f64::NEG_INFINITY)
}

/// Every word of `filter` must occur, ignoring case, in the row's number,
/// text or relevance.
fn row_matches(row: &TableRow, filter: &str) -> bool {
    let haystack = format!(
        "{} {} {}",
        row.local_index,
        row.text(),
        row.relevance_display
    )
    .to_lowercase();
    filter
        .split_whitespace()
        .all(|word| haystack.contains(&word.to_lowercase()))
}

/// The table rendered for one file group, plus its local UI state.
///
/// Filtering and sorting only change which rows are shown and in what order;
/// `rows()` keeps every remaining row in local order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTable {
    pub file_name: String,
    pub summary: Option<String>,
    rows: Vec<TableRow>,
    expanded: BTreeSet<usize>,
    page: usize,
    filter: String,
    sort: SortOrder,
}

impl GroupTable {
    pub fn render(group: &FileGroup) -> Self {
        Self {
            file_name: group.file_name.clone(),
            summary: None,
            rows: group.items.iter().map(TableRow::render).collect(),
            expanded: BTreeSet::new(),
            page: 0,
            filter: String::new(),
            sort: SortOrder::default(),
        }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Rows passing the filter, in sort order.
    pub fn visible_rows(&self) -> Vec<&TableRow> {
        let mut visible: Vec<&TableRow> = self
            .rows
            .iter()
            .filter(|row| row_matches(row, &self.filter))
            .collect();
        let sort = self.sort;
        visible.sort_by(|a, b| sort.compare(a, b));
        visible
    }

    /// Returns whether the filter changed; a new filter goes back to page one.
    pub fn set_filter(&mut self, filter: &str) -> bool {
        let filter = filter.trim();
        if self.filter == filter {
            return false;
        }
        self.filter = filter.to_string();
        self.page = 0;
        true
    }

    /// Sorts by `column`, flipping direction when it is already the sort column.
    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort = self.sort.toggled(column);
        self.page = 0;
    }

    pub fn is_expanded(&self, local_index: usize) -> bool {
        self.expanded.contains(&local_index)
    }

    /// Flips expansion of a row; `false` when no such row exists.
    pub fn toggle(&mut self, local_index: usize) -> bool {
        if !self.rows.iter().any(|row| row.local_index == local_index) {
            return false;
        }
        if !self.expanded.remove(&local_index) {
            self.expanded.insert(local_index);
        }
        true
    }

    pub fn remove(&mut self, local_index: usize, page_size: usize) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.local_index != local_index);
        if self.rows.len() == before {
            return false;
        }
        self.expanded.remove(&local_index);
        self.page = self.page.min(self.page_count(page_size) - 1);
        true
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Pages of visible rows; always at least one, even when empty.
    pub fn page_count(&self, page_size: usize) -> usize {
        self.visible_rows()
            .len()
            .div_ceil(page_size.max(1))
            .max(1)
    }

    /// Moves to `page`, clamped to the last page. Returns whether it moved.
    pub fn set_page(&mut self, page: usize, page_size: usize) -> bool {
        let target = page.min(self.page_count(page_size) - 1);
        if target == self.page {
            return false;
        }
        self.page = target;
        true
    }

    pub fn page_rows(&self, page_size: usize) -> Vec<&TableRow> {
        let size = page_size.max(1);
        self.visible_rows()
            .into_iter()
            .skip(self.page * size)
            .take(size)
            .collect()
    }
}

/// Everything shown in the Records view after a job completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsTable {
    pub full_summary: Option<String>,
    /// Summaries for files that produced no result rows.
    pub orphan_summaries: Vec<FileSummary>,
    groups: Vec<GroupTable>,
    page_size: usize,
}

impl Default for RecordsTable {
    fn default() -> Self {
        Self::empty(DEFAULT_PAGE_SIZE)
    }
}

impl RecordsTable {
    pub fn empty(page_size: usize) -> Self {
        Self {
            full_summary: None,
            orphan_summaries: Vec::new(),
            groups: Vec::new(),
            page_size: page_size.max(1),
        }
    }

    pub fn from_snapshot(snapshot: &ProgressSnapshot, page_size: usize) -> Self {
        let mut groups: Vec<GroupTable> = project(&snapshot.results)
            .iter()
            .map(GroupTable::render)
            .collect();

        let mut orphan_summaries = Vec::new();
        for file_summary in &snapshot.file_summaries {
            let text = if file_summary.summary.trim().is_empty() {
                NO_FILE_SUMMARY.to_string()
            } else {
                file_summary.summary.clone()
            };
            match groups
                .iter_mut()
                .find(|group| group.file_name == file_summary.file_name && group.summary.is_none())
            {
                Some(group) => group.summary = Some(text),
                None => orphan_summaries.push(FileSummary {
                    file_name: file_summary.file_name.clone(),
                    summary: text,
                }),
            }
        }

        Self {
            full_summary: snapshot
                .full_summary
                .clone()
                .filter(|summary| !summary.trim().is_empty()),
            orphan_summaries,
            groups,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn groups(&self) -> &[GroupTable] {
        &self.groups
    }

    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|group| group.rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn toggle_row(&mut self, group: usize, local_index: usize) -> bool {
        self.groups
            .get_mut(group)
            .is_some_and(|table| table.toggle(local_index))
    }

    pub fn set_page(&mut self, group: usize, page: usize) -> bool {
        let page_size = self.page_size;
        self.groups
            .get_mut(group)
            .is_some_and(|table| table.set_page(page, page_size))
    }

    pub fn set_filter(&mut self, group: usize, filter: &str) -> bool {
        self.groups
            .get_mut(group)
            .is_some_and(|table| table.set_filter(filter))
    }

    pub fn sort_by(&mut self, group: usize, column: SortColumn) -> bool {
        let Some(table) = self.groups.get_mut(group) else {
            return false;
        };
        table.sort_by(column);
        true
    }

    /// Drops a row; a group left without rows disappears with it.
    pub fn remove_row(&mut self, group: usize, local_index: usize) -> bool {
        let page_size = self.page_size;
        let Some(table) = self.groups.get_mut(group) else {
            return false;
        };
        if !table.remove(local_index, page_size) {
            return false;
        }
        if table.rows.is_empty() {
            self.groups.remove(group);
        }
        true
    }
}
