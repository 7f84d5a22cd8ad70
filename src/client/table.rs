//! Client-side sort, filter and pagination over a loaded collection.
//!
//! Items are inspected through their JSON form, so any `Serialize` row works
//! and sort keys are the wire field names (`"price"`, `"category.name"`).

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    sort: Option<(String, SortDirection)>,
    filter: String,
    page_size: usize,
    page: usize,
}

impl Default for TableView {
    fn default() -> Self {
        Self {
            sort: None,
            filter: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

/// One rendered page of a table.
#[derive(Debug, PartialEq)]
pub struct TablePage<'a, T> {
    pub rows: Vec<&'a T>,
    /// 1-based, clamped to `page_count`.
    pub page: usize,
    pub page_count: usize,
    /// Rows matching the filter across all pages.
    pub matches: usize,
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(&self) -> Option<(&str, SortDirection)> {
        self.sort.as_ref().map(|(key, dir)| (key.as_str(), *dir))
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Sorts ascending by `key`, or flips the direction when already sorted by it.
    pub fn sort_by(&mut self, key: &str) {
        self.sort = match self.sort.take() {
            Some((current, SortDirection::Ascending)) if current == key => {
                Some((current, SortDirection::Descending))
            }
            _ => Some((key.to_string(), SortDirection::Ascending)),
        };
    }

    pub fn set_sort(&mut self, key: &str, direction: SortDirection) {
        self.sort = Some((key.to_string(), direction));
    }

    /// Narrowing the rows moves back to the first page.
    pub fn set_filter(&mut self, filter: &str) {
        if self.filter != filter {
            self.filter = filter.to_string();
            self.page = 1;
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn apply<'a, T: Serialize>(&self, items: &'a [T]) -> TablePage<'a, T> {
        let needle = self.filter.trim().to_lowercase();

        let mut rows: Vec<(Value, &'a T)> = items
            .iter()
            .map(|item| (serde_json::to_value(item).unwrap_or(Value::Null), item))
            .filter(|(json, _)| needle.is_empty() || matches_filter(json, &needle))
            .collect();

        if let Some((key, direction)) = &self.sort {
            rows.sort_by(|(a, _), (b, _)| {
                let ordering = compare(lookup(a, key), lookup(b, key));
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let matches = rows.len();
        let page_count = matches.div_ceil(self.page_size).max(1);
        let page = self.page.min(page_count);

        let rows = rows
            .into_iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .map(|(_, item)| item)
            .collect();

        TablePage {
            rows,
            page,
            page_count,
            matches,
        }
    }
}

fn matches_filter(value: &Value, needle: &str) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|v| matches_filter(v, needle)),
        Value::Object(fields) => fields.values().any(|v| matches_filter(v, needle)),
        other => other.to_string().to_lowercase().contains(needle),
    }
}

fn lookup<'v>(value: &'v Value, key: &str) -> &'v Value {
    key.split('.')
        .try_fold(value, |v, part| v.get(part))
        .unwrap_or(&Value::Null)
}

/// Numbers compare numerically, everything else as case-insensitive text.
/// Missing values sort first.
fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        _ => text(a).cmp(&text(b)),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string().to_lowercase(),
    }
}
