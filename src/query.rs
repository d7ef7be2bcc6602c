use std::cmp::Ordering;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PAGE_SIZE;
use crate::record::{AppRecord, Pricing};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(from = "String")]
pub enum SortMode {
    #[serde(rename = "name_asc")]
    #[value(name = "name_asc")]
    #[strum(serialize = "Name A-Z")]
    NameAsc,
    #[serde(rename = "name_desc")]
    #[value(name = "name_desc")]
    #[strum(serialize = "Name Z-A")]
    NameDesc,
    #[serde(rename = "createdAt_asc")]
    #[value(name = "createdAt_asc")]
    #[strum(serialize = "Oldest")]
    CreatedAsc,
    #[default]
    #[serde(rename = "createdAt_desc")]
    #[value(name = "createdAt_desc")]
    #[strum(serialize = "Newest")]
    CreatedDesc,
}

impl From<String> for SortMode {
    fn from(key: String) -> Self {
        SortMode::from_key(&key)
    }
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::CreatedDesc,
        SortMode::CreatedAsc,
        SortMode::NameAsc,
        SortMode::NameDesc,
    ];

    /// Unknown keys fall back to newest first
    pub fn from_key(key: &str) -> Self {
        match key {
            "name_asc" => SortMode::NameAsc,
            "name_desc" => SortMode::NameDesc,
            "createdAt_asc" => SortMode::CreatedAsc,
            _ => SortMode::CreatedDesc,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn compare(self, a: &AppRecord, b: &AppRecord) -> Ordering {
        match self {
            SortMode::NameAsc => locale_cmp(&a.app_name, &b.app_name),
            SortMode::NameDesc => locale_cmp(&b.app_name, &a.app_name),
            SortMode::CreatedAsc => a.created_at.cmp(&b.created_at),
            SortMode::CreatedDesc => b.created_at.cmp(&a.created_at),
        }
    }
}

/// Case-insensitive first; on ties lowercase sorts before uppercase.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, strum_macros::Display,
)]
pub enum FreeFilter {
    #[default]
    #[value(skip)]
    #[strum(serialize = "Any")]
    Any,
    #[value(name = "Free")]
    Free,
    #[value(name = "Paid")]
    Paid,
}

impl FreeFilter {
    pub fn matches(self, pricing: Pricing) -> bool {
        match self {
            FreeFilter::Any => true,
            FreeFilter::Free => pricing.is_free(),
            FreeFilter::Paid => !pricing.is_free(),
        }
    }

    pub fn next(self) -> Self {
        match self {
            FreeFilter::Any => FreeFilter::Free,
            FreeFilter::Free => FreeFilter::Paid,
            FreeFilter::Paid => FreeFilter::Any,
        }
    }
}

/// Filter, sort and page state of the apps list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub q: String,
    /// Exact domain match; empty means any
    pub domain: String,
    pub free: FreeFilter,
    pub sort: SortMode,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            q: String::new(),
            domain: String::new(),
            free: FreeFilter::Any,
            sort: SortMode::CreatedDesc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    pub fn set_q(&mut self, q: &str) {
        self.q = q.trim().to_string();
        self.page = 1;
    }

    pub fn set_domain(&mut self, domain: &str) {
        self.domain = domain.to_string();
        self.page = 1;
    }

    pub fn set_free(&mut self, free: FreeFilter) {
        self.free = free;
        self.page = 1;
    }

    /// Sorting keeps the current page
    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Advances unless already on the last page for `total` results
    pub fn next_page(&mut self, total: usize) -> bool {
        if self.page < self.page_count(total) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn page_count(&self, total: usize) -> usize {
        let size = self.page_size.max(1);
        total.div_ceil(size).max(1)
    }

    pub fn matches(&self, app: &AppRecord) -> bool {
        if !self.q.is_empty() {
            let q = self.q.to_lowercase();
            if !app.app_name.to_lowercase().contains(&q) && !app.company.to_lowercase().contains(&q)
            {
                return false;
            }
        }
        if !self.domain.is_empty() && app.domain != self.domain {
            return false;
        }
        self.free.matches(app.is_free)
    }

    /// Filtered and sorted view of `list`; the sort is stable
    pub fn apply_filters<'a>(&self, list: &'a [AppRecord]) -> Vec<&'a AppRecord> {
        let mut out: Vec<&AppRecord> = list.iter().filter(|a| self.matches(a)).collect();
        out.sort_by(|a, b| self.sort.compare(a, b));
        out
    }

    /// Slice of the current page; past-the-end pages are empty
    pub fn paginate<'a, T>(&self, list: &'a [T]) -> &'a [T] {
        let size = self.page_size.max(1);
        let start = (self.page.max(1) - 1).saturating_mul(size).min(list.len());
        let end = start.saturating_add(size).min(list.len());
        &list[start..end]
    }
}
