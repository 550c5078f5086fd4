//! The merged result of one collection cycle and its read-only query surface.
//!
//! Items are kept sorted by `date` descending. Dates are compared as
//! `YYYY-MM-DD HH:MM` strings, which orders them chronologically because the
//! format is fixed-width and zero-padded. Every query returns a new
//! [`Collection`] so filters can be chained; none of them mutates `self`.

use crate::types::NewsItem;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collection {
    items: Vec<NewsItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_news: usize,
    pub sources: BTreeMap<String, usize>,
    pub categories: BTreeMap<String, usize>,
    pub date_range: DateRange,
}

impl Collection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sort `items` by date, newest first. Items with equal dates keep their
    /// relative order.
    pub fn from_items(mut items: Vec<NewsItem>) -> Self {
        items.sort_by(|a, b| b.date.cmp(&a.date));
        Self { items }
    }

    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NewsItem> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<NewsItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Case-insensitive match against title, summary or the joined keywords.
    pub fn search(&self, query: &str) -> Collection {
        let query = query.to_lowercase();
        self.filtered(|item| {
            item.title.to_lowercase().contains(&query)
                || item.summary.to_lowercase().contains(&query)
                || item.keywords_str().to_lowercase().contains(&query)
        })
    }

    /// Matches the English or the Chinese category label.
    pub fn filter_by_category(&self, category: &str) -> Collection {
        self.filtered(|item| item.category.matches_label(category))
    }

    pub fn filter_by_source(&self, source: &str) -> Collection {
        let needle = source.to_lowercase();
        self.filtered(|item| item.source.to_lowercase().contains(&needle))
    }

    /// Inclusive bounds, compared against the formatted date string.
    pub fn filter_by_date_range(&self, start: Option<&str>, end: Option<&str>) -> Collection {
        self.filtered(|item| {
            start.map_or(true, |s| item.date.as_str() >= s)
                && end.map_or(true, |e| item.date.as_str() <= e)
        })
    }

    pub fn summary_stats(&self) -> SummaryStats {
        let mut sources = BTreeMap::new();
        let mut categories = BTreeMap::new();
        for item in &self.items {
            *sources.entry(item.source.clone()).or_insert(0) += 1;
            *categories.entry(item.category.label().to_string()).or_insert(0) += 1;
        }

        SummaryStats {
            total_news: self.items.len(),
            sources,
            categories,
            date_range: DateRange {
                earliest: self.items.iter().map(|i| &i.date).min().cloned(),
                latest: self.items.iter().map(|i| &i.date).max().cloned(),
            },
        }
    }

    /// Distinct sources in collection order.
    pub fn sources(&self) -> Vec<&str> {
        distinct(self.items.iter().map(|i| i.source.as_str()))
    }

    /// Distinct category labels in collection order.
    pub fn categories(&self) -> Vec<&str> {
        distinct(self.items.iter().map(|i| i.category.label()))
    }

    fn filtered<F>(&self, predicate: F) -> Collection
    where
        F: Fn(&NewsItem) -> bool,
    {
        Collection {
            items: self.items.iter().filter(|&item| predicate(item)).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a NewsItem;
    type IntoIter = std::slice::Iter<'a, NewsItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
