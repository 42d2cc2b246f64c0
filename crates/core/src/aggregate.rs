//! Aggregation over a row sequence
//!
//! Every function here is a pure, single pass over the rows. Results are
//! recomputed in full on each call.

use crate::data::{CaseStatus, Row};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Headline numbers for the metric cards
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SummaryMetrics {
    /// Number of rows
    pub total: usize,
    /// Sum of every row's case value (unparsable values count as 0)
    pub total_value: f64,
    /// Rows with a next hearing date
    pub pending: usize,
    /// `total - pending`
    pub disposed: usize,
}

/// Compute summary metrics, reading amounts from `value_column`
pub fn summary_metrics(rows: &[Row], value_column: &str) -> SummaryMetrics {
    let mut total_value = 0.0;
    let mut pending = 0;

    for row in rows {
        total_value += row.monetary(value_column);
        if row.status() == CaseStatus::Pending {
            pending += 1;
        }
    }

    SummaryMetrics {
        total: rows.len(),
        total_value,
        pending,
        disposed: rows.len() - pending,
    }
}

/// Occurrence count for one group key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

/// Occurrence count and summed value for one group key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupStat {
    pub key: String,
    pub count: usize,
    pub total_value: f64,
}

/// Group key to count. Remembers first-seen key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedCount {
    entries: Vec<GroupCount>,
    index: HashMap<String, usize>,
}

impl GroupedCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `key`
    pub fn increment(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push(GroupCount {
                    key: key.to_string(),
                    count: 1,
                });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.index.get(key).map(|&i| self.entries[i].count)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Entries in first-seen order
    pub fn entries(&self) -> &[GroupCount] {
        &self.entries
    }

    /// Entries sorted ascending by raw key string.
    ///
    /// Lexicographic, so only meaningful for fixed-width numeric keys such
    /// as four-digit years.
    pub fn sorted_by_key(&self) -> Vec<GroupCount> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| a.key.cmp(&b.key));
        sorted
    }

    /// Entries sorted descending by count; ties keep first-seen order
    pub fn sorted_by_count_desc(&self) -> Vec<GroupCount> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }
}

/// Group key to count and total value. Remembers first-seen key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedStat {
    entries: Vec<GroupStat>,
    index: HashMap<String, usize>,
}

impl GroupedStat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `key` carrying `value`
    pub fn record(&mut self, key: &str, value: f64) {
        match self.index.get(key) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.count += 1;
                entry.total_value += value;
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push(GroupStat {
                    key: key.to_string(),
                    count: 1,
                    total_value: value,
                });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&GroupStat> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order
    pub fn entries(&self) -> &[GroupStat] {
        &self.entries
    }

    /// Sum of all group values
    pub fn total_value(&self) -> f64 {
        self.entries.iter().map(|e| e.total_value).sum()
    }

    /// Entries sorted descending by count; ties keep first-seen order
    pub fn sorted_by_count_desc(&self) -> Vec<GroupStat> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }
}

/// Count rows per value of `column`
pub fn group_count(rows: &[Row], column: &str, default_key: &str) -> GroupedCount {
    let mut grouped = GroupedCount::new();
    for row in rows {
        grouped.increment(row.group_key(column, default_key));
    }
    grouped
}

/// Count rows and sum `value_column` per value of `column`
pub fn group_stat(rows: &[Row], column: &str, value_column: &str, default_key: &str) -> GroupedStat {
    let mut grouped = GroupedStat::new();
    for row in rows {
        grouped.record(row.group_key(column, default_key), row.monetary(value_column));
    }
    grouped
}
