//! Top-N selection with user-controlled, capped limits

use crate::aggregate::GroupStat;
use crate::data::Row;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Limit used when the requested one is missing, non-numeric or not positive
pub const DEFAULT_LIMIT: usize = 10;

/// Upper bound for the top-cases table
pub const CASE_LIMIT_CAP: usize = 1000;

/// Upper bound for the top-advocates table
pub const ADVOCATE_LIMIT_CAP: usize = 100;

/// Number of advocates shown in the distribution chart
pub const ADVOCATE_CHART_SIZE: usize = 10;

/// A requested row limit as typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit(Option<i64>);

impl Limit {
    /// Use the default limit
    pub fn unset() -> Self {
        Self(None)
    }

    /// An explicit numeric request (may still be non-positive)
    pub fn requested(n: i64) -> Self {
        Self(Some(n))
    }

    /// Parse user input using leading-integer semantics: surrounding
    /// whitespace is ignored and `"25 rows"` means 25.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        let sign_len = usize::from(s.starts_with(['+', '-']));
        let digits = s[sign_len..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();

        if digits == 0 {
            return Self::unset();
        }

        let end = sign_len + digits;
        // Too many digits to fit: saturate, the cap applies anyway
        let n = s[..end].parse::<i64>().unwrap_or(if s.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        });
        Self::requested(n)
    }

    /// The effective limit: default when unusable, then clamped to `cap`
    pub fn resolve(self, cap: usize) -> usize {
        let n = match self.0 {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            _ => DEFAULT_LIMIT,
        };
        n.min(cap)
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::unset()
    }
}

impl From<&str> for Limit {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Ordering used to rank items. Must be total so sorting stays well defined.
pub trait RankKey {
    fn rank_cmp(&self, other: &Self) -> Ordering;
}

impl RankKey for usize {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl RankKey for f64 {
    /// Numeric order with `-0.0 == 0.0`; NaN ranks above every number.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or_else(|| self.total_cmp(other))
    }
}

/// Return the first `min(n, cap)` items after a stable descending sort by
/// `key`. Ties keep input order.
pub fn top_n<T, K, F>(items: &[T], key: F, n: Limit, cap: usize) -> Vec<T>
where
    T: Clone,
    K: RankKey,
    F: Fn(&T) -> K,
{
    let mut keyed: Vec<(K, &T)> = items.iter().map(|item| (key(item), item)).collect();
    keyed.sort_by(|a, b| b.0.rank_cmp(&a.0));

    keyed
        .into_iter()
        .take(n.resolve(cap))
        .map(|(_, item)| item.clone())
        .collect()
}

/// Highest-value cases, capped at [`CASE_LIMIT_CAP`]
pub fn rank_cases(rows: &[Row], n: Limit) -> Vec<Row> {
    top_n(rows, Row::case_value, n, CASE_LIMIT_CAP)
}

/// Busiest advocates by case count, capped at [`ADVOCATE_LIMIT_CAP`]
pub fn rank_advocates(stats: &[GroupStat], n: Limit) -> Vec<GroupStat> {
    top_n(stats, |s| s.count, n, ADVOCATE_LIMIT_CAP)
}
