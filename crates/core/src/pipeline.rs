//! Pipeline from a row sequence and the table limits to every derived view

use crate::aggregate::{group_count, group_stat, summary_metrics, GroupCount, GroupStat, SummaryMetrics};
use crate::data::{columns, CaseStatus, Row, DEFAULT_GROUP_KEY};
use crate::error::Result;
use crate::rank::{
    rank_advocates, rank_cases, top_n, Limit, ADVOCATE_CHART_SIZE, ADVOCATE_LIMIT_CAP,
    CASE_LIMIT_CAP,
};
use serde::{Deserialize, Serialize};

/// Placeholder for empty table cells
pub const EMPTY_CELL: &str = "-";

/// The two user-controlled table limits
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Limits {
    pub cases: Limit,
    pub advocates: Limit,
}

/// Which ranking table a limit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankingTable {
    Cases,
    Advocates,
}

/// One line of the top-cases table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedCase {
    pub serial_no: String,
    pub party1: String,
    pub party2: String,
    pub value: f64,
    pub court: String,
    pub year: String,
    pub status: CaseStatus,
}

impl From<&Row> for RankedCase {
    fn from(row: &Row) -> Self {
        let cell = |column: &str| row.display(column, EMPTY_CELL).to_string();
        Self {
            serial_no: cell(columns::SERIAL_NO),
            party1: cell(columns::PARTY1),
            party2: cell(columns::PARTY2),
            value: row.case_value(),
            court: cell(columns::TRANSFEREE_COURT),
            year: cell(columns::CASE_YEAR),
            status: row.status(),
        }
    }
}

/// Everything the presentation layer needs for one snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardViews {
    pub summary: SummaryMetrics,
    /// Cases per court, first-seen order
    pub court_distribution: Vec<GroupCount>,
    /// Cases per filing year, ascending by year
    pub year_distribution: Vec<GroupCount>,
    /// Cases and value per court, busiest first
    pub court_workload: Vec<GroupStat>,
    /// Ten busiest advocates
    pub advocate_distribution: Vec<GroupStat>,
    pub top_cases: Vec<RankedCase>,
    pub top_advocates: Vec<GroupStat>,
    /// Effective top-cases limit after defaulting and capping
    pub case_limit: usize,
    /// Effective top-advocates limit after defaulting and capping
    pub advocate_limit: usize,
}

impl DashboardViews {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Run aggregation and ranking over `rows`
pub fn compute_views(rows: &[Row], limits: Limits) -> DashboardViews {
    let court_counts = group_count(rows, columns::TRANSFEREE_COURT, DEFAULT_GROUP_KEY);
    let year_counts = group_count(rows, columns::CASE_YEAR, DEFAULT_GROUP_KEY);
    let court_stats = group_stat(
        rows,
        columns::TRANSFEREE_COURT,
        columns::CASE_VALUE,
        DEFAULT_GROUP_KEY,
    );
    let advocate_stats = group_stat(
        rows,
        columns::ADVOCATE,
        columns::CASE_VALUE,
        DEFAULT_GROUP_KEY,
    );

    let advocate_distribution = top_n(
        advocate_stats.entries(),
        |s| s.count,
        Limit::requested(ADVOCATE_CHART_SIZE as i64),
        ADVOCATE_CHART_SIZE,
    );

    DashboardViews {
        summary: summary_metrics(rows, columns::CASE_VALUE),
        court_distribution: court_counts.entries().to_vec(),
        year_distribution: year_counts.sorted_by_key(),
        court_workload: court_stats.sorted_by_count_desc(),
        advocate_distribution,
        top_cases: rank_cases(rows, limits.cases)
            .iter()
            .map(RankedCase::from)
            .collect(),
        top_advocates: rank_advocates(advocate_stats.entries(), limits.advocates),
        case_limit: limits.cases.resolve(CASE_LIMIT_CAP),
        advocate_limit: limits.advocates.resolve(ADVOCATE_LIMIT_CAP),
    }
}
