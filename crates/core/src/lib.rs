//! case-dash-core - Decoding, aggregation and ranking for case-dash
//!
//! This crate is free of I/O so it can be shared between the CLI and any
//! other presentation front end.
//!
//! # Features
//!
//! - Decode case-record CSV text into rows (quoted fields supported)
//! - Summary metrics, grouped counts and grouped stats
//! - Stable top-N rankings with capped, user-controlled limits
//! - Event-driven dashboard state that replaces snapshots wholesale
//!
//! # Example
//!
//! ```
//! use case_dash_core::{compute_views, decode, Limits};
//!
//! let csv = "CASE VALUE,TRANSFEREE COURT,NEXT DATE BY HIGH COURT\n\"1,000\",Delhi,\n";
//! let rows = decode(csv).unwrap().rows;
//! let views = compute_views(&rows, Limits::default());
//!
//! assert_eq!(views.summary.total, 1);
//! assert_eq!(views.summary.total_value, 1000.0);
//! ```

pub mod aggregate;
pub mod data;
pub mod error;
pub mod format;
pub mod parser;
pub mod pipeline;
pub mod rank;
pub mod state;
pub mod upload;

pub use aggregate::{
    group_count, group_stat, summary_metrics, GroupCount, GroupStat, GroupedCount, GroupedStat,
    SummaryMetrics,
};
pub use data::{columns, parse_monetary, CaseStatus, Row, Snapshot, DEFAULT_GROUP_KEY};
pub use error::{Error, Result};
pub use parser::{decode, CsvDecoder, DecodeWarning, Decoded};
pub use pipeline::{compute_views, DashboardViews, Limits, RankedCase, RankingTable};
pub use rank::{rank_advocates, rank_cases, top_n, Limit, RankKey};
pub use state::{DashboardState, Event, LoadTicket, Notification, NotificationLevel, Outcome};
pub use upload::Upload;
