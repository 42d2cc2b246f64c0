//! Dashboard state driven by named events
//!
//! The state owns the current snapshot, the table limits and the views last
//! computed from them. Each event runs the whole pipeline synchronously and
//! either replaces the snapshot wholesale or leaves it untouched.
//!
//! Loads are numbered with [`LoadTicket`]s when they start. A load that
//! completes after a newer one has already been applied still wins (the
//! latest arrival replaces the snapshot), but the outcome is flagged as
//! `stale` so callers can report it.

use crate::data::Snapshot;
use crate::error::{Error, Result};
use crate::parser::CsvDecoder;
use crate::pipeline::{compute_views, DashboardViews, Limits, RankingTable};
use crate::rank::Limit;
use crate::upload::Upload;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// How long error notifications stay visible
pub const ERROR_DISMISS_MS: u64 = 5000;

/// How long success notifications stay visible
pub const SUCCESS_DISMISS_MS: u64 = 3000;

/// Sequence number handed out when a load starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoadTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient, auto-dismissing user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub dismiss_after_ms: u64,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            dismiss_after_ms: SUCCESS_DISMISS_MS,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            dismiss_after_ms: ERROR_DISMISS_MS,
        }
    }
}

/// Reads the content of an accepted upload
pub type UploadReader<'a> = Box<dyn FnOnce() -> Result<String> + 'a>;

/// The triggers that drive the dashboard
pub enum Event<'a> {
    /// The bundled sample (or another source) finished loading
    DataLoaded {
        ticket: LoadTicket,
        source: String,
        content: Result<String>,
    },
    /// The user picked a file. `read` is only called once the declared type
    /// has been accepted.
    UploadSelected {
        ticket: LoadTicket,
        upload: Upload,
        read: UploadReader<'a>,
    },
    /// The user edited one of the table limit controls
    LimitChanged { table: RankingTable, raw: String },
}

/// What happened as a result of an event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub notification: Option<Notification>,
    /// Views were recomputed and should be rendered again
    pub changed: bool,
    /// A load replaced data from a load that started later
    pub stale: bool,
    /// The error behind an error notification, for logging
    pub error: Option<String>,
}

impl Outcome {
    fn failed(message: &str, error: &Error) -> Self {
        Self {
            notification: Some(Notification::error(message)),
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct DashboardState {
    decoder: CsvDecoder,
    snapshot: Option<Snapshot>,
    limits: Limits,
    views: Option<DashboardViews>,
    issued: u64,
    applied: Option<LoadTicket>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decoder(mut self, decoder: CsvDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Start a load and get its sequence number
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn views(&self) -> Option<&DashboardViews> {
        self.views.as_ref()
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Apply one event
    pub fn handle(&mut self, event: Event<'_>) -> Outcome {
        match event {
            Event::DataLoaded {
                ticket,
                source,
                content,
            } => match content {
                Ok(text) => match self.replace_snapshot(ticket, source, &text) {
                    Ok(stale) => Outcome {
                        changed: true,
                        stale,
                        ..Outcome::default()
                    },
                    Err(e) => {
                        Outcome::failed("Error loading data. Please check the CSV file format.", &e)
                    }
                },
                Err(e) => Outcome::failed("Error loading sample data.", &e),
            },
            Event::UploadSelected {
                ticket,
                upload,
                read,
            } => {
                if let Err(e) = upload.validate() {
                    return Outcome::failed("Please select a valid CSV file.", &e);
                }
                let result = read()
                    .and_then(|text| self.replace_snapshot(ticket, upload.file_name, &text));
                match result {
                    Ok(stale) => Outcome {
                        notification: Some(Notification::success("Data uploaded successfully!")),
                        changed: true,
                        stale,
                        error: None,
                    },
                    Err(e) => Outcome::failed("Error parsing uploaded file.", &e),
                }
            }
            Event::LimitChanged { table, raw } => {
                let limit = Limit::parse(&raw);
                match table {
                    RankingTable::Cases => self.limits.cases = limit,
                    RankingTable::Advocates => self.limits.advocates = limit,
                }
                self.views = self
                    .snapshot
                    .as_ref()
                    .map(|snapshot| compute_views(&snapshot.rows, self.limits));
                Outcome {
                    changed: self.views.is_some(),
                    ..Outcome::default()
                }
            }
        }
    }

    /// Decode `text` and, only on success, swap in the new snapshot and views
    fn replace_snapshot(&mut self, ticket: LoadTicket, source: String, text: &str) -> Result<bool> {
        let decoded = self.decoder.decode(text)?;
        let views = compute_views(&decoded.rows, self.limits);

        let stale = self.applied.is_some_and(|applied| applied > ticket);
        self.applied = Some(self.applied.map_or(ticket, |applied| applied.max(ticket)));

        self.snapshot = Some(Snapshot {
            source,
            loaded_at: Utc::now(),
            generation: ticket.0,
            rows: decoded.rows,
            warnings: decoded.warnings.iter().map(ToString::to_string).collect(),
        });
        self.views = Some(views);

        Ok(stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "CASE VALUE,TRANSFEREE COURT,NEXT DATE BY HIGH COURT
\"1,000\",Delhi,
\"2,500\",Delhi,2024-01-01
abc,Mumbai,
";

    const OTHER_CSV: &str = "CASE VALUE,TRANSFEREE COURT
10,Chennai
";

    fn load(state: &mut DashboardState, text: &str) -> Outcome {
        let ticket = state.begin_load();
        state.handle(Event::DataLoaded {
            ticket,
            source: "sample-data.csv".to_string(),
            content: Ok(text.to_string()),
        })
    }

    #[test]
    fn test_data_loaded_populates_views() {
        let mut state = DashboardState::new();
        let outcome = load(&mut state, CSV);

        assert!(outcome.changed);
        assert!(outcome.notification.is_none());
        let views = state.views().unwrap();
        assert_eq!(views.summary.total, 3);
        assert_eq!(views.summary.total_value, 3500.0);
        assert_eq!(state.snapshot().unwrap().generation, 1);
    }

    #[test]
    fn test_source_unavailable_keeps_pre_load_state() {
        let mut state = DashboardState::new();
        let ticket = state.begin_load();
        let outcome = state.handle(Event::DataLoaded {
            ticket,
            source: "sample-data.csv".to_string(),
            content: Err(Error::SourceUnavailable {
                source_name: "sample-data.csv".to_string(),
                reason: "not found".to_string(),
            }),
        });

        assert!(!outcome.changed);
        assert_eq!(outcome.notification.unwrap().level, NotificationLevel::Error);
        assert!(!state.is_loaded());
        assert!(state.views().is_none());
    }

    #[test]
    fn test_malformed_input_keeps_previous_snapshot() {
        let mut state = DashboardState::new();
        load(&mut state, CSV);

        let outcome = load(&mut state, "only,a,header\n");

        assert!(!outcome.changed);
        let notification = outcome.notification.unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.dismiss_after_ms, ERROR_DISMISS_MS);
        assert_eq!(state.views().unwrap().summary.total, 3);
    }

    #[test]
    fn test_invalid_upload_is_rejected_before_reading() {
        let mut state = DashboardState::new();
        load(&mut state, CSV);

        let mut read_called = false;
        let ticket = state.begin_load();
        let outcome = state.handle(Event::UploadSelected {
            ticket,
            upload: Upload::new("cases.xlsx", "application/vnd.ms-excel"),
            read: Box::new(|| {
                read_called = true;
                Ok(OTHER_CSV.to_string())
            }),
        });

        assert!(!read_called);
        assert!(!outcome.changed);
        assert_eq!(outcome.notification.unwrap().message, "Please select a valid CSV file.");
        assert_eq!(state.snapshot().unwrap().source, "sample-data.csv");
    }

    #[test]
    fn test_upload_replaces_snapshot() {
        let mut state = DashboardState::new();
        load(&mut state, CSV);

        let ticket = state.begin_load();
        let outcome = state.handle(Event::UploadSelected {
            ticket,
            upload: Upload::new("cases.csv", "text/csv"),
            read: Box::new(|| Ok(OTHER_CSV.to_string())),
        });

        assert!(outcome.changed);
        let notification = outcome.notification.unwrap();
        assert_eq!(notification.level, NotificationLevel::Success);
        assert_eq!(notification.dismiss_after_ms, SUCCESS_DISMISS_MS);
        assert_eq!(state.snapshot().unwrap().source, "cases.csv");
        assert_eq!(state.views().unwrap().summary.total, 1);
    }

    #[test]
    fn test_limit_changed_recomputes() {
        let mut state = DashboardState::new();
        load(&mut state, CSV);

        let outcome = state.handle(Event::LimitChanged {
            table: RankingTable::Cases,
            raw: "2".to_string(),
        });

        assert!(outcome.changed);
        assert_eq!(state.views().unwrap().top_cases.len(), 2);
        assert_eq!(state.limits().cases, Limit::requested(2));
    }

    #[test]
    fn test_limit_changed_before_load() {
        let mut state = DashboardState::new();
        let outcome = state.handle(Event::LimitChanged {
            table: RankingTable::Advocates,
            raw: "abc".to_string(),
        });

        assert!(!outcome.changed);
        assert_eq!(state.limits().advocates, Limit::unset());
    }

    #[test]
    fn test_late_load_is_flagged_stale() {
        let mut state = DashboardState::new();
        let sample_ticket = state.begin_load();
        let upload_ticket = state.begin_load();

        state.handle(Event::UploadSelected {
            ticket: upload_ticket,
            upload: Upload::new("cases.csv", "text/csv"),
            read: Box::new(|| Ok(OTHER_CSV.to_string())),
        });
        let outcome = state.handle(Event::DataLoaded {
            ticket: sample_ticket,
            source: "sample-data.csv".to_string(),
            content: Ok(CSV.to_string()),
        });

        // the late sample still overwrites the upload, but it is reported
        assert!(outcome.stale);
        assert_eq!(state.snapshot().unwrap().source, "sample-data.csv");
    }
}
