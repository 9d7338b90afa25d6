use chrono::{DateTime, Local};

use super::alerts::AlertReport;
use super::model::MonitorSnapshot;

/// Last known snapshot and the report computed from it.
#[derive(Debug, Default)]
pub struct MonitorState {
    snapshot: Option<MonitorSnapshot>,
    report: Option<AlertReport>,
    last_success: Option<DateTime<Local>>,
    last_error: Option<String>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `snapshot` differs from the one the current report was built from.
    pub fn is_stale(&self, snapshot: &MonitorSnapshot) -> bool {
        self.report.is_none() || self.snapshot.as_ref() != Some(snapshot)
    }

    pub fn store(&mut self, snapshot: MonitorSnapshot, report: AlertReport, at: DateTime<Local>) {
        self.snapshot = Some(snapshot);
        self.report = Some(report);
        self.last_success = Some(at);
        self.last_error = None;
    }

    pub fn mark_success(&mut self, at: DateTime<Local>) {
        self.last_success = Some(at);
        self.last_error = None;
    }

    pub fn mark_failure(&mut self, error: String) {
        self.last_error = Some(error);
    }

    /// Drop the cached report so the next snapshot is evaluated again.
    pub fn invalidate(&mut self) {
        self.report = None;
    }

    pub fn report(&self) -> Option<&AlertReport> {
        self.report.as_ref()
    }

    pub fn last_success(&self) -> Option<DateTime<Local>> {
        self.last_success
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
