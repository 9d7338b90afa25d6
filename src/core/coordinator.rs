use chrono::{DateTime, Local};

use super::alerts::{AlertEngine, AlertReport, AlertThresholds};
use super::model::MonitorSnapshot;
use super::state::MonitorState;

pub struct CoordinatorOutput {
    /// True when the engine ran on this snapshot
    pub changed: bool,
    pub logs: Vec<String>,
}

/// Decides when the alert engine runs. The engine itself caches nothing;
/// the coordinator only re-evaluates when the snapshot or thresholds change.
pub struct Coordinator {
    engine: AlertEngine,
    state: MonitorState,
}

impl Coordinator {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self {
            engine: AlertEngine::new(thresholds),
            state: MonitorState::new(),
        }
    }

    /// Hot-reload thresholds. The next ingest re-evaluates if they changed.
    pub fn update_thresholds(&mut self, thresholds: AlertThresholds) -> bool {
        let changed = self.engine.update_thresholds(thresholds);
        if changed {
            self.state.invalidate();
        }
        changed
    }

    pub fn ingest(&mut self, snapshot: MonitorSnapshot, fetched_at: DateTime<Local>) -> CoordinatorOutput {
        let mut logs = Vec::new();

        if !self.state.is_stale(&snapshot) {
            self.state.mark_success(fetched_at);
            logs.push("Snapshot unchanged, keeping previous alerts".to_string());
            return CoordinatorOutput {
                changed: false,
                logs,
            };
        }

        if snapshot.is_empty() {
            logs.push("Snapshot carried no sections".to_string());
        }

        let report = self.engine.evaluate(&snapshot);
        logs.push(format!(
            "Evaluated snapshot: {} alerts ({} danger, {} warning)",
            report.total, report.danger_count, report.warning_count
        ));
        self.state.store(snapshot, report, fetched_at);

        CoordinatorOutput {
            changed: true,
            logs,
        }
    }

    /// Record a failed fetch; the previous report stays available.
    pub fn record_failure(&mut self, error: impl ToString) -> CoordinatorOutput {
        let error = error.to_string();
        let logs = vec![format!("Fetch failed: {error}")];
        self.state.mark_failure(error);
        CoordinatorOutput {
            changed: false,
            logs,
        }
    }

    pub fn report(&self) -> Option<&AlertReport> {
        self.state.report()
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }
}
