// Alert engine - runs every trigger in discovery order and ranks the result.

use super::model::{AlertReport, AlertSource};
use super::thresholds::AlertThresholds;
use super::triggers::{evaluate_trigger, TriggerContext};
use crate::core::model::MonitorSnapshot;

/// Aggregate alerts using the built-in thresholds.
pub fn aggregate_alerts(snapshot: &MonitorSnapshot) -> AlertReport {
    aggregate_alerts_with(snapshot, &AlertThresholds::default())
}

/// Scan the snapshot, rank alerts by severity and count them.
///
/// Alerts of equal severity keep discovery order (`AlertSource::all()`),
/// so identical snapshots always give identical reports.
pub fn aggregate_alerts_with(snapshot: &MonitorSnapshot, thresholds: &AlertThresholds) -> AlertReport {
    let ctx = TriggerContext {
        snapshot,
        thresholds,
    };

    let mut alerts = Vec::new();
    for source in AlertSource::all() {
        alerts.extend(evaluate_trigger(*source, &ctx));
    }

    // stable
    alerts.sort_by_key(|alert| alert.severity);

    AlertReport::from_alerts(alerts)
}

/// Holds the active thresholds so callers can hot-reload them.
#[derive(Debug, Clone, Default)]
pub struct AlertEngine {
    thresholds: AlertThresholds,
}

impl AlertEngine {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Replace the thresholds. Returns true if they actually changed.
    pub fn update_thresholds(&mut self, thresholds: AlertThresholds) -> bool {
        if self.thresholds == thresholds {
            return false;
        }
        self.thresholds = thresholds;
        true
    }

    pub fn evaluate(&self, snapshot: &MonitorSnapshot) -> AlertReport {
        aggregate_alerts_with(snapshot, &self.thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alerts::model::{Category, Severity};
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> MonitorSnapshot {
        serde_json::from_value(value).unwrap()
    }

    fn busy_snapshot() -> MonitorSnapshot {
        snapshot(json!({
            "inventory": {
                "low_stock": [{ "product": "Tomato", "quantity": 2, "unit": "kg", "min_stock": 5 }],
                "predictions": [{ "product": "Onion", "days_until_zero": 3, "suggest_order": true }],
            },
            "payables": { "suppliers": [{ "name": "Farm Co", "balance": 12000 }] },
            "credits": { "customers": [{ "name": "Kim", "balance": 7000 }] },
            "market": { "alerts": [{ "item": "Cabbage", "change_pct": 8 }] },
            "employee_stats": { "monthly_summary": { "budget_used_pct": 95 } },
            "savings": { "risk": "caution" },
            "system_health": {
                "services": [{ "name": "api", "status": "stopped" }],
                "ports": [{ "port": 8888, "open": false }],
                "cpu_pct": 97, "ram_pct": 91, "disk_pct": 85,
            },
        }))
    }

    #[test]
    fn test_empty_snapshot_gives_empty_report() {
        let report = aggregate_alerts(&MonitorSnapshot::default());
        assert_eq!(report, AlertReport::default());
        assert!(report.categories.is_empty());
    }

    #[test]
    fn test_ranked_with_stable_discovery_order() {
        let report = aggregate_alerts(&busy_snapshot());
        let titles: Vec<&str> = report.alerts.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Low stock: Tomato",
                "Customer credit: Kim",
                "Wage budget at 95%",
                "Service down: api",
                "Port closed: 8888",
                "CPU usage 97%",
                "Reorder soon: Onion",
                "High payable: Farm Co",
                "Price rise: Cabbage +8.0%",
                "Savings risk: caution",
                "Memory usage 91%",
                "Disk usage 85%",
            ]
        );
        assert!(report
            .alerts
            .windows(2)
            .all(|pair| pair[0].severity <= pair[1].severity));
    }

    #[test]
    fn test_counts_match_alert_list() {
        let report = aggregate_alerts(&busy_snapshot());
        let dangers = report.alerts.iter().filter(|a| a.severity == Severity::Danger).count();
        let warnings = report.alerts.iter().filter(|a| a.severity == Severity::Warning).count();
        assert_eq!(report.danger_count, dangers);
        assert_eq!(report.warning_count, warnings);
        assert_eq!(report.danger_count, 6);
        assert_eq!(report.warning_count, 6);
        assert_eq!(report.total, 12);
        assert_eq!(
            report.categories,
            vec![
                Category::Stock,
                Category::Credit,
                Category::Wage,
                Category::System,
                Category::Payable,
                Category::Market,
                Category::Savings,
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let snap = busy_snapshot();
        assert_eq!(aggregate_alerts(&snap), aggregate_alerts(&snap.clone()));
    }

    #[test]
    fn test_custom_thresholds_shift_bands() {
        let snap = snapshot(json!({ "payables": { "suppliers": [{ "name": "Farm Co", "balance": 12000 }] } }));
        let mut engine = AlertEngine::default();
        assert_eq!(engine.evaluate(&snap).warning_count, 1);

        let changed = engine.update_thresholds(AlertThresholds {
            payable_danger: 11_000.0,
            payable_warning: 5_000.0,
            ..AlertThresholds::default()
        });
        assert!(changed);
        assert_eq!(engine.evaluate(&snap).danger_count, 1);

        let unchanged = engine.update_thresholds(engine.thresholds().clone());
        assert!(!unchanged);
    }
}
