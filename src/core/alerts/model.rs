// Alert model types produced by the aggregation engine.
//
// NOTE: the dashboard frontend reads the serialized report; field names in
// `AlertReport` are camelCase to match it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Alert severity, ordered for ranking: danger sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Danger,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business area an alert belongs to. Display metadata (labels, icons)
/// is owned by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Stock,
    Payable,
    Credit,
    Market,
    Wage,
    Savings,
    System,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Payable => "payable",
            Self::Credit => "credit",
            Self::Market => "market",
            Self::Wage => "wage",
            Self::Savings => "savings",
            Self::System => "system",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Stock,
            Self::Payable,
            Self::Credit,
            Self::Market,
            Self::Wage,
            Self::Savings,
            Self::System,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feed sections scanned by the engine, in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertSource {
    /// Items already under their minimum stock level
    LowStock,
    /// Depletion forecasts that suggest reordering
    StockPrediction,
    /// Supplier balances we owe
    Payables,
    /// Customer balances owed to us
    Credits,
    /// Flagged market price moves
    Market,
    /// Monthly wage budget usage
    WageBudget,
    /// Savings cover risk level
    SavingsRisk,
    SystemServices,
    SystemPorts,
    SystemCpu,
    SystemRam,
    SystemDisk,
}

impl AlertSource {
    pub fn category(&self) -> Category {
        match self {
            Self::LowStock | Self::StockPrediction => Category::Stock,
            Self::Payables => Category::Payable,
            Self::Credits => Category::Credit,
            Self::Market => Category::Market,
            Self::WageBudget => Category::Wage,
            Self::SavingsRisk => Category::Savings,
            Self::SystemServices
            | Self::SystemPorts
            | Self::SystemCpu
            | Self::SystemRam
            | Self::SystemDisk => Category::System,
        }
    }

    /// All sources in the fixed order the engine processes them.
    pub fn all() -> &'static [AlertSource] {
        &[
            Self::LowStock,
            Self::StockPrediction,
            Self::Payables,
            Self::Credits,
            Self::Market,
            Self::WageBudget,
            Self::SavingsRisk,
            Self::SystemServices,
            Self::SystemPorts,
            Self::SystemCpu,
            Self::SystemRam,
            Self::SystemDisk,
        ]
    }
}

/// A single derived alert. Recomputed on every run, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub category: Category,
    pub title: String,
    pub detail: String,
}

/// Ranked alerts plus summary counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertReport {
    pub alerts: Vec<Alert>,
    pub danger_count: usize,
    pub warning_count: usize,
    pub total: usize,
    /// Distinct categories in first-appearance order
    pub categories: Vec<Category>,
}

impl AlertReport {
    /// Build the summary from an already ranked alert list in one pass.
    pub fn from_alerts(alerts: Vec<Alert>) -> Self {
        let mut danger_count = 0;
        let mut warning_count = 0;
        let mut categories = Vec::new();

        for alert in &alerts {
            match alert.severity {
                Severity::Danger => danger_count += 1,
                Severity::Warning => warning_count += 1,
                Severity::Info => {}
            }
            if !categories.contains(&alert.category) {
                categories.push(alert.category);
            }
        }

        Self {
            total: alerts.len(),
            alerts,
            danger_count,
            warning_count,
            categories,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(severity: Severity, category: Category) -> Alert {
        Alert {
            severity,
            category,
            title: "t".to_string(),
            detail: "d".to_string(),
        }
    }

    #[test]
    fn test_severity_rank_order() {
        assert!(Severity::Danger < Severity::Warning);
        assert!(Severity::Warning < Severity::Info);
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn test_every_category_has_a_source() {
        for category in Category::all() {
            assert!(AlertSource::all().iter().any(|s| s.category() == *category));
        }
    }

    #[test]
    fn test_report_counts_and_category_order() {
        let report = AlertReport::from_alerts(vec![
            alert(Severity::Danger, Category::System),
            alert(Severity::Danger, Category::Stock),
            alert(Severity::Warning, Category::System),
            alert(Severity::Info, Category::Market),
        ]);
        assert_eq!(report.danger_count, 2);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.total, 4);
        assert_eq!(
            report.categories,
            vec![Category::System, Category::Stock, Category::Market]
        );
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = AlertReport::from_alerts(vec![alert(Severity::Warning, Category::Wage)]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["dangerCount"], 0);
        assert_eq!(value["warningCount"], 1);
        assert_eq!(value["categories"][0], "wage");
        assert_eq!(value["alerts"][0]["severity"], "warning");
    }
}
