// Terminal rendering of alert reports.
//
// Owns the category -> label table; the engine only emits Category values.

use std::fmt::Write;

use chrono::{DateTime, Local};

use crate::core::alerts::{Alert, AlertReport, Category, Severity};

pub struct CategoryStyle {
    pub tag: &'static str,
    pub label: &'static str,
}

pub fn category_style(category: Category) -> CategoryStyle {
    let (tag, label) = match category {
        Category::Stock => ("STK", "Inventory"),
        Category::Payable => ("PAY", "Supplier payables"),
        Category::Credit => ("CRD", "Customer credit"),
        Category::Market => ("MKT", "Market prices"),
        Category::Wage => ("WAG", "Wages"),
        Category::Savings => ("SAV", "Savings"),
        Category::System => ("SYS", "System health"),
    };
    CategoryStyle { tag, label }
}

pub fn severity_badge(severity: Severity) -> &'static str {
    match severity {
        Severity::Danger => "[DANGER]",
        Severity::Warning => "[WARN]  ",
        Severity::Info => "[INFO]  ",
    }
}

/// Alerts grouped by category, groups in first-appearance order.
/// Within a group the report's ranking is kept.
pub fn group_by_category(report: &AlertReport) -> Vec<(Category, Vec<&Alert>)> {
    report
        .categories
        .iter()
        .map(|category| {
            let alerts = report
                .alerts
                .iter()
                .filter(|alert| alert.category == *category)
                .collect();
            (*category, alerts)
        })
        .collect()
}

pub fn render_report(report: &AlertReport, fetched_at: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Shop monitor @ {} | {} danger / {} warning / {} total",
        fetched_at.format("%Y-%m-%d %H:%M:%S"),
        report.danger_count,
        report.warning_count,
        report.total
    );

    if report.is_empty() {
        out.push_str("All clear\n");
        return out;
    }

    for (category, alerts) in group_by_category(report) {
        let style = category_style(category);
        let _ = writeln!(out, "\n{} {} ({})", style.tag, style.label, alerts.len());
        for alert in alerts {
            let _ = writeln!(out, "  {} {}", severity_badge(alert.severity), alert.title);
            let _ = writeln!(out, "           {}", alert.detail);
        }
    }
    out
}

pub fn render_offline(error: &str, last_success: Option<DateTime<Local>>) -> String {
    let mut out = String::from("Cannot connect to monitor feed\n");
    let _ = writeln!(out, "  {error}");
    if let Some(at) = last_success {
        let _ = writeln!(out, "  Last successful update: {}", at.format("%Y-%m-%d %H:%M:%S"));
    }
    out
}
