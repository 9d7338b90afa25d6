// Trigger evaluation logic for alert sources.
//
// Each trigger scans one section of the monitor snapshot and returns the
// alerts it produces, in the order the section lists its entries. A missing
// section or a missing value never meets a threshold.

use super::model::{Alert, AlertSource, Severity};
use super::thresholds::AlertThresholds;
use crate::core::model::{Balance, MonitorSnapshot, PriceAlert, StockPrediction, WageSummary};

const UNKNOWN: &str = "unknown";

/// Context provided to triggers for evaluation
pub struct TriggerContext<'a> {
    pub snapshot: &'a MonitorSnapshot,
    pub thresholds: &'a AlertThresholds,
}

/// Evaluate one source against the snapshot.
/// Returns the alerts it produced, possibly none.
pub fn evaluate_trigger(source: AlertSource, ctx: &TriggerContext) -> Vec<Alert> {
    match source {
        AlertSource::LowStock => evaluate_low_stock(ctx),
        AlertSource::StockPrediction => evaluate_stock_predictions(ctx),
        AlertSource::Payables => evaluate_payables(ctx),
        AlertSource::Credits => evaluate_credits(ctx),
        AlertSource::Market => evaluate_market(ctx),
        AlertSource::WageBudget => evaluate_wage_budget(ctx),
        AlertSource::SavingsRisk => evaluate_savings(ctx),
        AlertSource::SystemServices => evaluate_services(ctx),
        AlertSource::SystemPorts => evaluate_ports(ctx),
        AlertSource::SystemCpu => evaluate_cpu(ctx),
        AlertSource::SystemRam => evaluate_ram(ctx),
        AlertSource::SystemDisk => evaluate_disk(ctx),
    }
}

fn alert(source: AlertSource, severity: Severity, title: String, detail: String) -> Alert {
    Alert {
        severity,
        category: source.category(),
        title,
        detail,
    }
}

/// Two-tier band with inclusive lower bounds.
fn band(value: Option<f64>, danger: f64, warning: f64) -> Option<Severity> {
    let value = value?;
    if value >= danger {
        Some(Severity::Danger)
    } else if value >= warning {
        Some(Severity::Warning)
    } else {
        None
    }
}

/// Every low-stock entry is a danger alert.
fn evaluate_low_stock(ctx: &TriggerContext) -> Vec<Alert> {
    let Some(inventory) = &ctx.snapshot.inventory else {
        return Vec::new();
    };

    inventory
        .low_stock
        .iter()
        .map(|item| {
            let product = item.product.as_deref().unwrap_or(UNKNOWN);
            let unit = item.unit.as_deref().unwrap_or("");
            let detail = match (item.quantity, item.min_stock) {
                (Some(qty), Some(min)) => {
                    format!("{} left (minimum {})", with_unit(qty, unit), with_unit(min, unit))
                }
                (Some(qty), None) => format!("{} left", with_unit(qty, unit)),
                (None, Some(min)) => format!("Below minimum of {}", with_unit(min, unit)),
                (None, None) => "Below minimum stock".to_string(),
            };
            alert(
                AlertSource::LowStock,
                Severity::Danger,
                format!("Low stock: {product}"),
                detail,
            )
        })
        .collect()
}

/// Reorder suggestions; danger when stock runs out within the danger window.
fn evaluate_stock_predictions(ctx: &TriggerContext) -> Vec<Alert> {
    let Some(inventory) = &ctx.snapshot.inventory else {
        return Vec::new();
    };

    inventory
        .predictions
        .iter()
        .filter(|p| p.suggest_order == Some(true))
        .map(|p| {
            let severity = match p.days_until_zero {
                Some(days) if days <= ctx.thresholds.stock_danger_days => Severity::Danger,
                _ => Severity::Warning,
            };
            alert(
                AlertSource::StockPrediction,
                severity,
                format!("Reorder soon: {}", p.product.as_deref().unwrap_or(UNKNOWN)),
                prediction_detail(p),
            )
        })
        .collect()
}

fn prediction_detail(p: &StockPrediction) -> String {
    let runway = match p.days_until_zero {
        Some(days) => format!("About {days:.1} day(s) of stock left"),
        None => "Order suggested".to_string(),
    };
    match p.daily_usage {
        Some(usage) => format!("{runway}, using {} per day", trim_number(usage)),
        None => runway,
    }
}

/// Supplier balances we owe.
fn evaluate_payables(ctx: &TriggerContext) -> Vec<Alert> {
    let Some(payables) = &ctx.snapshot.payables else {
        return Vec::new();
    };
    let t = ctx.thresholds;

    balance_alerts(
        AlertSource::Payables,
        &payables.suppliers,
        t.payable_danger,
        t.payable_warning,
        |name, amount| (format!("High payable: {name}"), format!("Outstanding balance {amount}")),
    )
}

/// Customer balances owed to the shop.
fn evaluate_credits(ctx: &TriggerContext) -> Vec<Alert> {
    let Some(credits) = &ctx.snapshot.credits else {
        return Vec::new();
    };
    let t = ctx.thresholds;

    balance_alerts(
        AlertSource::Credits,
        &credits.customers,
        t.credit_danger,
        t.credit_warning,
        |name, amount| (format!("Customer credit: {name}"), format!("Owes {amount}")),
    )
}

fn balance_alerts(
    source: AlertSource,
    balances: &[Balance],
    danger: f64,
    warning: f64,
    describe: impl Fn(&str, &str) -> (String, String),
) -> Vec<Alert> {
    balances
        .iter()
        .filter_map(|entry| {
            let severity = band(entry.balance, danger, warning)?;
            let amount = format_amount(entry.balance?);
            let (title, detail) = describe(entry.name.as_deref().unwrap_or(UNKNOWN), &amount);
            Some(alert(source, severity, title, detail))
        })
        .collect()
}

/// Every flagged price change alerts; large moves are danger.
fn evaluate_market(ctx: &TriggerContext) -> Vec<Alert> {
    let Some(market) = &ctx.snapshot.market else {
        return Vec::new();
    };

    market
        .alerts
        .iter()
        .map(|entry| {
            let severity = match entry.change_pct {
                Some(pct) if pct.abs() >= ctx.thresholds.market_danger_pct => Severity::Danger,
                _ => Severity::Warning,
            };
            let (title, detail) = price_text(entry);
            alert(AlertSource::Market, severity, title, detail)
        })
        .collect()
}

fn price_text(entry: &PriceAlert) -> (String, String) {
    let item = entry.item.as_deref().unwrap_or(UNKNOWN);
    let title = match entry.change_pct {
        Some(pct) if pct >= 0.0 => format!("Price rise: {item} +{pct:.1}%"),
        Some(pct) => format!("Price drop: {item} {pct:.1}%"),
        None => format!("Price change: {item}"),
    };
    let detail = match entry.price {
        Some(price) => format!("Current price {}", format_amount(price)),
        None => "Flagged by market monitor".to_string(),
    };
    (title, detail)
}

/// Monthly wage budget usage; bands start strictly above their threshold.
fn evaluate_wage_budget(ctx: &TriggerContext) -> Vec<Alert> {
    let Some(summary) = ctx
        .snapshot
        .employee_stats
        .as_ref()
        .and_then(|stats| stats.monthly_summary.as_ref())
    else {
        return Vec::new();
    };
    let Some(pct) = summary.budget_used_pct else {
        return Vec::new();
    };

    let t = ctx.thresholds;
    let severity = if pct > t.wage_danger_pct {
        Severity::Danger
    } else if pct > t.wage_warning_pct {
        Severity::Warning
    } else {
        return Vec::new();
    };

    vec![alert(
        AlertSource::WageBudget,
        severity,
        format!("Wage budget at {}%", trim_number(pct)),
        wage_detail(summary),
    )]
}

fn wage_detail(summary: &WageSummary) -> String {
    match (summary.total_wages, summary.budget) {
        (Some(total), Some(budget)) => {
            format!("Wages {} of budget {}", format_amount(total), format_amount(budget))
        }
        _ => "Monthly wage spending is above plan".to_string(),
    }
}

/// Savings cover risk as classified by the savings source.
fn evaluate_savings(ctx: &TriggerContext) -> Vec<Alert> {
    let Some(savings) = &ctx.snapshot.savings else {
        return Vec::new();
    };
    let risk = savings.risk.as_deref().map(str::trim).unwrap_or_default();
    let severity = match risk {
        "danger" => Severity::Danger,
        "caution" => Severity::Warning,
        _ => return Vec::new(),
    };

    let detail = match savings.cover_days {
        Some(days) => format!("Savings cover {days:.0} day(s) of expenses"),
        None => "Savings level needs attention".to_string(),
    };
    vec![alert(
        AlertSource::SavingsRisk,
        severity,
        format!("Savings risk: {risk}"),
        detail,
    )]
}

/// Any service not reporting "running".
fn evaluate_services(ctx: &TriggerContext) -> Vec<Alert> {
    let Some(health) = &ctx.snapshot.system_health else {
        return Vec::new();
    };

    health
        .services
        .iter()
        .filter_map(|service| {
            let status = service.status.as_deref()?.trim();
            if status == "running" {
                return None;
            }
            Some(alert(
                AlertSource::SystemServices,
                Severity::Danger,
                format!("Service down: {}", service.name.as_deref().unwrap_or(UNKNOWN)),
                format!("Status: {status}"),
            ))
        })
        .collect()
}

/// Monitored ports that are closed.
fn evaluate_ports(ctx: &TriggerContext) -> Vec<Alert> {
    let Some(health) = &ctx.snapshot.system_health else {
        return Vec::new();
    };

    health
        .ports
        .iter()
        .filter(|port| port.open == Some(false))
        .map(|port| {
            let number = port
                .port
                .map_or_else(|| UNKNOWN.to_string(), |p| p.to_string());
            let title = match port.name.as_deref() {
                Some(name) => format!("Port closed: {number} ({name})"),
                None => format!("Port closed: {number}"),
            };
            alert(
                AlertSource::SystemPorts,
                Severity::Danger,
                title,
                format!("Port {number} is not accepting connections"),
            )
        })
        .collect()
}

fn evaluate_cpu(ctx: &TriggerContext) -> Vec<Alert> {
    let Some(health) = &ctx.snapshot.system_health else {
        return Vec::new();
    };
    let limit = ctx.thresholds.cpu_danger_pct;
    match health.cpu_pct {
        Some(pct) if pct >= limit => vec![alert(
            AlertSource::SystemCpu,
            Severity::Danger,
            format!("CPU usage {}%", trim_number(pct)),
            format!("Processor load at or above {}%", trim_number(limit)),
        )],
        _ => Vec::new(),
    }
}

/// RAM only has a warning tier.
fn evaluate_ram(ctx: &TriggerContext) -> Vec<Alert> {
    let Some(health) = &ctx.snapshot.system_health else {
        return Vec::new();
    };
    let limit = ctx.thresholds.ram_warning_pct;
    match health.ram_pct {
        Some(pct) if pct >= limit => vec![alert(
            AlertSource::SystemRam,
            Severity::Warning,
            format!("Memory usage {}%", trim_number(pct)),
            format!("Memory use at or above {}%", trim_number(limit)),
        )],
        _ => Vec::new(),
    }
}

fn evaluate_disk(ctx: &TriggerContext) -> Vec<Alert> {
    let Some(health) = &ctx.snapshot.system_health else {
        return Vec::new();
    };
    let t = ctx.thresholds;
    let Some(severity) = band(health.disk_pct, t.disk_danger_pct, t.disk_warning_pct) else {
        return Vec::new();
    };
    let pct = health.disk_pct.unwrap_or_default();
    let limit = match severity {
        Severity::Danger => t.disk_danger_pct,
        _ => t.disk_warning_pct,
    };
    vec![alert(
        AlertSource::SystemDisk,
        severity,
        format!("Disk usage {}%", trim_number(pct)),
        format!("Disk use at or above {}%", trim_number(limit)),
    )]
}

fn with_unit(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        trim_number(value)
    } else {
        format!("{} {unit}", trim_number(value))
    }
}

/// Whole numbers without a trailing ".0", everything else to two places.
fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Money with thousands separators; cents only when present.
pub fn format_amount(value: f64) -> String {
    let text = format!("{:.2}", value.abs());
    let (digits, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && text != "0.00" { "-" } else { "" };
    match cents {
        "00" => format!("{sign}{grouped}"),
        _ => format!("{sign}{grouped}.{cents}"),
    }
}
