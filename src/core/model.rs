// Monitor feed snapshot types.
//
// The feed is assembled from several independent sources, so every section
// is optional and every field is decoded leniently: a missing, null or
// malformed value becomes `None` instead of failing the whole document.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// One fetch of the monitor feed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MonitorSnapshot {
    /// Feed generation time as reported by the source, if any
    #[serde(default, alias = "generated_at", deserialize_with = "lenient_string")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub inventory: Option<Inventory>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub payables: Option<Payables>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub credits: Option<Credits>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub market: Option<Market>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub employee_stats: Option<EmployeeStats>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub savings: Option<Savings>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub system_health: Option<SystemHealth>,
}

impl MonitorSnapshot {
    /// True when no section carried any data.
    pub fn is_empty(&self) -> bool {
        self.inventory.is_none()
            && self.payables.is_none()
            && self.credits.is_none()
            && self.market.is_none()
            && self.employee_stats.is_none()
            && self.savings.is_none()
            && self.system_health.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Inventory {
    #[serde(default, deserialize_with = "lenient_list")]
    pub low_stock: Vec<LowStockItem>,
    /// Stock depletion forecast per product
    #[serde(default, alias = "stock_predictions", deserialize_with = "lenient_list")]
    pub predictions: Vec<StockPrediction>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LowStockItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub min_stock: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StockPrediction {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub days_until_zero: Option<f64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub suggest_order: Option<bool>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub daily_usage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Payables {
    #[serde(default, deserialize_with = "lenient_list")]
    pub suppliers: Vec<Balance>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Credits {
    #[serde(default, deserialize_with = "lenient_list")]
    pub customers: Vec<Balance>,
}

/// Outstanding balance owed to a supplier or by a customer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Balance {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub balance: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Market {
    /// Price changes the market source flagged
    #[serde(default, alias = "price_alerts", deserialize_with = "lenient_list")]
    pub alerts: Vec<PriceAlert>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PriceAlert {
    #[serde(default, alias = "product", deserialize_with = "lenient_string")]
    pub item: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub change_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EmployeeStats {
    #[serde(default, deserialize_with = "lenient_section")]
    pub monthly_summary: Option<WageSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WageSummary {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub budget_used_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_wages: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Savings {
    /// "safe", "caution" or "danger"
    #[serde(default, deserialize_with = "lenient_string")]
    pub risk: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cover_days: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SystemHealth {
    #[serde(default, deserialize_with = "lenient_list")]
    pub services: Vec<ServiceStatus>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub ports: Vec<PortStatus>,
    #[serde(default, alias = "cpu_percent", deserialize_with = "lenient_f64")]
    pub cpu_pct: Option<f64>,
    #[serde(default, alias = "ram_percent", deserialize_with = "lenient_f64")]
    pub ram_pct: Option<f64>,
    #[serde(default, alias = "disk_percent", deserialize_with = "lenient_f64")]
    pub disk_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceStatus {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PortStatus {
    #[serde(default, deserialize_with = "lenient_port")]
    pub port: Option<u16>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub open: Option<bool>,
}

/// Finite numbers and numeric strings; anything else is missing.
pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn lenient_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value)
        .filter(|n| n.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(n))
        .map(|n| n as u16))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool())
}

/// A section that does not decode is treated as absent.
fn lenient_section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Malformed list entries are dropped, the rest of the list is kept.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: Value) -> MonitorSnapshot {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_document_has_no_sections() {
        let snap = snapshot(json!({}));
        assert!(snap.is_empty());
        assert_eq!(snap, MonitorSnapshot::default());
    }

    #[test]
    fn test_null_sections_are_absent() {
        let snap = snapshot(json!({
            "inventory": null,
            "payables": null,
            "system_health": null,
        }));
        assert!(snap.is_empty());
    }

    #[test]
    fn test_malformed_section_is_absent() {
        let snap = snapshot(json!({
            "inventory": "offline",
            "payables": [1, 2, 3],
            "savings": { "risk": "caution", "cover_days": 12 },
        }));
        assert!(snap.inventory.is_none());
        assert!(snap.payables.is_none());
        let savings = snap.savings.unwrap();
        assert_eq!(savings.risk.as_deref(), Some("caution"));
        assert_eq!(savings.cover_days, Some(12.0));
    }

    #[test]
    fn test_numbers_decode_leniently() {
        let snap = snapshot(json!({
            "payables": { "suppliers": [
                { "name": "Farm Co", "balance": "15000.5" },
                { "name": "Fish Co", "balance": null },
                { "name": "Rice Co", "balance": "n/a" },
                { "name": "Salt Co", "balance": "NaN" },
            ]}
        }));
        let balances: Vec<Option<f64>> = snap
            .payables
            .unwrap()
            .suppliers
            .iter()
            .map(|s| s.balance)
            .collect();
        assert_eq!(balances, vec![Some(15000.5), None, None, None]);
    }

    #[test]
    fn test_malformed_list_entries_are_dropped() {
        let snap = snapshot(json!({
            "inventory": { "low_stock": [
                "garbage",
                { "product": "Tomato", "quantity": 2, "unit": "kg", "min_stock": 5 },
                42,
            ]}
        }));
        let inventory = snap.inventory.unwrap();
        assert_eq!(inventory.low_stock.len(), 1);
        assert_eq!(inventory.low_stock[0].product.as_deref(), Some("Tomato"));
        assert!(inventory.predictions.is_empty());
    }

    #[test]
    fn test_aliases_and_ports() {
        let snap = snapshot(json!({
            "generated_at": "2026-10-19T09:00:00",
            "inventory": { "stock_predictions": [
                { "product": "Onion", "days_until_zero": 0.5, "suggest_order": true }
            ]},
            "system_health": {
                "cpu_percent": 91.5,
                "ports": [
                    { "port": 8888, "open": false },
                    { "port": 70000, "open": false },
                    { "port": 22, "open": "no" },
                ],
            },
        }));
        assert_eq!(snap.updated_at.as_deref(), Some("2026-10-19T09:00:00"));
        assert_eq!(snap.inventory.unwrap().predictions[0].suggest_order, Some(true));

        let health = snap.system_health.unwrap();
        assert_eq!(health.cpu_pct, Some(91.5));
        assert_eq!(health.ports[0].port, Some(8888));
        assert_eq!(health.ports[1].port, None);
        assert_eq!(health.ports[2].open, None);
    }
}
