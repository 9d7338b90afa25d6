// Alert band thresholds.
//
// Defaults are the dashboard's built-in bands. The settings file may override
// any subset; the engine takes the struct as an explicit parameter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PAYABLE_DANGER: f64 = 20_000.0;
pub const PAYABLE_WARNING: f64 = 10_000.0;
pub const CREDIT_DANGER: f64 = 5_000.0;
pub const CREDIT_WARNING: f64 = 2_000.0;
pub const MARKET_DANGER_PCT: f64 = 20.0;
pub const WAGE_DANGER_PCT: f64 = 90.0;
pub const WAGE_WARNING_PCT: f64 = 70.0;
pub const STOCK_DANGER_DAYS: f64 = 1.0;
pub const CPU_DANGER_PCT: f64 = 90.0;
pub const RAM_WARNING_PCT: f64 = 90.0;
pub const DISK_DANGER_PCT: f64 = 90.0;
pub const DISK_WARNING_PCT: f64 = 80.0;

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("threshold `{0}` must be a finite number")]
    NotFinite(&'static str),
    #[error("warning threshold `{warning}` must not exceed danger threshold `{danger}`")]
    InvertedBand {
        warning: &'static str,
        danger: &'static str,
    },
}

/// Band boundaries used by the engine. Lower bounds are inclusive except
/// for wage usage, whose bands start strictly above their value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    pub payable_danger: f64,
    pub payable_warning: f64,
    pub credit_danger: f64,
    pub credit_warning: f64,
    /// Absolute price move (percent) that makes a market alert danger
    pub market_danger_pct: f64,
    pub wage_danger_pct: f64,
    pub wage_warning_pct: f64,
    /// Days of stock left at or below which a reorder is danger
    pub stock_danger_days: f64,
    pub cpu_danger_pct: f64,
    pub ram_warning_pct: f64,
    pub disk_danger_pct: f64,
    pub disk_warning_pct: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            payable_danger: PAYABLE_DANGER,
            payable_warning: PAYABLE_WARNING,
            credit_danger: CREDIT_DANGER,
            credit_warning: CREDIT_WARNING,
            market_danger_pct: MARKET_DANGER_PCT,
            wage_danger_pct: WAGE_DANGER_PCT,
            wage_warning_pct: WAGE_WARNING_PCT,
            stock_danger_days: STOCK_DANGER_DAYS,
            cpu_danger_pct: CPU_DANGER_PCT,
            ram_warning_pct: RAM_WARNING_PCT,
            disk_danger_pct: DISK_DANGER_PCT,
            disk_warning_pct: DISK_WARNING_PCT,
        }
    }
}

impl AlertThresholds {
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let values = [
            ("payable_danger", self.payable_danger),
            ("payable_warning", self.payable_warning),
            ("credit_danger", self.credit_danger),
            ("credit_warning", self.credit_warning),
            ("market_danger_pct", self.market_danger_pct),
            ("wage_danger_pct", self.wage_danger_pct),
            ("wage_warning_pct", self.wage_warning_pct),
            ("stock_danger_days", self.stock_danger_days),
            ("cpu_danger_pct", self.cpu_danger_pct),
            ("ram_warning_pct", self.ram_warning_pct),
            ("disk_danger_pct", self.disk_danger_pct),
            ("disk_warning_pct", self.disk_warning_pct),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(ThresholdError::NotFinite(name));
            }
        }

        let bands = [
            ("payable_warning", self.payable_warning, "payable_danger", self.payable_danger),
            ("credit_warning", self.credit_warning, "credit_danger", self.credit_danger),
            ("wage_warning_pct", self.wage_warning_pct, "wage_danger_pct", self.wage_danger_pct),
            ("disk_warning_pct", self.disk_warning_pct, "disk_danger_pct", self.disk_danger_pct),
        ];
        for (warning, warning_value, danger, danger_value) in bands {
            if warning_value > danger_value {
                return Err(ThresholdError::InvertedBand { warning, danger });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(AlertThresholds::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let thresholds: AlertThresholds =
            serde_json::from_str(r#"{ "payable_danger": 30000 }"#).unwrap();
        assert_eq!(thresholds.payable_danger, 30_000.0);
        assert_eq!(thresholds.payable_warning, PAYABLE_WARNING);
        assert_eq!(thresholds.disk_warning_pct, DISK_WARNING_PCT);
    }

    #[test]
    fn test_inverted_band_rejected() {
        let thresholds = AlertThresholds {
            credit_warning: 6_000.0,
            ..AlertThresholds::default()
        };
        assert_eq!(
            thresholds.validate(),
            Err(ThresholdError::InvertedBand {
                warning: "credit_warning",
                danger: "credit_danger",
            })
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let thresholds = AlertThresholds {
            cpu_danger_pct: f64::NAN,
            ..AlertThresholds::default()
        };
        assert_eq!(
            thresholds.validate(),
            Err(ThresholdError::NotFinite("cpu_danger_pct"))
        );
    }
}
