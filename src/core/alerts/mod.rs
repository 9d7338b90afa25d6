// Alert aggregation over monitor snapshots.
//
// Architecture:
// - model.rs: Severity, Category, Alert and the ranked AlertReport
// - thresholds.rs: Band boundaries, overridable from settings
// - triggers.rs: Per-section derivation rules
// - engine.rs: Runs triggers in discovery order, ranks and counts

pub mod engine;
pub mod model;
pub mod thresholds;
pub mod triggers;

pub use engine::{aggregate_alerts, aggregate_alerts_with, AlertEngine};
pub use model::{Alert, AlertReport, Category, Severity};
pub use thresholds::AlertThresholds;
