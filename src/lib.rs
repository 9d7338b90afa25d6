#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
// The ultimate strictness: catches things like missing documentation or overflow risks
#![warn(clippy::restriction)]
pub mod core;
pub mod presentation;

pub mod app;
pub use app::run;
pub use crate::core::alerts::{aggregate_alerts, aggregate_alerts_with};
