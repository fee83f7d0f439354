//! Matching and energy aggregation engine.

pub mod aggregate;
pub mod decompose;
pub mod estimator;
pub mod matcher;
pub mod report;
/// Decimal rounding helpers.
pub mod rounding;

pub use aggregate::{FloorEnergy, SectionEnergy, SkipReason, SkippedStep, StepCost, StepEnergy};
pub use estimator::{EstimateError, Estimator};
pub use report::{EnergyReport, Estimate};
