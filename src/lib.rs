//! Manufacturing energy estimator.
//!
//! Finds the first factory floor able to produce a product and computes the
//! energy its machine sequence consumes there.

pub mod catalog;
pub mod config;
/// Floor matching and energy aggregation.
pub mod energy;
pub mod io;
pub mod logging;
