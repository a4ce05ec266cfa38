//! Off-grid solar installation sizing: energy audit, battery, PV, inverter,
//! and charge-controller calculators with saved projects.

#[cfg(feature = "api")]
pub mod api;
pub mod audit;
pub mod chat;
pub mod cli;
pub mod config;
pub mod io;
pub mod project;
/// Calculators, sizing report, and optimization advice.
pub mod sizing;
pub mod state;
pub mod store;
