//! Closed-form sizing calculators and the recommendation selector.

pub mod advice;
/// Battery bank sizing.
pub mod battery;
pub mod controller;
/// Inverter rating and brand catalog.
pub mod inverter;
/// PV array sizing and site presets.
pub mod pv;
pub mod report;

pub use advice::OptimizationAdvice;
pub use battery::{BatteryChemistry, BatteryDesignInputs};
pub use controller::{ChargeControllerRecommendation, ControllerTopology};
pub use inverter::InverterRating;
pub use pv::PvDesignInputs;
pub use report::{Sizing, SizingReport};
