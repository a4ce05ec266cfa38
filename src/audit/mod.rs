//! Appliance inventory: validation, derived per-appliance figures, and totals.

/// Appliance records and form validation.
pub mod appliance;
/// Energy aggregation over an appliance list.
pub mod energy;
pub mod input;

pub use appliance::{Appliance, ApplianceForm, ApplianceId, AuditError};
pub use energy::{EnergyAuditData, EnergyTotals};
pub use input::NumericInput;
