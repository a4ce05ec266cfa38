use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::appliance::{Appliance, ApplianceForm, ApplianceId, AuditError};

/// Aggregate energy figures over an appliance list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyTotals {
    /// Sum of daily consumption (kWh).
    pub total_raw_energy: f64,
    /// Sum of surge factors (W).
    pub total_surge_factor: f64,
}

impl EnergyTotals {
    /// Folds an appliance list into its totals.
    pub fn from_appliances(appliances: &[Appliance]) -> Self {
        appliances.iter().fold(Self::default(), |acc, a| Self {
            total_raw_energy: acc.total_raw_energy + a.daily_consumption(),
            total_surge_factor: acc.total_surge_factor + a.surge_factor(),
        })
    }

    /// Total daily energy in watt-hours.
    pub fn total_raw_energy_wh(&self) -> f64 {
        self.total_raw_energy * 1000.0
    }

    /// True while the audit has no consumption to size against.
    pub fn has_no_energy(&self) -> bool {
        self.total_raw_energy == 0.0
    }
}

/// Ordered appliance inventory plus its aggregates.
///
/// The totals are rebuilt from the full list on every change, so they never
/// drift from the appliances they summarise. Stored totals are ignored on
/// deserialization and recomputed the same way.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "StoredAudit")]
pub struct EnergyAuditData {
    appliances: Vec<Appliance>,
    #[serde(flatten)]
    totals: EnergyTotals,
    /// Highest appliance id ever issued; ids are never reused.
    last_id: u64,
}

#[derive(Deserialize)]
struct StoredAudit {
    #[serde(default)]
    appliances: Vec<Appliance>,
    #[serde(default)]
    last_id: u64,
}

impl From<StoredAudit> for EnergyAuditData {
    fn from(raw: StoredAudit) -> Self {
        let mut audit = Self::from_appliances(raw.appliances);
        audit.last_id = audit.last_id.max(raw.last_id);
        audit
    }
}

impl EnergyAuditData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds audit data from existing appliances, computing totals.
    pub fn from_appliances(appliances: Vec<Appliance>) -> Self {
        let totals = EnergyTotals::from_appliances(&appliances);
        let last_id = appliances.iter().map(|a| a.id().0).max().unwrap_or(0);
        Self {
            appliances,
            totals,
            last_id,
        }
    }

    pub fn appliances(&self) -> &[Appliance] {
        &self.appliances
    }

    pub fn totals(&self) -> EnergyTotals {
        self.totals
    }

    pub fn is_empty(&self) -> bool {
        self.appliances.is_empty()
    }

    /// Identity the next added appliance will receive.
    pub fn next_id(&self) -> ApplianceId {
        ApplianceId(self.last_id + 1)
    }

    /// Validates a form and appends the resulting appliance.
    ///
    /// # Errors
    ///
    /// Returns the validation error unchanged; the audit is left untouched.
    pub fn add_form(&mut self, form: &ApplianceForm) -> Result<&Appliance, AuditError> {
        let appliance = form.build(self.next_id())?;
        Ok(self.push(appliance))
    }

    /// Appends a prebuilt appliance and recomputes totals.
    pub fn push(&mut self, appliance: Appliance) -> &Appliance {
        info!(
            id = %appliance.id(),
            name = appliance.name(),
            daily_kwh = appliance.daily_consumption(),
            "appliance added"
        );
        self.last_id = self.last_id.max(appliance.id().0);
        self.appliances.push(appliance);
        self.recompute();
        let last = self.appliances.len() - 1;
        &self.appliances[last]
    }

    /// Removes the appliance with the given identity.
    ///
    /// Returns the removed appliance, or `None` if no appliance matched.
    pub fn remove(&mut self, id: ApplianceId) -> Option<Appliance> {
        let idx = self.appliances.iter().position(|a| a.id() == id)?;
        let removed = self.appliances.remove(idx);
        self.recompute();
        info!(id = %id, name = removed.name(), "appliance removed");
        Some(removed)
    }

    fn recompute(&mut self) {
        self.totals = EnergyTotals::from_appliances(&self.appliances);
        debug!(
            kwh = self.totals.total_raw_energy,
            surge_w = self.totals.total_surge_factor,
            "energy totals recomputed"
        );
    }
}
