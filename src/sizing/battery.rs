use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::audit::EnergyTotals;

/// Battery chemistry, which fixes the default depth of discharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatteryChemistry {
    #[default]
    Lithium,
    LeadAcid,
}

impl BatteryChemistry {
    /// Usable fraction of capacity before recharge.
    pub fn default_depth_of_discharge(self) -> f64 {
        match self {
            Self::Lithium => 0.8,
            Self::LeadAcid => 0.5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Lithium => "lithium",
            Self::LeadAcid => "lead-acid",
        }
    }
}

impl fmt::Display for BatteryChemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BatteryChemistry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lithium" => Ok(Self::Lithium),
            "lead-acid" | "lead_acid" | "leadacid" => Ok(Self::LeadAcid),
            other => Err(format!(
                "unknown battery type \"{other}\", expected \"lithium\" or \"lead-acid\""
            )),
        }
    }
}

/// Battery bank design parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryDesignInputs {
    pub battery_type: BatteryChemistry,
    /// Round-trip performance loss factor (0.0–1.0).
    pub performance_loss: f64,
    /// Wiring / temperature loss factor (0.0–1.0).
    pub loss_factor: f64,
    /// Nominal voltage of one battery (V).
    pub preferred_voltage: f64,
    /// Capacity of one battery (Ah).
    pub battery_current_rating: f64,
    /// Explicit depth-of-discharge override (0.0–1.0); chemistry default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_of_discharge: Option<f64>,
}

impl Default for BatteryDesignInputs {
    fn default() -> Self {
        Self {
            battery_type: BatteryChemistry::Lithium,
            performance_loss: 0.85,
            loss_factor: 0.8,
            preferred_voltage: 12.0,
            battery_current_rating: 200.0,
            depth_of_discharge: None,
        }
    }
}

impl BatteryDesignInputs {
    /// Effective depth of discharge: the override if set, else the chemistry default.
    pub fn depth_of_discharge(&self) -> f64 {
        self.depth_of_discharge
            .unwrap_or_else(|| self.battery_type.default_depth_of_discharge())
    }

    /// Usable energy delivered by one battery after losses (Wh).
    pub fn usable_wh_per_battery(&self) -> f64 {
        self.performance_loss
            * self.loss_factor
            * self.depth_of_discharge()
            * self.preferred_voltage
            * self.battery_current_rating
    }
}

/// Number of batteries needed to cover one day of consumption.
///
/// `ceil(E_Wh / (performance_loss × loss_factor × DOD × V × Ah))`.
///
/// Returns `0.0` when the audit has no energy yet. A zero design factor is
/// not intercepted here and yields a non-finite result; callers that render
/// the number decide how to surface it.
///
/// # Examples
///
/// ```
/// use solar_sizer::audit::EnergyTotals;
/// use solar_sizer::sizing::battery::{number_of_batteries, BatteryDesignInputs};
///
/// let totals = EnergyTotals { total_raw_energy: 1.0, total_surge_factor: 200.0 };
/// assert_eq!(number_of_batteries(&totals, &BatteryDesignInputs::default()), 1.0);
/// ```
pub fn number_of_batteries(totals: &EnergyTotals, inputs: &BatteryDesignInputs) -> f64 {
    if totals.has_no_energy() {
        return 0.0;
    }
    (totals.total_raw_energy_wh() / inputs.usable_wh_per_battery()).ceil()
}
