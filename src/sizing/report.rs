//! Sizing report gathering every calculator output for one design.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use super::battery::{BatteryChemistry, BatteryDesignInputs, number_of_batteries};
use super::controller::ChargeControllerRecommendation;
use super::inverter::InverterRating;
use super::pv::{PvDesignInputs, number_of_panels, total_pv_capacity};
use crate::audit::{EnergyAuditData, EnergyTotals};

pub const BATTERY_NOT_READY: &str =
    "Complete the Energy Audit first to calculate battery requirements";
pub const PV_NOT_READY: &str = "Complete the Energy Audit first to calculate PV requirements";
pub const INVERTER_NOT_READY: &str =
    "Complete the Energy Audit first to calculate inverter requirements";
pub const CONTROLLER_NOT_READY: &str = "Complete the Energy Audit and PV Design first";

/// Outcome of one calculator.
///
/// `NotReady` carries guidance for the user when an upstream total is zero.
/// `Undefined` flags a formula fed a zero or negative design factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Sizing<T> {
    Ready(T),
    NotReady(&'static str),
    Undefined(String),
}

impl<T> Sizing<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl<T: fmt::Display> fmt::Display for Sizing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(v) => write!(f, "{v}"),
            Self::NotReady(guidance) => write!(f, "{guidance}"),
            Self::Undefined(reason) => write!(f, "cannot size: {reason}"),
        }
    }
}

/// Battery bank result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryBank {
    pub count: u64,
    pub chemistry: BatteryChemistry,
    pub depth_of_discharge: f64,
    /// Usable energy per battery after losses (Wh).
    pub usable_wh_per_battery: f64,
}

impl fmt::Display for BatteryBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} battery (DOD {:.0}%, {:.0} Wh usable each)",
            self.count,
            self.chemistry,
            self.depth_of_discharge * 100.0,
            self.usable_wh_per_battery
        )
    }
}

/// PV array result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PvArray {
    pub panels: u64,
    pub panel_wattage: f64,
    /// Installed capacity (W).
    pub total_capacity_w: f64,
}

impl fmt::Display for PvArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {:.0} W panels = {:.0} W",
            self.panels, self.panel_wattage, self.total_capacity_w
        )
    }
}

/// Every calculator output for one audit and parameter set.
///
/// Rebuilt from scratch on each call; nothing is carried between reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingReport {
    pub totals: EnergyTotals,
    pub battery: Sizing<BatteryBank>,
    pub pv: Sizing<PvArray>,
    pub inverter: Sizing<InverterRating>,
    pub charge_controller: Sizing<ChargeControllerRecommendation>,
}

impl SizingReport {
    /// Runs every calculator against the current design.
    ///
    /// # Arguments
    ///
    /// * `audit` - Appliance inventory and totals
    /// * `battery` - Battery bank parameters
    /// * `pv` - PV array parameters
    pub fn new(audit: &EnergyAuditData, battery: &BatteryDesignInputs, pv: &PvDesignInputs) -> Self {
        let totals = audit.totals();

        let battery_sizing = if totals.has_no_energy() {
            Sizing::NotReady(BATTERY_NOT_READY)
        } else {
            match finite_count(number_of_batteries(&totals, battery), "battery count") {
                Ok(count) => Sizing::Ready(BatteryBank {
                    count,
                    chemistry: battery.battery_type,
                    depth_of_discharge: battery.depth_of_discharge(),
                    usable_wh_per_battery: battery.usable_wh_per_battery(),
                }),
                Err(reason) => Sizing::Undefined(reason),
            }
        };

        let pv_sizing = if totals.has_no_energy() {
            Sizing::NotReady(PV_NOT_READY)
        } else {
            match finite_count(number_of_panels(&totals, pv), "panel count") {
                Ok(panels) => Sizing::Ready(PvArray {
                    panels,
                    panel_wattage: pv.pv_wattage,
                    total_capacity_w: total_pv_capacity(panels as f64, pv),
                }),
                Err(reason) => Sizing::Undefined(reason),
            }
        };

        let inverter = if totals.total_surge_factor == 0.0 {
            Sizing::NotReady(INVERTER_NOT_READY)
        } else {
            Sizing::Ready(InverterRating::from_totals(&totals))
        };

        let charge_controller = match &pv_sizing {
            Sizing::Ready(array) => Sizing::Ready(ChargeControllerRecommendation::select(
                array.total_capacity_w,
                battery.battery_type,
            )),
            Sizing::NotReady(_) => Sizing::NotReady(CONTROLLER_NOT_READY),
            Sizing::Undefined(reason) => Sizing::Undefined(reason.clone()),
        };

        Self {
            totals,
            battery: battery_sizing,
            pv: pv_sizing,
            inverter,
            charge_controller,
        }
    }
}

fn finite_count(raw: f64, what: &str) -> Result<u64, String> {
    // ceil of a small negative ratio is -0.0, so test the sign bit.
    if raw.is_finite() && raw.is_sign_positive() {
        Ok(raw as u64)
    } else {
        warn!(value = raw, "{what} is not a usable count");
        Err(format!(
            "{what} is undefined because a design factor is zero or negative"
        ))
    }
}

impl fmt::Display for SizingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Sizing Report ---")?;
        writeln!(
            f,
            "Total raw energy:      {:.2} kWh/day",
            self.totals.total_raw_energy
        )?;
        writeln!(
            f,
            "Total surge factor:    {:.0} W",
            self.totals.total_surge_factor
        )?;
        writeln!(f, "Batteries:             {}", self.battery)?;
        writeln!(f, "PV array:              {}", self.pv)?;
        writeln!(f, "Inverter:              {}", self.inverter)?;
        write!(f, "Charge controller:     {}", self.charge_controller)
    }
}
