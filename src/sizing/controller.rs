//! Charge-controller topology and rating selection.

use std::fmt;

use serde::Serialize;

use super::battery::BatteryChemistry;

/// Arrays at or below this size get a PWM controller.
pub const PWM_MAX_PV_WATTS: f64 = 1000.0;

/// Margin applied to array current when rating the controller.
pub const CONTROLLER_SAFETY_FACTOR: f64 = 1.25;

/// Charge-controller regulation topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ControllerTopology {
    Pwm,
    Mppt,
}

impl ControllerTopology {
    /// Selects the topology for an array size: PWM up to 1 kW, MPPT above.
    pub fn for_array(total_pv_watts: f64) -> Self {
        if total_pv_watts <= PWM_MAX_PV_WATTS {
            Self::Pwm
        } else {
            Self::Mppt
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Pwm => "Pulse Width Modulation - Cost-effective for smaller systems",
            Self::Mppt => "Maximum Power Point Tracking - Higher efficiency for larger systems",
        }
    }

    /// Fixed catalog of controllers for this topology.
    pub fn catalog(self) -> &'static [ControllerModel] {
        match self {
            Self::Pwm => &PWM_CONTROLLERS,
            Self::Mppt => &MPPT_CONTROLLERS,
        }
    }
}

impl fmt::Display for ControllerTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pwm => f.write_str("PWM"),
            Self::Mppt => f.write_str("MPPT"),
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerModel {
    pub brand: &'static str,
    pub model: &'static str,
    pub rating: &'static str,
    pub voltage: &'static str,
}

pub const PWM_CONTROLLERS: [ControllerModel; 3] = [
    ControllerModel {
        brand: "Renogy",
        model: "Wanderer",
        rating: "10A-40A",
        voltage: "12V/24V",
    },
    ControllerModel {
        brand: "AIMS Power",
        model: "PWM Series",
        rating: "10A-60A",
        voltage: "12V/24V",
    },
    ControllerModel {
        brand: "Morningstar",
        model: "SunSaver",
        rating: "6A-20A",
        voltage: "12V/24V",
    },
];

pub const MPPT_CONTROLLERS: [ControllerModel; 4] = [
    ControllerModel {
        brand: "Victron Energy",
        model: "BlueSolar/SmartSolar",
        rating: "15A-100A",
        voltage: "12V/24V/48V",
    },
    ControllerModel {
        brand: "Renogy",
        model: "Rover Series",
        rating: "20A-100A",
        voltage: "12V/24V/48V",
    },
    ControllerModel {
        brand: "Morningstar",
        model: "TriStar MPPT",
        rating: "45A-60A",
        voltage: "12V/24V/48V",
    },
    ControllerModel {
        brand: "Outback Power",
        model: "FlexMax",
        rating: "60A-80A",
        voltage: "12V/24V/48V",
    },
];

/// Bank voltage assumed when rating the controller current.
pub fn system_voltage(chemistry: BatteryChemistry) -> f64 {
    match chemistry {
        BatteryChemistry::Lithium => 48.0,
        BatteryChemistry::LeadAcid => 24.0,
    }
}

/// Battery voltages a controller should support for this chemistry.
pub fn compatible_battery_voltages(chemistry: BatteryChemistry) -> &'static str {
    match chemistry {
        BatteryChemistry::Lithium => "12V/24V/48V",
        BatteryChemistry::LeadAcid => "12V/24V",
    }
}

/// Selected controller topology, current rating, and catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeControllerRecommendation {
    pub topology: ControllerTopology,
    /// Array size the recommendation was made for (W).
    pub total_pv_watts: f64,
    /// Minimum controller current (A).
    pub rating_amps: f64,
    pub battery_voltages: &'static str,
    pub catalog: &'static [ControllerModel],
}

impl ChargeControllerRecommendation {
    /// Applies the threshold rule and sizes the controller current.
    ///
    /// `rating = ceil(total_pv_watts × 1.25 / system_voltage)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use solar_sizer::sizing::battery::BatteryChemistry;
    /// use solar_sizer::sizing::controller::{ChargeControllerRecommendation, ControllerTopology};
    ///
    /// let rec = ChargeControllerRecommendation::select(800.0, BatteryChemistry::LeadAcid);
    /// assert_eq!(rec.topology, ControllerTopology::Pwm);
    /// assert_eq!(rec.rating_amps, 42.0);
    /// ```
    pub fn select(total_pv_watts: f64, chemistry: BatteryChemistry) -> Self {
        let topology = ControllerTopology::for_array(total_pv_watts);
        let rating_amps =
            (total_pv_watts * CONTROLLER_SAFETY_FACTOR / system_voltage(chemistry)).ceil();
        Self {
            topology,
            total_pv_watts,
            rating_amps,
            battery_voltages: compatible_battery_voltages(chemistry),
            catalog: topology.catalog(),
        }
    }
}

impl fmt::Display for ChargeControllerRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.0} A for {:.0} W array ({} batteries)",
            self.topology, self.rating_amps, self.total_pv_watts, self.battery_voltages
        )
    }
}
