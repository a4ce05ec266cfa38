use std::fmt;

use serde::Serialize;

use crate::audit::EnergyTotals;

/// Assumed load power factor when converting watts to volt-amperes.
pub const POWER_FACTOR: f64 = 0.85;

/// Headroom band suggested above the bare rating for expansion.
pub const HEADROOM_RANGE: (f64, f64) = (1.2, 1.3);

/// Inverter size derived from the audit's surge total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InverterRating {
    /// Required continuous rating (W), equal to the total surge factor.
    pub watts: f64,
    /// Apparent power at [`POWER_FACTOR`] (VA).
    pub volt_amperes: f64,
}

impl InverterRating {
    pub fn from_totals(totals: &EnergyTotals) -> Self {
        let watts = totals.total_surge_factor;
        Self {
            watts,
            volt_amperes: watts / POWER_FACTOR,
        }
    }

    /// Apparent power in kVA, for display.
    pub fn kva(&self) -> f64 {
        self.volt_amperes / 1000.0
    }

    /// Suggested rating band `(low, high)` in watts including headroom.
    pub fn with_headroom(&self) -> (f64, f64) {
        (self.watts * HEADROOM_RANGE.0, self.watts * HEADROOM_RANGE.1)
    }
}

impl fmt::Display for InverterRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (low, high) = self.with_headroom();
        write!(
            f,
            "{:.0} W / {:.2} kVA (with headroom: {:.0}-{:.0} W)",
            self.watts,
            self.kva(),
            low,
            high
        )
    }
}

/// A recommended inverter manufacturer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InverterBrand {
    pub name: &'static str,
    pub models: &'static [&'static str],
    pub efficiency: &'static str,
}

pub const INVERTER_BRANDS: [InverterBrand; 5] = [
    InverterBrand {
        name: "Victron Energy",
        models: &["MultiPlus", "Quattro"],
        efficiency: "95%+",
    },
    InverterBrand {
        name: "SMA",
        models: &["Sunny Boy", "Sunny Island"],
        efficiency: "97%+",
    },
    InverterBrand {
        name: "Schneider Electric",
        models: &["Conext", "XW Pro"],
        efficiency: "94%+",
    },
    InverterBrand {
        name: "Outback Power",
        models: &["FXR", "Radian"],
        efficiency: "93%+",
    },
    InverterBrand {
        name: "Magnum Energy",
        models: &["MS-PAE", "MMS"],
        efficiency: "90%+",
    },
];
