use serde::{Deserialize, Serialize};

use crate::audit::EnergyTotals;

/// PV array design parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PvDesignInputs {
    /// Module performance factor (0.0–1.0).
    pub performance_factor: f64,
    /// System loss factor (0.0–1.0).
    pub loss_factor: f64,
    /// Equivalent full-sun hours per day at the site.
    #[serde(alias = "peak_sun_hour")]
    pub peak_sun_hours: f64,
    /// Rated power of one panel (W).
    pub pv_wattage: f64,
    /// Free-text site name.
    pub location: String,
}

impl Default for PvDesignInputs {
    fn default() -> Self {
        Self {
            performance_factor: 0.65,
            loss_factor: 0.85,
            peak_sun_hours: 5.5,
            pv_wattage: 180.0,
            location: String::new(),
        }
    }
}

impl PvDesignInputs {
    /// Energy one panel yields per day after derating (Wh).
    pub fn derated_wh_per_panel(&self) -> f64 {
        self.performance_factor * self.loss_factor * self.peak_sun_hours * self.pv_wattage
    }

    /// Applies a site preset, setting both the location name and its sun hours.
    pub fn with_location(mut self, preset: &LocationPreset) -> Self {
        self.location = preset.name.to_string();
        self.peak_sun_hours = preset.peak_sun_hours;
        self
    }
}

/// A named site with its typical peak sun hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationPreset {
    pub name: &'static str,
    pub peak_sun_hours: f64,
}

/// Sites offered as one-click presets.
pub const COMMON_LOCATIONS: [LocationPreset; 5] = [
    LocationPreset {
        name: "Lagos, Nigeria",
        peak_sun_hours: 4.5,
    },
    LocationPreset {
        name: "Abuja, Nigeria",
        peak_sun_hours: 5.2,
    },
    LocationPreset {
        name: "Kano, Nigeria",
        peak_sun_hours: 5.8,
    },
    LocationPreset {
        name: "Port Harcourt, Nigeria",
        peak_sun_hours: 4.2,
    },
    LocationPreset {
        name: "Jos, Nigeria",
        peak_sun_hours: 6.2,
    },
];

/// Looks up a preset by full name or by city, ignoring case.
pub fn find_location(name: &str) -> Option<&'static LocationPreset> {
    let wanted = name.trim().to_ascii_lowercase();
    COMMON_LOCATIONS.iter().find(|loc| {
        let full = loc.name.to_ascii_lowercase();
        let city = full.split(',').next().unwrap_or_default().trim().to_string();
        full == wanted || city == wanted
    })
}

/// Number of panels needed to cover one day of consumption.
///
/// `ceil(E_Wh / (performance_factor × loss_factor × PSH × panel_W))`.
/// Returns `0.0` when the audit has no energy yet; a zero design factor
/// yields a non-finite result.
pub fn number_of_panels(totals: &EnergyTotals, inputs: &PvDesignInputs) -> f64 {
    if totals.has_no_energy() {
        return 0.0;
    }
    (totals.total_raw_energy_wh() / inputs.derated_wh_per_panel()).ceil()
}

/// Installed array capacity for a panel count (W).
pub fn total_pv_capacity(panels: f64, inputs: &PvDesignInputs) -> f64 {
    panels * inputs.pv_wattage
}
