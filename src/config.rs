//! TOML-based design configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::audit::{ApplianceForm, ApplianceId, AuditError};
use crate::chat::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use crate::sizing::{BatteryChemistry, BatteryDesignInputs, PvDesignInputs};

/// Top-level design configuration parsed from TOML.
///
/// Every section has defaults, so an empty file is a valid (if empty)
/// design. Appliances are listed as `[[appliance]]` tables and are run
/// through the same validation as interactive entries.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignConfig {
    #[serde(default)]
    pub battery: BatteryDesignInputs,
    #[serde(default)]
    pub pv: PvDesignInputs,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default, rename = "appliance")]
    pub appliances: Vec<ApplianceForm>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// JSON file holding saved projects and parameters.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("solar-app-storage.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChatConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.loss_factor"`).
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn household() -> Vec<ApplianceForm> {
    vec![
        ApplianceForm::new("LED bulb", 6.0, 10.0, 6.0, false),
        ApplianceForm::new("Refrigerator", 1.0, 150.0, 24.0, true),
        ApplianceForm::new("Television", 1.0, 80.0, 4.0, false),
        ApplianceForm::new("Ceiling fan", 2.0, 60.0, 8.0, true),
        ApplianceForm::new("Phone charger", 3.0, 5.0, 3.0, false),
    ]
}

impl DesignConfig {
    /// Small household on lithium with default panel parameters.
    pub fn default_design() -> Self {
        Self {
            appliances: household(),
            ..Self::default()
        }
    }

    /// The default household on a 24 V lead-acid bank.
    pub fn lead_acid() -> Self {
        Self {
            battery: BatteryDesignInputs {
                battery_type: BatteryChemistry::LeadAcid,
                preferred_voltage: 24.0,
                ..BatteryDesignInputs::default()
            },
            appliances: household(),
            ..Self::default()
        }
    }

    /// Larger home with air conditioning and a water pump.
    pub fn large_home() -> Self {
        let mut appliances = household();
        appliances.extend([
            ApplianceForm::new("Air conditioner", 1.0, 1500.0, 6.0, true),
            ApplianceForm::new("Water pump", 1.0, 750.0, 2.0, true),
            ApplianceForm::new("Chest freezer", 1.0, 200.0, 24.0, true),
            ApplianceForm::new("Laptop", 2.0, 65.0, 8.0, false),
            ApplianceForm::new("Electric iron", 1.0, 1000.0, 1.0, false),
        ]);
        Self {
            battery: BatteryDesignInputs {
                preferred_voltage: 48.0,
                battery_current_rating: 100.0,
                ..BatteryDesignInputs::default()
            },
            pv: PvDesignInputs {
                pv_wattage: 400.0,
                ..PvDesignInputs::default()
            },
            appliances,
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "lead_acid", "large_home"];

    /// Loads a design from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default_design()),
            "lead_acid" => Ok(Self::lead_acid()),
            "large_home" => Ok(Self::large_home()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a design from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a design from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns every error found.
    ///
    /// Design factors that appear as divisors must lie in `(0, 1]` or be
    /// positive, so a validated config never produces an undefined count.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let b = &self.battery;
        unit_fraction(&mut errors, "battery.performance_loss", b.performance_loss);
        unit_fraction(&mut errors, "battery.loss_factor", b.loss_factor);
        positive(&mut errors, "battery.preferred_voltage", b.preferred_voltage);
        positive(
            &mut errors,
            "battery.battery_current_rating",
            b.battery_current_rating,
        );
        if let Some(dod) = b.depth_of_discharge {
            unit_fraction(&mut errors, "battery.depth_of_discharge", dod);
        }

        let pv = &self.pv;
        unit_fraction(&mut errors, "pv.performance_factor", pv.performance_factor);
        unit_fraction(&mut errors, "pv.loss_factor", pv.loss_factor);
        if !(pv.peak_sun_hours > 0.0 && pv.peak_sun_hours <= 24.0) {
            errors.push(ConfigError::new(
                "pv.peak_sun_hours",
                format!("must be in (0, 24], got {}", pv.peak_sun_hours),
            ));
        }
        positive(&mut errors, "pv.pv_wattage", pv.pv_wattage);

        if self.storage.path.as_os_str().is_empty() {
            errors.push(ConfigError::new("storage.path", "must not be empty"));
        }

        let endpoint = &self.chat.endpoint;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            errors.push(ConfigError::new(
                "chat.endpoint",
                format!("must be an http(s) URL, got \"{endpoint}\""),
            ));
        }
        if self.chat.timeout_secs == 0 {
            errors.push(ConfigError::new("chat.timeout_secs", "must be > 0"));
        }

        for (i, form) in self.appliances.iter().enumerate() {
            if let Err(e) = form.build(ApplianceId(i as u64 + 1)) {
                let field = match &e {
                    AuditError::MissingName => "name",
                    AuditError::MissingValue { field } | AuditError::OutOfRange { field, .. } => {
                        *field
                    }
                };
                errors.push(ConfigError::new(format!("appliance[{i}].{field}"), e.to_string()));
            }
        }

        errors
    }
}

fn unit_fraction(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(value > 0.0 && value <= 1.0) {
        errors.push(ConfigError::new(
            field,
            format!("must be in (0.0, 1.0], got {value}"),
        ));
    }
}

fn positive(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(value > 0.0 && value.is_finite()) {
        errors.push(ConfigError::new(field, format!("must be > 0, got {value}")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::NumericInput;

    #[test]
    fn all_presets_are_valid() {
        for name in DesignConfig::PRESETS {
            let cfg = DesignConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let e = DesignConfig::from_preset("mansion").unwrap_err();
        assert_eq!(e.field, "preset");
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn lead_acid_preset_changes_chemistry() {
        let cfg = DesignConfig::lead_acid();
        assert_eq!(cfg.battery.battery_type, BatteryChemistry::LeadAcid);
        assert_eq!(cfg.appliances, DesignConfig::default_design().appliances);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[battery]
battery_type = "lead-acid"
performance_loss = 0.9
loss_factor = 0.8
preferred_voltage = 24
battery_current_rating = 150

[pv]
peak_sun_hour = 4.5
pv_wattage = 300
location = "Lagos, Nigeria"

[storage]
path = "/tmp/design.json"

[[appliance]]
name = "Fan"
quantity = 2
power_rating = 60
runtime = 8

[[appliance]]
name = "Pump"
quantity = "1"
power_rating = 750
runtime = 2
inductive = true
"#;
        let cfg = DesignConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.battery.battery_type, BatteryChemistry::LeadAcid);
        assert_eq!(cfg.pv.peak_sun_hours, 4.5);
        assert_eq!(cfg.pv.performance_factor, 0.65);
        assert_eq!(cfg.storage.path, PathBuf::from("/tmp/design.json"));
        assert_eq!(cfg.chat, ChatConfig::default());
        assert_eq!(cfg.appliances.len(), 2);
        assert_eq!(cfg.appliances[1].quantity, NumericInput::Value(1.0));
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[battery]
loss_factor = 0.8
bogus_field = true
"#;
        assert!(DesignConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg = DesignConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, DesignConfig::default());
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validation_catches_zero_factors() {
        let mut cfg = DesignConfig::default_design();
        cfg.battery.performance_loss = 0.0;
        cfg.battery.depth_of_discharge = Some(1.5);
        cfg.pv.pv_wattage = 0.0;
        cfg.pv.peak_sun_hours = 0.0;
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            [
                "battery.performance_loss",
                "battery.depth_of_discharge",
                "pv.peak_sun_hours",
                "pv.pv_wattage",
            ]
        );
    }

    #[test]
    fn validation_reports_appliance_index() {
        let mut cfg = DesignConfig::default_design();
        cfg.appliances[2].name = "  ".into();
        cfg.appliances[4].runtime = NumericInput::Value(30.0);
        let errors = cfg.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "appliance[2].name");
        assert_eq!(errors[1].field, "appliance[4].runtime");
    }

    #[test]
    fn validation_catches_bad_chat_endpoint() {
        let mut cfg = DesignConfig::default();
        cfg.chat.endpoint = "solar-master-ai".into();
        cfg.chat.timeout_secs = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "chat.endpoint"));
        assert!(errors.iter().any(|e| e.field == "chat.timeout_secs"));
    }

    #[test]
    fn error_display_names_field() {
        let e = ConfigError::new("pv.loss_factor", "must be in (0.0, 1.0], got 0");
        assert_eq!(
            e.to_string(),
            "config error: pv.loss_factor: must be in (0.0, 1.0], got 0"
        );
    }
}
