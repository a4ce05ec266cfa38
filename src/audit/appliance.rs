use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::input::NumericInput;

/// Multiplier applied to inductive (motor) loads to cover start-up current.
pub const INDUCTIVE_SURGE_MULTIPLIER: f64 = 4.0;

/// Upper bound for daily runtime.
pub const MAX_RUNTIME_HOURS: f64 = 24.0;

/// Opaque identity of an appliance within one energy audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplianceId(pub u64);

impl fmt::Display for ApplianceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Reasons an appliance form is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuditError {
    #[error("appliance name is empty")]
    MissingName,
    #[error("`{field}` is missing or not a number")]
    MissingValue { field: &'static str },
    #[error("`{field}` = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

/// Raw appliance entry as typed by the user, before validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: NumericInput,
    /// Rated power of one unit (W).
    #[serde(default)]
    pub power_rating: NumericInput,
    /// Daily runtime (hours).
    #[serde(default)]
    pub runtime: NumericInput,
    #[serde(default)]
    pub inductive: bool,
}

impl ApplianceForm {
    /// Convenience constructor for fully-specified entries.
    pub fn new(name: &str, quantity: f64, power_rating: f64, runtime: f64, inductive: bool) -> Self {
        Self {
            name: name.to_string(),
            quantity: quantity.into(),
            power_rating: power_rating.into(),
            runtime: runtime.into(),
            inductive,
        }
    }

    /// Validates the form and builds an [`Appliance`] with the given identity.
    ///
    /// # Errors
    ///
    /// Returns an `AuditError` when the name is blank, a numeric field is
    /// unset or non-finite, quantity is not positive, power is negative, or
    /// runtime falls outside `[0, 24]` hours.
    pub fn build(&self, id: ApplianceId) -> Result<Appliance, AuditError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AuditError::MissingName);
        }

        let quantity = required("quantity", self.quantity)?;
        let power_rating = required("power_rating", self.power_rating)?;
        let runtime = required("runtime", self.runtime)?;

        if quantity <= 0.0 {
            return Err(AuditError::OutOfRange {
                field: "quantity",
                value: quantity,
                expected: "> 0",
            });
        }
        if power_rating < 0.0 {
            return Err(AuditError::OutOfRange {
                field: "power_rating",
                value: power_rating,
                expected: ">= 0",
            });
        }
        if !(0.0..=MAX_RUNTIME_HOURS).contains(&runtime) {
            return Err(AuditError::OutOfRange {
                field: "runtime",
                value: runtime,
                expected: "0 to 24 hours",
            });
        }

        Ok(Appliance::new(
            id,
            name,
            quantity,
            power_rating,
            runtime,
            self.inductive,
        ))
    }
}

fn required(field: &'static str, input: NumericInput) -> Result<f64, AuditError> {
    match input.value() {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(AuditError::MissingValue { field }),
    }
}

/// One validated appliance line in an energy audit.
///
/// The derived fields are computed once in [`Appliance::new`]; there are no
/// setters, so they always agree with the four inputs. Deserializing reads
/// only the inputs and recomputes the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredAppliance")]
pub struct Appliance {
    id: ApplianceId,
    name: String,
    quantity: f64,
    power_rating: f64,
    inductive: bool,
    runtime: f64,
    total_power: f64,
    surge_factor: f64,
    daily_consumption: f64,
}

/// Input fields of a serialized appliance. Derived fields in the record are ignored.
#[derive(Deserialize)]
struct StoredAppliance {
    id: ApplianceId,
    name: String,
    quantity: f64,
    power_rating: f64,
    #[serde(default)]
    inductive: bool,
    runtime: f64,
}

impl From<StoredAppliance> for Appliance {
    fn from(raw: StoredAppliance) -> Self {
        Self::new(
            raw.id,
            &raw.name,
            raw.quantity,
            raw.power_rating,
            raw.runtime,
            raw.inductive,
        )
    }
}

impl Appliance {
    /// Creates an appliance and computes its derived fields.
    ///
    /// # Arguments
    ///
    /// * `id` - Identity within the audit
    /// * `name` - Display name
    /// * `quantity` - Number of identical units
    /// * `power_rating` - Rated power of one unit (W)
    /// * `runtime` - Daily runtime (hours)
    /// * `inductive` - Whether the load is a motor/compressor with start-up surge
    pub fn new(
        id: ApplianceId,
        name: &str,
        quantity: f64,
        power_rating: f64,
        runtime: f64,
        inductive: bool,
    ) -> Self {
        let total_power = quantity * power_rating;
        let surge_factor = if inductive {
            INDUCTIVE_SURGE_MULTIPLIER * total_power
        } else {
            total_power
        };
        let daily_consumption = runtime * total_power / 1000.0;

        Self {
            id,
            name: name.to_string(),
            quantity,
            power_rating,
            inductive,
            runtime,
            total_power,
            surge_factor,
            daily_consumption,
        }
    }

    pub fn id(&self) -> ApplianceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Rated power of one unit (W).
    pub fn power_rating(&self) -> f64 {
        self.power_rating
    }

    pub fn is_inductive(&self) -> bool {
        self.inductive
    }

    /// Daily runtime (hours).
    pub fn runtime(&self) -> f64 {
        self.runtime
    }

    /// `quantity × power_rating` (W).
    pub fn total_power(&self) -> f64 {
        self.total_power
    }

    /// Peak draw used for inverter sizing (W).
    pub fn surge_factor(&self) -> f64 {
        self.surge_factor
    }

    /// Daily energy use (kWh).
    pub fn daily_consumption(&self) -> f64 {
        self.daily_consumption
    }
}

impl fmt::Display for Appliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<3} {:<20} {:>4} x {:>7.1} W  {:>5.1} h/day  total={:>8.1} W  surge={:>8.1} W{}  {:>6.2} kWh/day",
            self.id,
            self.name,
            self.quantity,
            self.power_rating,
            self.runtime,
            self.total_power,
            self.surge_factor,
            if self.inductive { " (inductive)" } else { "" },
            self.daily_consumption,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_fields_resistive() {
        let a = Appliance::new(ApplianceId(1), "Bulb", 2.0, 100.0, 5.0, false);
        assert_eq!(a.total_power(), 200.0);
        assert_eq!(a.surge_factor(), 200.0);
        assert_eq!(a.daily_consumption(), 1.0);
    }

    #[test]
    fn derived_fields_inductive() {
        let a = Appliance::new(ApplianceId(1), "Pump", 1.0, 750.0, 2.0, true);
        assert_eq!(a.total_power(), 750.0);
        assert_eq!(a.surge_factor(), 3000.0);
        assert_eq!(a.daily_consumption(), 1.5);
    }

    #[test]
    fn derived_fields_hold_for_a_grid_of_inputs() {
        for &q in &[1.0, 3.0, 12.0] {
            for &p in &[0.0, 15.5, 1200.0] {
                for &r in &[0.0, 0.5, 24.0] {
                    for inductive in [false, true] {
                        let a = Appliance::new(ApplianceId(7), "x", q, p, r, inductive);
                        let surge = if inductive { 4.0 * q * p } else { q * p };
                        assert_eq!(a.total_power(), q * p);
                        assert_eq!(a.surge_factor(), surge);
                        assert!((a.daily_consumption() - r * q * p / 1000.0).abs() < 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn build_accepts_valid_form() {
        let form = ApplianceForm::new("  LED bulb ", 4.0, 10.0, 6.0, false);
        let a = form.build(ApplianceId(3)).unwrap();
        assert_eq!(a.id(), ApplianceId(3));
        assert_eq!(a.name(), "LED bulb");
        assert!((a.daily_consumption() - 0.24).abs() < 1e-12);
    }

    #[test]
    fn build_rejects_blank_name() {
        let form = ApplianceForm::new("   ", 1.0, 10.0, 1.0, false);
        assert_eq!(form.build(ApplianceId(1)), Err(AuditError::MissingName));
    }

    #[test]
    fn build_rejects_unset_fields() {
        let mut form = ApplianceForm::new("Fan", 1.0, 60.0, 8.0, false);
        form.power_rating = NumericInput::parse("");
        assert_eq!(
            form.build(ApplianceId(1)),
            Err(AuditError::MissingValue {
                field: "power_rating"
            })
        );

        let mut form = ApplianceForm::new("Fan", 1.0, 60.0, 8.0, false);
        form.runtime = NumericInput::parse("all day");
        assert!(matches!(
            form.build(ApplianceId(1)),
            Err(AuditError::MissingValue { field: "runtime" })
        ));
    }

    #[test]
    fn build_rejects_out_of_range_values() {
        let zero_qty = ApplianceForm::new("Fan", 0.0, 60.0, 8.0, false);
        assert!(matches!(
            zero_qty.build(ApplianceId(1)),
            Err(AuditError::OutOfRange {
                field: "quantity",
                ..
            })
        ));

        let negative_power = ApplianceForm::new("Fan", 1.0, -1.0, 8.0, false);
        assert!(matches!(
            negative_power.build(ApplianceId(1)),
            Err(AuditError::OutOfRange {
                field: "power_rating",
                ..
            })
        ));

        let long_day = ApplianceForm::new("Fan", 1.0, 60.0, 25.0, false);
        assert!(matches!(
            long_day.build(ApplianceId(1)),
            Err(AuditError::OutOfRange {
                field: "runtime",
                ..
            })
        ));
    }

    #[test]
    fn build_accepts_runtime_bounds() {
        assert!(ApplianceForm::new("A", 1.0, 1.0, 0.0, false).build(ApplianceId(1)).is_ok());
        assert!(ApplianceForm::new("A", 1.0, 1.0, 24.0, false).build(ApplianceId(1)).is_ok());
    }

    #[test]
    fn stored_derived_fields_are_recomputed() {
        let json = r#"{"id": 4, "name": "Bulb", "quantity": 2.0, "power_rating": 100.0,
            "inductive": false, "runtime": 5.0,
            "total_power": 9.0, "surge_factor": 9.0, "daily_consumption": 50.0}"#;
        let a: Appliance = serde_json::from_str(json).unwrap();
        assert_eq!(a, Appliance::new(ApplianceId(4), "Bulb", 2.0, 100.0, 5.0, false));
        assert_eq!(a.total_power(), 200.0);
        assert_eq!(a.daily_consumption(), 1.0);
    }

    #[test]
    fn consistent_record_serializes_back_unchanged() {
        let a = Appliance::new(ApplianceId(2), "Fridge", 1.0, 150.0, 24.0, true);
        let json = serde_json::to_string(&a).unwrap();
        let back: Appliance = serde_json::from_str(&json).unwrap();
        assert_eq!(serde_json::to_string(&back).unwrap(), json);
    }

    #[test]
    fn form_parses_from_toml_with_missing_fields() {
        let form: ApplianceForm = toml::from_str("name = \"Kettle\"\nquantity = 1").unwrap();
        assert_eq!(form.quantity, NumericInput::Value(1.0));
        assert!(form.power_rating.is_unset());
        assert!(!form.inductive);
    }
}
