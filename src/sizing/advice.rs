//! Optimization hints derived from a finished sizing report.

use std::fmt;

use serde::Serialize;

use super::battery::{BatteryChemistry, BatteryDesignInputs};
use super::pv::PvDesignInputs;
use super::report::{Sizing, SizingReport};
use crate::audit::EnergyAuditData;

pub const ADVICE_NOT_READY: &str = "Complete the Energy Audit first to get optimization advice";

/// Appliances above this daily energy are flagged as high consumers (kWh).
pub const HIGH_CONSUMPTION_KWH: f64 = 1.0;
/// At most this many high consumers are listed.
pub const MAX_HIGH_CONSUMERS: usize = 3;
/// Suggested PV oversizing for seasonal margin.
pub const PV_OVERSIZE_FACTOR: f64 = 1.2;
/// Share of daily energy typically recoverable by efficiency measures.
pub const SAVINGS_FRACTION: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedAppliance {
    pub name: String,
    /// Daily consumption (kWh) for high consumers, surge (W) for inductive loads.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceCategory {
    pub category: &'static str,
    pub tips: Vec<String>,
}

/// Optimization advice for one design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationAdvice {
    pub high_consumers: Vec<FlaggedAppliance>,
    pub inductive_loads: Vec<FlaggedAppliance>,
    /// PV array size including the oversize margin (W).
    pub oversized_pv_watts: f64,
    /// Daily energy recoverable by efficiency measures (kWh).
    pub potential_savings_kwh: f64,
    /// Typical end-to-end efficiency for the chosen chemistry (0.0–1.0).
    pub system_efficiency: f64,
    pub categories: Vec<AdviceCategory>,
}

impl OptimizationAdvice {
    /// Builds advice from the audit, parameters, and an already computed report.
    ///
    /// Not ready while the audit has no energy.
    pub fn from_design(
        audit: &EnergyAuditData,
        battery: &BatteryDesignInputs,
        pv: &PvDesignInputs,
        report: &SizingReport,
    ) -> Sizing<Self> {
        let totals = audit.totals();
        if totals.has_no_energy() {
            return Sizing::NotReady(ADVICE_NOT_READY);
        }

        let mut high: Vec<_> = audit
            .appliances()
            .iter()
            .filter(|a| a.daily_consumption() > HIGH_CONSUMPTION_KWH)
            .collect();
        high.sort_by(|a, b| b.daily_consumption().total_cmp(&a.daily_consumption()));
        let high_consumers = high
            .into_iter()
            .take(MAX_HIGH_CONSUMERS)
            .map(|a| FlaggedAppliance {
                name: a.name().to_string(),
                value: a.daily_consumption(),
            })
            .collect();

        let inductive_loads = audit
            .appliances()
            .iter()
            .filter(|a| a.is_inductive())
            .map(|a| FlaggedAppliance {
                name: a.name().to_string(),
                value: a.surge_factor(),
            })
            .collect();

        let total_pv_watts = report.pv.ready().map_or(0.0, |p| p.total_capacity_w);
        let battery_count = report.battery.ready().map_or(0, |b| b.count);
        let oversized_pv_watts = (total_pv_watts * PV_OVERSIZE_FACTOR).ceil();

        let system_efficiency = match battery.battery_type {
            BatteryChemistry::Lithium => 0.85,
            BatteryChemistry::LeadAcid => 0.75,
        };

        let categories = vec![
            AdviceCategory {
                category: "Energy Efficiency",
                tips: vec![
                    "Replace incandescent bulbs with LED lights (75% energy savings)".into(),
                    "Use energy-efficient appliances with high star ratings".into(),
                    "Implement timer switches for lighting in less-used areas".into(),
                    "Consider DC appliances to reduce inverter losses".into(),
                ],
            },
            AdviceCategory {
                category: "System Sizing",
                tips: vec![
                    format!("Consider oversizing PV array by 20% ({oversized_pv_watts:.0}W total)"),
                    "Add 1-2 extra panels for future expansion and seasonal variations".into(),
                    "Consider split-array orientation for extended daily generation".into(),
                    if pv.location.trim().is_empty() {
                        "Set panel tilt angle based on latitude".into()
                    } else {
                        format!("Optimize panel tilt angle for {}", pv.location.trim())
                    },
                ],
            },
            AdviceCategory {
                category: "Battery Optimization",
                tips: vec![
                    match battery.battery_type {
                        BatteryChemistry::Lithium => {
                            "Lithium batteries chosen - excellent choice for efficiency".into()
                        }
                        BatteryChemistry::LeadAcid => {
                            "Consider upgrading to lithium for better performance".into()
                        }
                    },
                    format!(
                        "Current design: {battery_count} batteries - consider adding 1 extra for redundancy"
                    ),
                    "Implement proper battery management system (BMS)".into(),
                    "Ensure adequate ventilation for battery bank".into(),
                ],
            },
            AdviceCategory {
                category: "Cost Optimization",
                tips: vec![
                    "Buy solar panels in bulk for better pricing".into(),
                    "Consider local assembly to reduce import costs".into(),
                    "Implement load scheduling to reduce peak power requirements".into(),
                    "Use hybrid inverters for better integration".into(),
                ],
            },
        ];

        Sizing::Ready(Self {
            high_consumers,
            inductive_loads,
            oversized_pv_watts,
            potential_savings_kwh: totals.total_raw_energy * SAVINGS_FRACTION,
            system_efficiency,
            categories,
        })
    }
}

impl fmt::Display for OptimizationAdvice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Optimization Advice ---")?;
        if !self.high_consumers.is_empty() {
            writeln!(f, "High energy consumers:")?;
            for a in &self.high_consumers {
                writeln!(f, "  {:<20} {:.1} kWh/day", a.name, a.value)?;
            }
        }
        if !self.inductive_loads.is_empty() {
            writeln!(
                f,
                "Inductive loads (4x surge; consider soft-start devices or VFDs):"
            )?;
            for a in &self.inductive_loads {
                writeln!(f, "  {:<20} {:.0} W surge", a.name, a.value)?;
            }
        }
        for cat in &self.categories {
            writeln!(f, "{}:", cat.category)?;
            for tip in &cat.tips {
                writeln!(f, "  - {tip}")?;
            }
        }
        writeln!(
            f,
            "Potential energy savings: {:.1} kWh/day",
            self.potential_savings_kwh
        )?;
        write!(
            f,
            "Typical system efficiency: {:.0}%",
            self.system_efficiency * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::ApplianceForm;

    fn design(forms: &[ApplianceForm]) -> (EnergyAuditData, BatteryDesignInputs, PvDesignInputs) {
        let mut audit = EnergyAuditData::new();
        for form in forms {
            audit.add_form(form).unwrap();
        }
        (
            audit,
            BatteryDesignInputs::default(),
            PvDesignInputs::default(),
        )
    }

    fn advise(
        audit: &EnergyAuditData,
        battery: &BatteryDesignInputs,
        pv: &PvDesignInputs,
    ) -> Sizing<OptimizationAdvice> {
        let report = SizingReport::new(audit, battery, pv);
        OptimizationAdvice::from_design(audit, battery, pv, &report)
    }

    #[test]
    fn not_ready_without_energy() {
        let (audit, battery, pv) = design(&[]);
        assert_eq!(
            advise(&audit, &battery, &pv),
            Sizing::NotReady(ADVICE_NOT_READY)
        );
    }

    #[test]
    fn lists_top_three_high_consumers_descending() {
        let (audit, battery, pv) = design(&[
            ApplianceForm::new("Bulb", 1.0, 10.0, 5.0, false),
            ApplianceForm::new("Freezer", 1.0, 200.0, 24.0, true),
            ApplianceForm::new("Iron", 1.0, 1000.0, 1.5, false),
            ApplianceForm::new("AC", 1.0, 1500.0, 6.0, true),
            ApplianceForm::new("Pump", 1.0, 750.0, 2.0, true),
        ]);
        let advice = advise(&audit, &battery, &pv);
        let advice = advice.ready().unwrap();

        let names: Vec<_> = advice.high_consumers.iter().map(|a| a.name.as_str()).collect();
        // AC 9.0, Freezer 4.8, Iron 1.5, Pump 1.5 (stable order keeps Iron)
        assert_eq!(names, ["AC", "Freezer", "Iron"]);
        assert_eq!(advice.inductive_loads.len(), 3);
        assert_eq!(advice.inductive_loads[0].value, 800.0);
    }

    #[test]
    fn oversize_and_savings_follow_report() {
        let (audit, battery, pv) = design(&[ApplianceForm::new("Bulb", 2.0, 100.0, 5.0, false)]);
        let advice = advise(&audit, &battery, &pv);
        let advice = advice.ready().unwrap();
        // 2 panels × 180 W = 360 W; × 1.2 = 432
        assert_eq!(advice.oversized_pv_watts, 432.0);
        assert!((advice.potential_savings_kwh - 0.2).abs() < 1e-12);
        assert_eq!(advice.system_efficiency, 0.85);
        assert!(advice.categories[2].tips[1].contains("1 batteries"));
    }

    #[test]
    fn tilt_tip_mentions_location() {
        let (audit, battery, mut pv) =
            design(&[ApplianceForm::new("Bulb", 2.0, 100.0, 5.0, false)]);
        pv.location = "Kano, Nigeria".into();
        let advice = advise(&audit, &battery, &pv);
        let sizing = &advice.ready().unwrap().categories[1];
        assert!(sizing.tips[3].contains("Kano"));
    }
}
