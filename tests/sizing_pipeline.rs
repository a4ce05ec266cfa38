//! Audit → aggregate → calculators → selector, end to end.

mod common;

use approx::assert_relative_eq;

use solar_sizer::audit::{ApplianceForm, ApplianceId, EnergyTotals};
use solar_sizer::sizing::battery::{BatteryChemistry, BatteryDesignInputs, number_of_batteries};
use solar_sizer::sizing::controller::{ChargeControllerRecommendation, ControllerTopology};
use solar_sizer::sizing::pv::{PvDesignInputs, find_location, number_of_panels};
use solar_sizer::sizing::report::{BATTERY_NOT_READY, Sizing};
use solar_sizer::state::Action;

#[test]
fn two_bulbs_produce_documented_figures() {
    let state = common::state_with(&[common::bulb_pair()]);
    let bulb = &state.energy_data.appliances()[0];
    assert_eq!(bulb.total_power(), 200.0);
    assert_eq!(bulb.surge_factor(), 200.0);
    assert_eq!(bulb.daily_consumption(), 1.0);

    let report = state.report();
    assert_eq!(report.battery.ready().map(|b| b.count), Some(1));
    assert_relative_eq!(
        report.battery.ready().unwrap().usable_wh_per_battery,
        1305.6,
        epsilon = 1e-9
    );
}

#[test]
fn lead_acid_800w_array_selects_pwm() {
    let rec = ChargeControllerRecommendation::select(800.0, BatteryChemistry::LeadAcid);
    assert_eq!(rec.topology, ControllerTopology::Pwm);
    assert_eq!(rec.rating_amps, 42.0);
}

#[test]
fn calculators_are_zero_exactly_when_energy_is_zero() {
    let zero = EnergyTotals::default();
    assert_eq!(number_of_batteries(&zero, &BatteryDesignInputs::default()), 0.0);
    assert_eq!(number_of_panels(&zero, &PvDesignInputs::default()), 0.0);

    for kwh in [0.001, 1.0, 42.5] {
        let totals = EnergyTotals {
            total_raw_energy: kwh,
            total_surge_factor: 0.0,
        };
        assert!(number_of_batteries(&totals, &BatteryDesignInputs::default()) >= 1.0);
        assert!(number_of_panels(&totals, &PvDesignInputs::default()) >= 1.0);
    }
}

#[test]
fn removing_each_appliance_subtracts_its_contribution() {
    let full = common::state_with(&common::household());
    for appliance in full.energy_data.appliances() {
        let before = full.energy_data.totals();
        let (after, _) = full
            .clone()
            .reduce(Action::RemoveAppliance(appliance.id()));
        let after = after.energy_data.totals();
        assert_relative_eq!(
            before.total_raw_energy - after.total_raw_energy,
            appliance.daily_consumption(),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            before.total_surge_factor - after.total_surge_factor,
            appliance.surge_factor(),
            epsilon = 1e-9
        );
    }
}

#[test]
fn emptying_the_audit_returns_to_not_ready() {
    let state = common::state_with(&[common::bulb_pair()]);
    let (state, _) = state.reduce(Action::RemoveAppliance(ApplianceId(1)));
    let report = state.report();
    assert_eq!(report.battery, Sizing::NotReady(BATTERY_NOT_READY));
    assert!(!report.inverter.is_ready());
    assert!(!state.advice().is_ready());
}

#[test]
fn parameter_changes_rerun_every_calculator() {
    let state = common::state_with(&common::household());
    let base = state.report();

    let kano = find_location("kano").expect("preset exists");
    let pv = PvDesignInputs::default().with_location(kano);
    let (state, _) = state.reduce(Action::SetPvInputs(pv));
    let (state, _) = state.reduce(Action::SetBatteryInputs(BatteryDesignInputs {
        battery_type: BatteryChemistry::LeadAcid,
        ..BatteryDesignInputs::default()
    }));
    let changed = state.report();

    assert_eq!(changed.totals, base.totals);
    assert!(changed.battery.ready().unwrap().count > base.battery.ready().unwrap().count);
    assert!(changed.pv.ready().unwrap().panels <= base.pv.ready().unwrap().panels);
    assert_eq!(changed.inverter, base.inverter);
}

#[test]
fn unset_fields_are_rejected_without_mutation() {
    let state = common::state_with(&[common::bulb_pair()]);
    let mut form = ApplianceForm::new("Kettle", 1.0, 2000.0, 0.5, false);
    form.quantity = solar_sizer::audit::NumericInput::parse("");

    let (after, notice) = state.clone().reduce(Action::AddAppliance(form));
    assert!(notice.is_error());
    assert_eq!(after, state);
}
