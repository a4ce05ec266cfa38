//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::env;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use solar_sizer::audit::ApplianceForm;
use solar_sizer::state::{Action, AppState};

/// The single-line audit used throughout: two 100 W bulbs for five hours (1.0 kWh).
pub fn bulb_pair() -> ApplianceForm {
    ApplianceForm::new("Bulb", 2.0, 100.0, 5.0, false)
}

/// A mixed household with resistive and inductive loads.
pub fn household() -> Vec<ApplianceForm> {
    vec![
        ApplianceForm::new("LED bulb", 6.0, 10.0, 6.0, false),
        ApplianceForm::new("Refrigerator", 1.0, 150.0, 24.0, true),
        ApplianceForm::new("Television", 1.0, 80.0, 4.0, false),
        ApplianceForm::new("Water pump", 1.0, 750.0, 2.0, true),
    ]
}

/// Applies every form to a fresh state, asserting each one is accepted.
pub fn state_with(forms: &[ApplianceForm]) -> AppState {
    forms.iter().fold(AppState::default(), |state, form| {
        let (next, notice) = state.reduce(Action::AddAppliance(form.clone()));
        assert!(!notice.is_error(), "fixture form rejected: {notice}");
        next
    })
}

/// Fixed timestamp so saved projects compare equal across runs.
pub fn saved_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 8, 30, 0).unwrap()
}

/// A per-test JSON path under the system temp dir, removed if it exists.
pub fn scratch_store(name: &str) -> PathBuf {
    let path = env::temp_dir().join(format!(
        "solar-sizer-it-{}-{name}.json",
        std::process::id()
    ));
    let _ = fs::remove_file(&path);
    path
}
