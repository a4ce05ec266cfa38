//! CSV export of an energy audit.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::audit::EnergyAuditData;

const HEADER: [&str; 8] = [
    "appliance",
    "quantity",
    "power_w",
    "runtime_h",
    "total_power_w",
    "inductive",
    "surge_factor_w",
    "daily_consumption_kwh",
];

/// Exports the audit to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_audit_csv(audit: &EnergyAuditData, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_audit_csv(audit, io::BufWriter::new(file))
}

/// Writes the audit as CSV to any writer.
///
/// One row per appliance in audit order, then two summary rows carrying
/// the daily energy total (kWh, 2 dp) and the surge total (W, 0 dp).
/// Output is deterministic for a given audit.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_audit_csv(audit: &EnergyAuditData, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    wtr.write_record(HEADER)?;

    for a in audit.appliances() {
        wtr.write_record(&[
            a.name().to_string(),
            a.quantity().to_string(),
            format!("{:.2}", a.power_rating()),
            format!("{:.2}", a.runtime()),
            format!("{:.2}", a.total_power()),
            a.is_inductive().to_string(),
            format!("{:.2}", a.surge_factor()),
            format!("{:.4}", a.daily_consumption()),
        ])?;
    }

    let totals = audit.totals();
    wtr.write_record(&[
        "total_raw_energy_kwh".to_string(),
        format!("{:.2}", totals.total_raw_energy),
    ])?;
    wtr.write_record(&[
        "total_surge_factor_w".to_string(),
        format!("{:.0}", totals.total_surge_factor),
    ])?;

    wtr.flush()?;
    Ok(())
}
