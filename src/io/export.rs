//! CSV export of the per-step energy breakdown.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::energy::FloorEnergy;

/// Column header for the breakdown export.
const HEADER: &str = "sub_assembly,machine,machine_id,section,time_units,\
                      operational_time,idle_time,energy_kwh,renewable_factor,accumulated_kwh";

/// Exports the processed steps of a run to a CSV file at the given path.
///
/// Writes a header row followed by one data row per processed step in
/// product order. Skipped steps are not exported. Produces deterministic
/// output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(energy: &FloorEnergy, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(energy, buf)
}

/// Writes the processed steps of a run as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(energy: &FloorEnergy, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for step in &energy.steps {
        wtr.write_record(&[
            step.sub_assembly.to_string(),
            step.machine.clone(),
            step.machine_id.clone(),
            step.section.clone(),
            step.time_units.to_string(),
            format!("{:.4}", step.cost.operational_time),
            format!("{:.2}", step.cost.idle_time),
            format!("{:.2}", step.cost.energy_kwh),
            format!("{:.1}", step.cost.renewable_factor),
            format!("{:.1}", step.cost.accumulated_kwh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
