//! CSV export for sizing and pricing tables.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::pricing::ScenarioWithPrice;
use crate::sizing::ScenarioResult;

/// Public column header: sizing outcome only, no cost data.
const HEADER: &str = "scenario,status,visible,panel_model,panel_count,installed_kwc,\
                      surface_m2,inverter,battery_kwh,production_kwh,self_consumed_kwh,\
                      exported_kwh,annual_savings,resale_revenue,projected_savings";

/// Columns appended by [`write_priced_csv`].
const PRICE_HEADER: &str = "material_cost,installation_cost,price_excl_tax,\
                            price_incl_tax,payback_years";

/// Exports public scenario rows to a CSV file at the given path.
///
/// # Arguments
///
/// * `scenarios` - Sized scenarios, one row each
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(scenarios: &[ScenarioResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_csv(scenarios, io::BufWriter::new(file))
}

/// Exports priced scenario rows to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_priced_csv(priced: &[ScenarioWithPrice], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_priced_csv(priced, io::BufWriter::new(file))
}

/// Writes one row per scenario, hidden variants included, to any writer.
///
/// Output is deterministic for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(scenarios: &[ScenarioResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(columns(HEADER))?;
    for s in scenarios {
        wtr.write_record(public_fields(s))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes public columns followed by the price breakdown.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_priced_csv(priced: &[ScenarioWithPrice], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(columns(HEADER).chain(columns(PRICE_HEADER)))?;
    for p in priced {
        let mut row = public_fields(p.scenario());
        row.extend([
            format!("{:.2}", p.material_cost()),
            format!("{:.2}", p.installation_cost()),
            format!("{:.2}", p.price_excl_tax()),
            format!("{:.2}", p.price_incl_tax()),
            p.payback_years().map(|y| y.to_string()).unwrap_or_default(),
        ]);
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn columns(header: &'static str) -> impl Iterator<Item = &'static str> {
    header.split(',').map(str::trim)
}

fn public_fields(s: &ScenarioResult) -> Vec<String> {
    let inverter = s
        .equipment
        .inverter
        .as_ref()
        .map(|inv| format!("{}x{}", inv.quantity, inv.model))
        .unwrap_or_default();
    let battery_kwh = s
        .equipment
        .battery
        .as_ref()
        .map_or(0.0, |bat| bat.capacity_kwh());

    vec![
        s.id.as_str().to_string(),
        s.status.to_string(),
        s.show_in_results.to_string(),
        s.equipment.panel_model.clone(),
        s.equipment.panel_count.to_string(),
        format!("{:.2}", s.installed_kwc),
        format!("{:.2}", s.surface_required_m2),
        inverter,
        format!("{battery_kwh:.1}"),
        format!("{:.1}", s.annual_production_kwh),
        format!("{:.1}", s.self_consumed_kwh),
        format!("{:.1}", s.exported_kwh),
        format!("{:.2}", s.annual_savings),
        format!("{:.2}", s.annual_resale_revenue),
        format!("{:.2}", s.projected_savings),
    ]
}
