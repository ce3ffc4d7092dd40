use riverdata_core::catalog::{CATCHMENTS_FILE, MEASURES_FILE, RIVERS_FILE, STATIONS_FILE};
use riverdata_core::error::RiverDataError;
use std::path::Path;

pub fn run(stations: &Path, measures: &Path, out: &Path) -> Result<(), RiverDataError> {
    let catalog = riverdata_core::build_and_write(stations, measures, out)?;

    eprintln!("Wrote {}:", out.display());
    for (file, count) in [
        (STATIONS_FILE, catalog.stations.len()),
        (MEASURES_FILE, catalog.measures.len()),
        (CATCHMENTS_FILE, catalog.catchments.len()),
        (RIVERS_FILE, catalog.rivers.len()),
    ] {
        eprintln!("  {file:<16} {count} entries");
    }
    Ok(())
}
