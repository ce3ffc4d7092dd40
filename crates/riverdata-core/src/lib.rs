pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ident;
pub mod model;
pub mod normalize;
pub mod readings;
pub mod transform;

use catalog::{build_catalog, load_dump, Catalog};
use error::RiverDataError;
use std::path::Path;

/// Main offline entry point: build the classification tables from two API dumps.
///
/// `stations_path` and `measures_path` each hold either the API's
/// `{"items": [...]}` envelope or a bare array of entries.
pub fn build_catalog_from_files(
    stations_path: &Path,
    measures_path: &Path,
) -> Result<Catalog, RiverDataError> {
    let stations = load_dump(stations_path)?;
    let measures = load_dump(measures_path)?;
    build_catalog(&stations, &measures)
}

/// Build the tables from two dumps and write them into `out_dir`.
///
/// Nothing is written unless the whole build succeeds.
pub fn build_and_write(
    stations_path: &Path,
    measures_path: &Path,
    out_dir: &Path,
) -> Result<Catalog, RiverDataError> {
    let catalog = build_catalog_from_files(stations_path, measures_path)?;
    catalog.write_to(out_dir)?;
    Ok(catalog)
}
