use clap::ValueEnum;
use riverdata_core::error::RiverDataError;
use riverdata_core::normalize::{
    measure_from_dto, measure_reading_from_dto, stage_scale_from_dto, station_from_dto,
};
use riverdata_core::readings::{parse_station_readings, ReadingsOptions};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Station,
    Measure,
    StageScale,
    Reading,
    /// A station's `/readings` list, grouped per measure
    Readings,
}

pub fn run(kind: Kind, file: &Path, ascending: bool, descending: bool) -> Result<(), RiverDataError> {
    let content = std::fs::read_to_string(file)?;
    let mut payload: Value = serde_json::from_str(&content)?;
    if let Some(items) = payload.get_mut("items").map(Value::take) {
        payload = items;
    }

    let json = match kind {
        Kind::Station => normalize_each(&payload, station_from_dto)?,
        Kind::Measure => normalize_each(&payload, measure_from_dto)?,
        Kind::StageScale => normalize_each(&payload, stage_scale_from_dto)?,
        Kind::Reading => normalize_each(&payload, measure_reading_from_dto)?,
        Kind::Readings => {
            let Value::Array(items) = &payload else {
                return Err(RiverDataError::Shape {
                    entity: "readings",
                    reason: format!("{} does not hold a list", file.display()),
                });
            };
            let options = ReadingsOptions {
                ascending,
                descending,
                ..ReadingsOptions::default()
            };
            serde_json::to_string_pretty(&parse_station_readings(items, &options)?)?
        }
    };

    println!("{json}");
    Ok(())
}

/// Normalize a single payload, or every element of a list.
fn normalize_each<T: Serialize>(
    payload: &Value,
    normalize: fn(&Value) -> Result<T, RiverDataError>,
) -> Result<String, RiverDataError> {
    let json = match payload {
        Value::Array(items) => {
            let normalized = items.iter().map(normalize).collect::<Result<Vec<_>, _>>()?;
            serde_json::to_string_pretty(&normalized)?
        }
        single => serde_json::to_string_pretty(&normalize(single)?)?,
    };
    Ok(json)
}
