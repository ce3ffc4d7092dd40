use super::reading::reading_value;
use crate::error::RiverDataError;
use crate::ident::{parse_measure_id, strip_path};
use crate::model::Measure;
use crate::transform::{self, as_dto, Dto, TransformTable};
use serde_json::Value;
use std::sync::LazyLock;

const ENTITY: &str = "measure";

pub static MEASURE_TABLE: LazyLock<TransformTable> = LazyLock::new(|| {
    TransformTable::new(ENTITY)
        .spread("idParts", measure_id_parts)
        .copy_all(&[
            "label",
            "notation",
            "parameter",
            "parameterName",
            "period",
            "qualifier",
            "stationReference",
            "unit",
            "unitName",
            "valueType",
        ])
        .compute("latestReading", "latestReading", latest_reading)
        .compute("latestReadingDate", "latestReading", latest_reading_date)
        .compute("type", "type", canonical_type)
});

/// `id`, `stationId`, `qualifiedParameter` and `unitId` all come from `@id`.
fn measure_id_parts(dto: &Dto) -> Result<Dto, RiverDataError> {
    let long_id = dto
        .get("@id")
        .and_then(Value::as_str)
        .ok_or_else(|| RiverDataError::shape(ENTITY, "missing @id"))?;
    let parsed = parse_measure_id(long_id);

    let mut out = Dto::new();
    out.insert("id".into(), Value::String(parsed.id));
    for (key, part) in [
        ("stationId", parsed.station_id),
        ("qualifiedParameter", parsed.qualified_parameter),
        ("unitId", parsed.unit_id),
    ] {
        if let Some(part) = part {
            out.insert(key.into(), Value::String(part));
        }
    }
    Ok(out)
}

/// An embedded reading object becomes a `[timestamp, value]` pair.
fn latest_reading(value: &Value) -> Result<Option<Value>, RiverDataError> {
    if value.is_object() {
        reading_value(value)
    } else {
        Ok(None)
    }
}

/// A reading URI such as `.../readings/3400TH-flow--i-15_min-m3_s/2019-06-21T13-00-00Z`
/// is only kept as its date leaf.
fn latest_reading_date(value: &Value) -> Result<Option<Value>, RiverDataError> {
    Ok(value.as_str().map(|uri| Value::String(strip_path(uri).to_string())))
}

/// The API lists type tags in no particular order, so an array is reduced to
/// its sorted, comma-joined leaves.
fn canonical_type(value: &Value) -> Result<Option<Value>, RiverDataError> {
    match value {
        Value::String(s) => Ok(Some(Value::String(s.clone()))),
        Value::Array(tags) => {
            let mut leaves: Vec<&str> = tags.iter().filter_map(Value::as_str).map(strip_path).collect();
            leaves.sort_unstable();
            Ok(Some(Value::String(leaves.join(","))))
        }
        _ => Ok(None),
    }
}

pub fn measure_from_dto(value: &Value) -> Result<Measure, RiverDataError> {
    transform::transform_dto(as_dto(value, ENTITY)?, &MEASURE_TABLE)
}

/// Normalize one entry of a station's `measures` list.
///
/// Entries may be full measure objects or bare measure URIs.
pub(crate) fn measure_entry(value: &Value) -> Result<Option<Value>, RiverDataError> {
    let out = match value {
        Value::Object(dto) => transform::apply(dto, &MEASURE_TABLE)?,
        Value::String(uri) => {
            let mut dto = Dto::new();
            dto.insert("@id".into(), Value::String(uri.clone()));
            transform::apply(&dto, &MEASURE_TABLE)?
        }
        _ => return Ok(None),
    };
    Ok(Some(Value::Object(out)))
}
