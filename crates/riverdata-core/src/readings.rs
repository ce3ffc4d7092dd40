use crate::error::RiverDataError;
use crate::ident::strip_path;
use crate::model::{MeasureReading, StationReadings};
use crate::normalize::reading::measure_reading_from_dto;
use serde_json::Value;

/// Options for a station readings request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingsOptions {
    pub limit: Option<u32>,
    /// ISO 8601 timestamp; only readings after it are returned.
    pub since: Option<String>,
    pub ascending: bool,
    pub descending: bool,
}

impl ReadingsOptions {
    /// The API only sorts when asked to, or when `since` is given.
    pub fn wants_sorted(&self) -> bool {
        self.since.is_some() || self.ascending || self.descending
    }
}

/// Group a station's reading entries into one series per measure.
///
/// Each entry looks like
/// `{"measure": ".../measures/3400TH-level-stage-i-15_min-mAOD", "dateTime": ..., "value": ...}`
/// and is filed under the measure's leaf id. Series keep API order unless
/// `ascending` or `descending` is set; `ascending` wins if both are.
pub fn parse_station_readings(
    items: &[Value],
    options: &ReadingsOptions,
) -> Result<StationReadings, RiverDataError> {
    let mut series = StationReadings::new();

    for item in items {
        let measure = item
            .get("measure")
            .and_then(Value::as_str)
            .ok_or_else(|| RiverDataError::shape("reading", format!("missing measure in {item}")))?;
        let reading = measure_reading_from_dto(item)?;
        series
            .entry(strip_path(measure).to_string())
            .or_default()
            .push(reading);
    }

    if options.ascending || options.descending {
        let ascending = options.ascending;
        for readings in series.values_mut() {
            sort_readings(readings, ascending);
        }
    }

    Ok(series)
}

fn sort_readings(readings: &mut [MeasureReading], ascending: bool) {
    if ascending {
        readings.sort_by_key(|r| r.timestamp());
    } else {
        readings.sort_by_key(|r| std::cmp::Reverse(r.timestamp()));
    }
}
