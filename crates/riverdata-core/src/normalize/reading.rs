use crate::error::RiverDataError;
use crate::model::MeasureReading;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

/// Parse an API timestamp into epoch milliseconds.
///
/// Accepts RFC 3339 (`2023-01-13T20:00:00Z`), local date-times without an
/// offset (`2014-02-02T04:45:00`, read as UTC) and bare dates.
pub fn parse_date_time(raw: &str) -> Result<i64, RiverDataError> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_millis());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc().timestamp_millis());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
    }

    Err(RiverDataError::InvalidDateTime(raw.to_string()))
}

/// Convert a `{dateTime, value}` reading into a [`MeasureReading`].
pub fn measure_reading_from_dto(dto: &Value) -> Result<MeasureReading, RiverDataError> {
    let date_time = dto
        .get("dateTime")
        .and_then(Value::as_str)
        .ok_or_else(|| RiverDataError::InvalidReading(format!("missing dateTime in {dto}")))?;
    let value = dto
        .get("value")
        .and_then(Value::as_f64)
        .ok_or_else(|| RiverDataError::InvalidReading(format!("missing numeric value in {dto}")))?;

    Ok(MeasureReading(parse_date_time(date_time)?, value))
}

/// Transform rule for a nested reading object.
pub(crate) fn reading_value(value: &Value) -> Result<Option<Value>, RiverDataError> {
    let reading = measure_reading_from_dto(value)?;
    Ok(Some(serde_json::to_value(reading)?))
}
