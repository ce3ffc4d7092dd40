use riverdata_core::model::{MeasureReading, OneOrMany, Station, StationReadings};
use std::collections::BTreeMap;

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Multi-site values are joined with `/`.
fn text(value: &Option<OneOrMany<String>>) -> String {
    match value {
        Some(v) => v.as_slice().join(" / "),
        None => "-".into(),
    }
}

fn format_reading(reading: &MeasureReading) -> String {
    let when = chrono::DateTime::from_timestamp_millis(reading.timestamp())
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| reading.timestamp().to_string());
    format!("{} @ {when}", reading.value())
}

pub fn print_station(station: &Station) {
    println!("=== {} ({}) ===\n", text(&station.label), station.id);

    println!("  River:      {}", text(&station.river_name));
    println!("  Catchment:  {}", text(&station.catchment_name));
    println!("  Town:       {}", text(&station.town));
    if let Some(kind) = &station.kind {
        println!("  Type:       {}", kind.as_slice().join(", "));
    }
    if let (Some(lat), Some(long)) = (&station.lat, &station.long) {
        for (lat, long) in lat.as_slice().iter().zip(long.as_slice()) {
            println!("  Location:   {lat:.5}, {long:.5}");
        }
    }

    if let Some(scale) = &station.stage_scale {
        if let (Some(low), Some(high)) = (scale.typical_range_low, scale.typical_range_high) {
            println!("  Typical:    {low} to {high}");
        }
        if let Some(max) = &scale.max_on_record {
            println!("  Record max: {}", format_reading(max));
        }
    }

    if station.measures.is_empty() {
        return;
    }
    println!();
    let width = station.measures.iter().map(|m| m.id.len()).max().unwrap_or(10);
    for measure in &station.measures {
        let latest = measure
            .latest_reading
            .as_ref()
            .map(format_reading)
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<width$}  {} {}",
            measure.id,
            latest,
            or_dash(measure.unit_name.as_deref()),
        );
    }
}

pub fn print_stations(stations: &BTreeMap<String, Station>) {
    let width = stations.keys().map(String::len).max().unwrap_or(6);
    for (id, station) in stations {
        println!(
            "  {:<width$}  {:<32}  {}",
            id,
            text(&station.label),
            text(&station.river_name),
        );
    }
    println!("\n  {} station(s)", stations.len());
}

pub fn print_readings(readings: &StationReadings) {
    for (i, (measure, series)) in readings.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("=== {measure} ===\n");
        for reading in series {
            println!("  {}", format_reading(reading));
        }
    }
}
