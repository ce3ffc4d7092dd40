use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single reading: epoch milliseconds and value.
///
/// Serialized positionally as `[timestamp, value]` so long series stay compact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureReading(pub i64, pub f64);

impl MeasureReading {
    pub fn timestamp(&self) -> i64 {
        self.0
    }

    pub fn value(&self) -> f64 {
        self.1
    }
}

/// Readings for each measure of a station, keyed by measure id.
pub type StationReadings = BTreeMap<String, Vec<MeasureReading>>;

/// A field the API returns either as a single value or as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(v) => std::slice::from_ref(v),
            OneOrMany::Many(vs) => vs,
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }
}

/// Scale limits and historic range for a station's stage water level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageScale {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_recent: Option<MeasureReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_on_record: Option<MeasureReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_on_record: Option<MeasureReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical_range_high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical_range_low: Option<f64>,
}

/// A measurement type available from a station, e.g. `3400TH-flow--i-15_min-m3_s`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_reading: Option<MeasureReading>,
    /// Set instead of `latest_reading` when the API only links to the reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_reading_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<String>,
    /// Seconds between readings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_parameter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_reference: Option<String>,
    /// Leaf type tags, sorted and comma-joined, e.g. `Flow,Measure`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

/// A monitoring station.
///
/// Descriptive fields keep whatever shape the API sent. Stations that span
/// several sites list some of them once per site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Leaf of the station URI, e.g. `3400TH`.
    pub id: String,
    /// River Levels On the Internet id.
    #[serde(default, rename = "RLOIid", skip_serializing_if = "Option::is_none")]
    pub rloi_id: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catchment_name: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_opened: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum_offset: Option<OneOrMany<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downstage_scale: Option<StageScale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ea_area_name: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ea_region_name: Option<OneOrMany<String>>,
    /// British National Grid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easting: Option<OneOrMany<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub northing: Option<OneOrMany<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_reference: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<OneOrMany<String>>,
    /// WGS84.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<OneOrMany<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<OneOrMany<f64>>,
    #[serde(default)]
    pub measures: Vec<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notation: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub river_name: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_scale: Option<StageScale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_reference: Option<OneOrMany<String>>,
    /// One of the `statusActive`, `statusClosed` or `statusSuspended` URIs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_date: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town: Option<OneOrMany<String>>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<OneOrMany<String>>,
    #[serde(default, rename = "wiskiID", skip_serializing_if = "Option::is_none")]
    pub wiski_id: Option<OneOrMany<String>>,
}

impl Station {
    /// Find a measure by its qualified parameter, e.g. `level-stage`.
    pub fn measure(&self, qualified_parameter: &str) -> Option<&Measure> {
        self.measures
            .iter()
            .find(|m| m.qualified_parameter.as_deref() == Some(qualified_parameter))
    }
}
