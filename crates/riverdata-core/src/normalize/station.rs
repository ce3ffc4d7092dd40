use super::measure::measure_entry;
use super::stage_scale::stage_scale_value;
use crate::error::RiverDataError;
use crate::ident::strip_path;
use crate::model::Station;
use crate::transform::{self, as_dto, Dto, TransformTable};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

const ENTITY: &str = "station";

pub static STATION_TABLE: LazyLock<TransformTable> = LazyLock::new(|| {
    TransformTable::new(ENTITY)
        .compute("id", "@id", leaf)
        .copy_all(&[
            "RLOIid",
            "catchmentName",
            "dateOpened",
            "datumOffset",
            "eaAreaName",
            "eaRegionName",
            "easting",
            "gridReference",
            "label",
            "lat",
            "long",
            "northing",
            "notation",
            "riverName",
            "stationReference",
            "status",
            "statusReason",
            "statusDate",
            "town",
            "type",
            "wiskiID",
        ])
        .spread("measures", station_measures)
        .compute("stageScale", "stageScale", stage_scale_value)
        .compute("downstageScale", "downstageScale", stage_scale_value)
});

fn leaf(value: &Value) -> Result<Option<Value>, RiverDataError> {
    Ok(value.as_str().map(|s| Value::String(strip_path(s).to_string())))
}

/// Always yields a `measures` array, empty when the source has none.
fn station_measures(dto: &Dto) -> Result<Dto, RiverDataError> {
    let mut measures = Vec::new();
    if let Some(Value::Array(entries)) = dto.get("measures") {
        for entry in entries {
            match measure_entry(entry)? {
                Some(measure) => measures.push(measure),
                None => warn!(entry = %entry, "skipping unrecognised measure entry"),
            }
        }
    }

    let mut out = Dto::new();
    out.insert("measures".into(), Value::Array(measures));
    Ok(out)
}

pub fn station_from_dto(value: &Value) -> Result<Station, RiverDataError> {
    let station: Station = transform::transform_dto(as_dto(value, ENTITY)?, &STATION_TABLE)?;
    debug!(id = %station.id, measures = station.measures.len(), "normalized station");
    Ok(station)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OneOrMany;
    use serde_json::json;

    fn kingston() -> Value {
        json!({
            "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/3400TH",
            "RLOIid": "7267",
            "catchmentName": "Thames from Hurley to Teddington",
            "dateOpened": "1983-01-01",
            "datumOffset": 0,
            "eaAreaName": "Thames - West Thames",
            "easting": 517700,
            "label": "Kingston",
            "lat": 51.415005,
            "long": -0.308869,
            "measures": [
                {
                    "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-flow--i-15_min-m3_s",
                    "parameter": "flow",
                    "qualifier": ""
                },
                {
                    "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-level-stage-i-15_min-mAOD",
                    "parameter": "level",
                    "qualifier": "Stage"
                }
            ],
            "northing": 169800,
            "notation": "3400TH",
            "riverName": "River Thames",
            "stageScale": {
                "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/3400TH/stageScale",
                "datum": 0,
                "scaleMax": 6,
                "typicalRangeHigh": 5.15,
                "typicalRangeLow": 3.49
            },
            "stationReference": "3400TH",
            "status": "http://environment.data.gov.uk/flood-monitoring/def/core/statusActive",
            "town": "Kingston Upon Thames",
            "type": [
                "http://environment.data.gov.uk/flood-monitoring/def/core/SingleLevel",
                "http://environment.data.gov.uk/flood-monitoring/def/core/Station"
            ],
            "wiskiID": "3400TH"
        })
    }

    #[test]
    fn test_station_fields() {
        let station = station_from_dto(&kingston()).unwrap();
        assert_eq!(station.id, "3400TH");
        assert_eq!(station.rloi_id, Some(OneOrMany::One("7267".into())));
        assert_eq!(
            station.catchment_name,
            Some(OneOrMany::One("Thames from Hurley to Teddington".into()))
        );
        assert_eq!(station.easting, Some(OneOrMany::One(517700.0)));
        assert_eq!(station.lat, Some(OneOrMany::One(51.415005)));
        assert_eq!(station.river_name, Some(OneOrMany::One("River Thames".into())));
        assert_eq!(station.wiski_id, Some(OneOrMany::One("3400TH".into())));
        assert!(matches!(station.kind, Some(OneOrMany::Many(ref tags)) if tags.len() == 2));
    }

    #[test]
    fn test_multi_site_fields_pass_through() {
        let station = station_from_dto(&json!({
            "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/E1",
            "label": ["Upstream", "Downstream"],
            "lat": [51.1, 51.2],
            "long": [-0.3, -0.4],
            "town": "Guildford"
        }))
        .unwrap();

        assert_eq!(
            station.label,
            Some(OneOrMany::Many(vec!["Upstream".into(), "Downstream".into()]))
        );
        assert_eq!(station.lat.as_ref().map(OneOrMany::as_slice), Some(&[51.1, 51.2][..]));
        assert_eq!(station.long.as_ref().and_then(OneOrMany::first), Some(&-0.3));
        assert_eq!(station.town, Some(OneOrMany::One("Guildford".into())));

        let json = serde_json::to_value(&station).unwrap();
        assert_eq!(json["label"], json!(["Upstream", "Downstream"]));
        assert_eq!(json["town"], "Guildford");
    }

    #[test]
    fn test_station_nested_measures() {
        let station = station_from_dto(&kingston()).unwrap();
        assert_eq!(station.measures.len(), 2);
        assert_eq!(station.measures[0].id, "3400TH-flow--i-15_min-m3_s");
        let stage = station.measure("level-stage").unwrap();
        assert_eq!(stage.unit_id.as_deref(), Some("mAOD"));
    }

    #[test]
    fn test_station_stage_scales() {
        let station = station_from_dto(&kingston()).unwrap();
        let scale = station.stage_scale.unwrap();
        assert_eq!(scale.typical_range_high, Some(5.15));
        assert_eq!(station.downstage_scale, None);
    }

    #[test]
    fn test_missing_measures_become_empty() {
        let station = station_from_dto(&json!({
            "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/E1234"
        }))
        .unwrap();
        assert!(station.measures.is_empty());
        assert_eq!(station.stage_scale, None);
    }

    #[test]
    fn test_non_array_measures_become_empty() {
        let station = station_from_dto(&json!({
            "@id": "E1234",
            "measures": "http://environment.data.gov.uk/flood-monitoring/id/stations/E1234/measures"
        }))
        .unwrap();
        assert!(station.measures.is_empty());
    }

    #[test]
    fn test_null_fields_are_omitted_from_output() {
        let station = station_from_dto(&json!({
            "@id": "E1234",
            "label": null,
            "town": null
        }))
        .unwrap();
        let json = serde_json::to_value(&station).unwrap();
        assert_eq!(json, json!({ "id": "E1234", "measures": [] }));
    }

    #[test]
    fn test_missing_id_is_error() {
        assert!(station_from_dto(&json!({ "label": "anonymous" })).is_err());
    }

    #[test]
    fn test_non_object_is_error() {
        assert!(station_from_dto(&json!(["3400TH"])).is_err());
    }
}
