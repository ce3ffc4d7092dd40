//! Offline catalog build.
//!
//! Consumes full station and measure dumps from the API and derives four
//! lookup tables: stations, measures, catchments and rivers. Any duplicate id
//! aborts the build before anything is written.

pub mod slug;

use crate::error::RiverDataError;
use crate::ident::strip_path;
use serde::Serialize;
use serde_json::Value;
use slug::slugify_name;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

pub const MEASURES_FILE: &str = "measures.json";
pub const STATIONS_FILE: &str = "stations.json";
pub const CATCHMENTS_FILE: &str = "catchments.json";
pub const RIVERS_FILE: &str = "rivers.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    pub id: String,
    /// The station exactly as the API returned it.
    pub fm_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catchment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub river_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchmentRecord {
    pub id: String,
    pub name: String,
    pub stations: Vec<String>,
    /// Slugs of rivers with at least one station in this catchment.
    pub rivers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiverRecord {
    pub id: String,
    pub name: String,
    pub stations: Vec<String>,
    /// Slugs of catchments this river has stations in.
    pub catchments: Vec<String>,
}

/// The four derived tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub measures: BTreeMap<String, Value>,
    pub stations: BTreeMap<String, StationRecord>,
    pub catchments: BTreeMap<String, CatchmentRecord>,
    pub rivers: BTreeMap<String, RiverRecord>,
}

/// Stations in one catchment or on one river, plus the names of related
/// rivers or catchments.
#[derive(Debug, Default)]
struct Group {
    stations: Vec<String>,
    related: BTreeSet<String>,
}

#[derive(Debug)]
struct FlatGroup {
    id: String,
    name: String,
    stations: Vec<String>,
    related: Vec<String>,
}

fn raw_id<'a>(item: &'a Value, entity: &'static str) -> Result<&'a str, RiverDataError> {
    item.get("@id")
        .and_then(Value::as_str)
        .ok_or_else(|| RiverDataError::shape(entity, "missing @id"))
}

fn name_field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
}

/// Index raw measures by their full `@id`.
pub fn index_measures(items: &[Value]) -> Result<BTreeMap<String, Value>, RiverDataError> {
    let mut measures = BTreeMap::new();
    for item in items {
        let id = raw_id(item, "measure")?;
        if let Some(existing) = measures.get(id) {
            return Err(RiverDataError::DuplicateMeasure {
                id: id.to_string(),
                source_id: id.to_string(),
                existing: raw_id(existing, "measure")?.to_string(),
            });
        }
        measures.insert(id.to_string(), item.clone());
    }
    Ok(measures)
}

#[derive(Debug)]
struct StationGrouping {
    stations: BTreeMap<String, StationRecord>,
    catchments: BTreeMap<String, Group>,
    rivers: BTreeMap<String, Group>,
}

fn group_stations(items: &[Value]) -> Result<StationGrouping, RiverDataError> {
    let mut grouping = StationGrouping {
        stations: BTreeMap::new(),
        catchments: BTreeMap::new(),
        rivers: BTreeMap::new(),
    };

    for item in items {
        let long_id = raw_id(item, "station")?;
        let id = strip_path(long_id).to_string();

        if let Some(existing) = grouping.stations.get(&id) {
            return Err(RiverDataError::DuplicateStation {
                id,
                source_id: long_id.to_string(),
                existing: raw_id(&existing.fm_data, "station")?.to_string(),
            });
        }

        let catchment = name_field(item, "catchmentName");
        let river = name_field(item, "riverName");

        if let Some(catchment) = catchment {
            let group = grouping.catchments.entry(catchment.to_string()).or_default();
            group.stations.push(id.clone());
            if let Some(river) = river {
                group.related.insert(river.to_string());
            }
        }

        if let Some(river) = river {
            let group = grouping.rivers.entry(river.to_string()).or_default();
            group.stations.push(id.clone());
            if let Some(catchment) = catchment {
                group.related.insert(catchment.to_string());
            }
        }

        let record = StationRecord {
            id: id.clone(),
            fm_data: item.clone(),
            catchment_id: catchment.map(slugify_name),
            river_id: river.map(slugify_name),
        };
        grouping.stations.insert(id, record);
    }

    Ok(grouping)
}

/// Key each group by its name slug. Two names with the same slug are fatal.
fn flatten_groups(
    kind: &'static str,
    groups: BTreeMap<String, Group>,
) -> Result<Vec<FlatGroup>, RiverDataError> {
    let mut names_by_slug: BTreeMap<String, String> = BTreeMap::new();
    let mut flat = Vec::with_capacity(groups.len());

    for (name, group) in groups {
        let id = slugify_name(&name);
        if let Some(existing) = names_by_slug.get(&id) {
            return Err(RiverDataError::DuplicateSlug {
                kind,
                id,
                name,
                existing: existing.clone(),
            });
        }
        names_by_slug.insert(id.clone(), name.clone());

        flat.push(FlatGroup {
            id,
            name,
            stations: group.stations,
            related: group.related.iter().map(|n| slugify_name(n)).collect(),
        });
    }

    Ok(flat)
}

/// Build all four tables in memory.
pub fn build_catalog(stations: &[Value], measures: &[Value]) -> Result<Catalog, RiverDataError> {
    let measures = index_measures(measures)?;
    let grouping = group_stations(stations)?;

    let catchments = flatten_groups("catchment", grouping.catchments)?
        .into_iter()
        .map(|g| {
            let record = CatchmentRecord {
                id: g.id.clone(),
                name: g.name,
                stations: g.stations,
                rivers: g.related,
            };
            (g.id, record)
        })
        .collect();

    let rivers = flatten_groups("river", grouping.rivers)?
        .into_iter()
        .map(|g| {
            let record = RiverRecord {
                id: g.id.clone(),
                name: g.name,
                stations: g.stations,
                catchments: g.related,
            };
            (g.id, record)
        })
        .collect();

    let catalog = Catalog {
        measures,
        stations: grouping.stations,
        catchments,
        rivers,
    };

    info!(
        stations = catalog.stations.len(),
        measures = catalog.measures.len(),
        catchments = catalog.catchments.len(),
        rivers = catalog.rivers.len(),
        "built catalog"
    );
    Ok(catalog)
}

/// Read an API dump: either an `{"items": [...]}` envelope or a bare array.
pub fn load_dump(path: &Path) -> Result<Vec<Value>, RiverDataError> {
    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Array(items) => Ok(items),
        Value::Object(mut envelope) => match envelope.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(RiverDataError::shape(
                "dump",
                format!("{} has no items array", path.display()),
            )),
        },
        other => Err(RiverDataError::shape(
            "dump",
            format!("{} holds {other}", path.display()),
        )),
    }
}

fn write_atomic(dir: &Path, name: &str, contents: &str) -> Result<(), RiverDataError> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(dir.join(name)).map_err(|e| e.error)?;
    debug!(file = name, bytes = contents.len(), "wrote table");
    Ok(())
}

impl Catalog {
    /// Write the four tables into `dir` as pretty-printed JSON.
    ///
    /// Everything is serialized before the first file is touched. The files
    /// are written concurrently and each one is replaced atomically.
    pub fn write_to(&self, dir: &Path) -> Result<(), RiverDataError> {
        let files = [
            (MEASURES_FILE, serde_json::to_string_pretty(&self.measures)?),
            (STATIONS_FILE, serde_json::to_string_pretty(&self.stations)?),
            (CATCHMENTS_FILE, serde_json::to_string_pretty(&self.catchments)?),
            (RIVERS_FILE, serde_json::to_string_pretty(&self.rivers)?),
        ];

        std::fs::create_dir_all(dir)?;

        let results: Vec<Result<(), RiverDataError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = files
                .iter()
                .map(|(name, contents)| scope.spawn(move || write_atomic(dir, name, contents)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(RiverDataError::Io(std::io::Error::other("table writer panicked")))
                    })
                })
                .collect()
        });

        results.into_iter().collect::<Result<(), _>>()?;
        info!(dir = %dir.display(), "wrote catalog");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STATIONS: &str = "http://environment.data.gov.uk/flood-monitoring/id/stations/";

    fn station(id: &str, catchment: Option<&str>, river: Option<&str>) -> Value {
        let mut value = json!({ "@id": format!("{STATIONS}{id}"), "label": id });
        if let Some(c) = catchment {
            value["catchmentName"] = json!(c);
        }
        if let Some(r) = river {
            value["riverName"] = json!(r);
        }
        value
    }

    #[test]
    fn test_duplicate_measure_is_fatal() {
        let m = json!({ "@id": "http://x/measures/A-flow--i-15_min-m3_s" });
        let err = index_measures(&[m.clone(), m]).unwrap_err();
        assert!(matches!(err, RiverDataError::DuplicateMeasure { .. }));
    }

    #[test]
    fn test_duplicate_station_is_fatal() {
        let a = json!({ "@id": "http://a/stations/3400TH" });
        let b = json!({ "@id": "http://b/stations/3400TH" });
        let err = group_stations(&[a, b]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("http://b/stations/3400TH"));
        assert!(message.contains("http://a/stations/3400TH"));
    }

    #[test]
    fn test_station_record_ids() {
        let grouping = group_stations(&[station(
            "3400TH",
            Some("Thames from Hurley to Teddington"),
            Some("River Thames"),
        )])
        .unwrap();
        let record = &grouping.stations["3400TH"];
        assert_eq!(record.catchment_id.as_deref(), Some("thames-from-hurley-to-teddington"));
        assert_eq!(record.river_id.as_deref(), Some("river-thames"));
        assert_eq!(record.fm_data["label"], "3400TH");
    }

    #[test]
    fn test_blank_names_are_ignored() {
        let grouping = group_stations(&[station("E1", Some("  "), None)]).unwrap();
        assert!(grouping.catchments.is_empty());
        assert_eq!(grouping.stations["E1"].catchment_id, None);
    }

    #[test]
    fn test_related_names_are_deduplicated() {
        let grouping = group_stations(&[
            station("A", Some("Upper Thames"), Some("River Thames")),
            station("B", Some("Upper Thames"), Some("River Thames")),
            station("C", Some("Upper Thames"), Some("River Cherwell")),
        ])
        .unwrap();
        let catchment = &grouping.catchments["Upper Thames"];
        assert_eq!(catchment.stations, vec!["A", "B", "C"]);
        assert_eq!(catchment.related.len(), 2);
        assert_eq!(grouping.rivers["River Thames"].related.len(), 1);
    }

    #[test]
    fn test_slug_collision_is_fatal() {
        let mut groups = BTreeMap::new();
        groups.insert("River Thames".to_string(), Group::default());
        groups.insert("River-Thames".to_string(), Group::default());
        let err = flatten_groups("river", groups).unwrap_err();
        assert!(matches!(
            err,
            RiverDataError::DuplicateSlug { kind: "river", ref id, .. } if id == "river-thames"
        ));
    }

    #[test]
    fn test_station_serializes_fm_data_key() {
        let record = StationRecord {
            id: "E1".into(),
            fm_data: json!({ "@id": "E1" }),
            catchment_id: None,
            river_id: None,
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "id": "E1", "fmData": { "@id": "E1" } })
        );
    }
}
