//! Identifier parsing for flood-monitoring resource ids.
//!
//! Resource ids come back from the API as URIs such as
//! `http://environment.data.gov.uk/flood-monitoring/id/stations/3400TH`.
//! Measure ids additionally pack the station, parameter, qualifier, interval
//! and unit into a single dash-delimited slug, e.g.
//! `3400TH-level-stage-i-15_min-mAOD`.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Station, parameter, qualifier, interval (always `x-y`), unit.
static MEASURE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^-]*)-([^-]*)-([^-]*)-([^-]*-[^-]*)-([^-]*)").expect("valid measure id regex")
});

/// Return everything after the last `/` in `path`.
///
/// A path without any `/` is returned unchanged.
pub fn strip_path(path: &str) -> &str {
    strip_path_skip(path, 0)
}

/// Return the path segment that ends `skip_count` segments before the leaf.
///
/// `strip_path_skip("a/b/c", 1)` is `"b"`. Walking past the first segment
/// stops at the start of the string.
pub fn strip_path_skip(path: &str, skip_count: usize) -> &str {
    let mut end = path.len();
    for _ in 0..skip_count {
        match path[..end].rfind('/') {
            Some(idx) => end = idx,
            None => break,
        }
    }
    let head = &path[..end];
    match head.rfind('/') {
        Some(idx) => &head[idx + 1..],
        None => head,
    }
}

/// The parts of a measure id.
///
/// Every field except `id` is `None` when the id does not follow the
/// `{station}-{parameter}-{qualifier}-{interval}-{unit}` grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureId {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    /// Parameter joined with a non-empty qualifier, e.g. `level-stage`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualified_parameter: Option<String>,
}

/// Parse a measure id, with or without its URI prefix.
///
/// Never fails: an id that does not match the grammar yields a `MeasureId`
/// with only `id` set.
pub fn parse_measure_id(long_id: &str) -> MeasureId {
    let id = strip_path(long_id);
    let Some(caps) = MEASURE_ID_RE.captures(id) else {
        return MeasureId {
            id: id.to_string(),
            ..MeasureId::default()
        };
    };

    let part = |i: usize| caps.get(i).map(|m| m.as_str().to_string());
    let parameter = part(2);
    let qualifier = part(3);

    let qualified_parameter = match (&parameter, &qualifier) {
        (Some(p), Some(q)) if !q.is_empty() => Some(format!("{p}-{q}")),
        (p, _) => p.clone(),
    };

    MeasureId {
        id: id.to_string(),
        station_id: part(1),
        parameter,
        qualifier,
        interval: part(4),
        unit_id: part(5),
        qualified_parameter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://environment.data.gov.uk/flood-monitoring/id/measures/";

    #[test]
    fn test_strip_path_leaf() {
        assert_eq!(strip_path("a/b/c"), "c");
        assert_eq!(
            strip_path("http://environment.data.gov.uk/flood-monitoring/id/stations/3400TH"),
            "3400TH"
        );
    }

    #[test]
    fn test_strip_path_without_slash() {
        assert_eq!(strip_path("leaf"), "leaf");
        assert_eq!(strip_path(""), "");
    }

    #[test]
    fn test_strip_path_trailing_slash() {
        assert_eq!(strip_path("a/b/"), "");
    }

    #[test]
    fn test_strip_path_skip() {
        assert_eq!(strip_path_skip("a/b/c", 0), "c");
        assert_eq!(strip_path_skip("a/b/c", 1), "b");
        assert_eq!(strip_path_skip("a/b/c", 2), "a");
        assert_eq!(strip_path_skip("a/b/c", 5), "a");
        assert_eq!(strip_path_skip("leaf", 1), "leaf");
    }

    #[test]
    fn test_parse_flow_measure_with_empty_qualifier() {
        let parsed = parse_measure_id(&format!("{BASE}3400TH-flow--i-15_min-m3_s"));
        assert_eq!(parsed.id, "3400TH-flow--i-15_min-m3_s");
        assert_eq!(parsed.station_id.as_deref(), Some("3400TH"));
        assert_eq!(parsed.parameter.as_deref(), Some("flow"));
        assert_eq!(parsed.qualifier.as_deref(), Some(""));
        assert_eq!(parsed.interval.as_deref(), Some("i-15_min"));
        assert_eq!(parsed.unit_id.as_deref(), Some("m3_s"));
        assert_eq!(parsed.qualified_parameter.as_deref(), Some("flow"));
    }

    #[test]
    fn test_parse_level_stage_measure() {
        let parsed = parse_measure_id(&format!("{BASE}3400TH-level-stage-i-15_min-mAOD"));
        assert_eq!(parsed.station_id.as_deref(), Some("3400TH"));
        assert_eq!(parsed.parameter.as_deref(), Some("level"));
        assert_eq!(parsed.qualifier.as_deref(), Some("stage"));
        assert_eq!(parsed.interval.as_deref(), Some("i-15_min"));
        assert_eq!(parsed.unit_id.as_deref(), Some("mAOD"));
        assert_eq!(parsed.qualified_parameter.as_deref(), Some("level-stage"));
    }

    #[test]
    fn test_parse_bare_id() {
        let parsed = parse_measure_id("3400TH-flow--Mean-15_min-m3_s");
        assert_eq!(parsed.id, "3400TH-flow--Mean-15_min-m3_s");
        assert_eq!(parsed.interval.as_deref(), Some("Mean-15_min"));
    }

    #[test]
    fn test_parse_malformed_id_degrades() {
        let parsed = parse_measure_id(&format!("{BASE}not-a-measure"));
        assert_eq!(parsed.id, "not-a-measure");
        assert_eq!(parsed.station_id, None);
        assert_eq!(parsed.parameter, None);
        assert_eq!(parsed.qualifier, None);
        assert_eq!(parsed.interval, None);
        assert_eq!(parsed.unit_id, None);
        assert_eq!(parsed.qualified_parameter, None);
    }

    #[test]
    fn test_malformed_id_serializes_only_id() {
        let json = serde_json::to_value(parse_measure_id("junk")).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "junk" }));
    }
}
