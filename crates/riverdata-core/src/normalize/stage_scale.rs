use super::reading::reading_value;
use crate::error::RiverDataError;
use crate::model::StageScale;
use crate::transform::{self, as_dto, TransformTable};
use serde_json::Value;
use std::sync::LazyLock;

const ENTITY: &str = "stage scale";

/// The `@id` is dropped; the scale is always reached through its station.
pub static STAGE_SCALE_TABLE: LazyLock<TransformTable> = LazyLock::new(|| {
    TransformTable::new(ENTITY)
        .copy_all(&["datum", "scaleMax", "typicalRangeHigh", "typicalRangeLow"])
        .compute("highestRecent", "highestRecent", reading_value)
        .compute("maxOnRecord", "maxOnRecord", reading_value)
        .compute("minOnRecord", "minOnRecord", reading_value)
});

pub fn stage_scale_from_dto(value: &Value) -> Result<StageScale, RiverDataError> {
    transform::transform_dto(as_dto(value, ENTITY)?, &STAGE_SCALE_TABLE)
}

/// Transform rule for a station's `stageScale` / `downstageScale`.
///
/// Anything other than an object (the API sometimes links the scale by URI)
/// leaves the field out.
pub(crate) fn stage_scale_value(value: &Value) -> Result<Option<Value>, RiverDataError> {
    let Some(dto) = value.as_object() else {
        return Ok(None);
    };
    let out = transform::apply(dto, &STAGE_SCALE_TABLE)?;
    Ok(Some(Value::Object(out)))
}
