//! Per-entity transform tables for the flood-monitoring API.

pub mod measure;
pub mod reading;
pub mod stage_scale;
pub mod station;

pub use measure::measure_from_dto;
pub use reading::{measure_reading_from_dto, parse_date_time};
pub use stage_scale::stage_scale_from_dto;
pub use station::station_from_dto;
