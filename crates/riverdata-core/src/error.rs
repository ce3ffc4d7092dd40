use std::path::PathBuf;

use crate::api::request::RequestError;

#[derive(Debug, thiserror::Error)]
pub enum RiverDataError {
    #[error("duplicate measure id {id} from {source_id} ({existing})")]
    DuplicateMeasure {
        id: String,
        source_id: String,
        existing: String,
    },

    #[error("duplicate station id {id} from {source_id} ({existing})")]
    DuplicateStation {
        id: String,
        source_id: String,
        existing: String,
    },

    #[error("duplicate {kind} id {id} from {name} ({existing})")]
    DuplicateSlug {
        kind: &'static str,
        id: String,
        name: String,
        existing: String,
    },

    #[error("unparsable reading dateTime '{0}'")]
    InvalidDateTime(String),

    #[error("invalid reading: {0}")]
    InvalidReading(String),

    #[error("unexpected {entity} shape: {reason}")]
    Shape {
        entity: &'static str,
        reason: String,
    },

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RiverDataError {
    pub(crate) fn shape(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::Shape {
            entity,
            reason: reason.into(),
        }
    }
}
