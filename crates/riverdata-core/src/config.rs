use crate::error::RiverDataError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://environment.data.gov.uk/flood-monitoring";

/// Settings for talking to the flood-monitoring API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Page size used by `fetch_stations` when none is given.
    pub station_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 5,
            user_agent: concat!("riverdata/", env!("CARGO_PKG_VERSION")).into(),
            station_limit: 10,
        }
    }
}

/// Load a client config from a JSON file. Missing keys take their defaults.
pub fn load_config(path: &Path) -> Result<ClientConfig, RiverDataError> {
    let content = std::fs::read_to_string(path).map_err(|e| RiverDataError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

pub fn parse_config(json: &str, source: &Path) -> Result<ClientConfig, RiverDataError> {
    let config: ClientConfig = serde_json::from_str(json).map_err(|e| RiverDataError::ConfigLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    if config.base_url.trim().is_empty() {
        return Err(RiverDataError::ConfigLoad {
            path: source.to_path_buf(),
            reason: "base_url must not be empty".into(),
        });
    }
    Ok(config)
}
