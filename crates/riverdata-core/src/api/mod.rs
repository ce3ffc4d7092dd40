//! Client for the EA flood-monitoring API.

pub mod http;
pub mod request;

use crate::cache::{KeyValueStore, PrefixedStore};
use crate::config::ClientConfig;
use crate::error::RiverDataError;
use crate::model::{Station, StationReadings};
use crate::normalize::station_from_dto;
use crate::readings::{parse_station_readings, ReadingsOptions};
use http::ReqwestFetch;
use request::{json_request, Fetch, JsonResponse, RequestOptions};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

pub struct ApiClient {
    fetch: Box<dyn Fetch>,
    config: ClientConfig,
    cache: Option<PrefixedStore<Box<dyn KeyValueStore>>>,
}

impl ApiClient {
    /// Create a client that talks HTTP through `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self, RiverDataError> {
        let fetch = ReqwestFetch::new(&config)?;
        Ok(Self::with_fetch(config, fetch))
    }

    /// Create a client with a custom transport.
    pub fn with_fetch(config: ClientConfig, fetch: impl Fetch + 'static) -> Self {
        Self {
            fetch: Box::new(fetch),
            config,
            cache: None,
        }
    }

    /// Memoize raw station payloads in `store`.
    pub fn with_cache(mut self, store: impl KeyValueStore + 'static) -> Self {
        let boxed: Box<dyn KeyValueStore> = Box::new(store);
        self.cache = Some(PrefixedStore::new(boxed));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Request `path` and return the envelope's `items` plus the full response.
    pub fn api_request(
        &self,
        path: &str,
        params: Vec<(String, Value)>,
    ) -> Result<(Value, JsonResponse), RiverDataError> {
        let options = RequestOptions {
            base_url: self.config.base_url.clone(),
            params,
            headers: Vec::new(),
        };
        let response = json_request(&*self.fetch, path, &options)?;
        let items = response.data.get("items").cloned().unwrap_or(Value::Null);
        Ok((items, response))
    }

    /// Fetch the raw station payload, from the cache when one is attached.
    pub fn fetch_station_dto(&self, id: &str) -> Result<Value, RiverDataError> {
        let key = format!("station.{id}");
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get_json::<Value>(&key)) {
            debug!(id, "station cache hit");
            return Ok(cached);
        }

        let (item, _) = self.api_request(&format!("/id/stations/{id}"), Vec::new())?;
        if let Some(cache) = &self.cache {
            cache.set_json(&key, &item)?;
        }
        Ok(item)
    }

    pub fn fetch_station(&self, id: &str) -> Result<Station, RiverDataError> {
        station_from_dto(&self.fetch_station_dto(id)?)
    }

    /// Fetch a page of stations keyed by station id.
    pub fn fetch_stations(
        &self,
        limit: Option<u32>,
    ) -> Result<BTreeMap<String, Station>, RiverDataError> {
        let limit = limit.unwrap_or(self.config.station_limit);
        let (items, _) = self.api_request("/id/stations", vec![("_limit".into(), limit.into())])?;

        let Value::Array(items) = items else {
            return Err(RiverDataError::shape("stations", "expected an items array"));
        };
        let mut stations = BTreeMap::new();
        for item in &items {
            let station = station_from_dto(item)?;
            stations.insert(station.id.clone(), station);
        }
        Ok(stations)
    }

    pub fn fetch_station_readings(
        &self,
        id: &str,
        options: &ReadingsOptions,
    ) -> Result<StationReadings, RiverDataError> {
        let mut params: Vec<(String, Value)> = vec![
            ("since".into(), options.since.clone().into()),
            ("_limit".into(), options.limit.into()),
        ];
        if options.wants_sorted() {
            params.push(("_sorted".into(), true.into()));
        }

        let (items, _) = self.api_request(&format!("/id/stations/{id}/readings"), params)?;
        let Value::Array(items) = items else {
            return Err(RiverDataError::shape("readings", "expected an items array"));
        };
        parse_station_readings(&items, options)
    }
}
