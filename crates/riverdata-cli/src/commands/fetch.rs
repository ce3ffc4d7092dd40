use riverdata_core::api::ApiClient;
use riverdata_core::config::ClientConfig;
use riverdata_core::error::RiverDataError;
use riverdata_core::readings::ReadingsOptions;

use crate::output;

pub fn readings_options(
    since: Option<String>,
    limit: Option<u32>,
    ascending: bool,
    descending: bool,
) -> ReadingsOptions {
    ReadingsOptions {
        limit,
        since,
        ascending,
        descending,
    }
}

pub fn station(config: ClientConfig, id: &str, format: &str) -> Result<(), RiverDataError> {
    let station = ApiClient::new(config)?.fetch_station(id)?;
    match format {
        "json" => output::json::print(&station),
        _ => {
            output::table::print_station(&station);
            Ok(())
        }
    }
}

pub fn stations(
    config: ClientConfig,
    limit: Option<u32>,
    format: &str,
) -> Result<(), RiverDataError> {
    let stations = ApiClient::new(config)?.fetch_stations(limit)?;
    match format {
        "json" => output::json::print(&stations),
        _ => {
            output::table::print_stations(&stations);
            Ok(())
        }
    }
}

pub fn readings(
    config: ClientConfig,
    id: &str,
    options: ReadingsOptions,
    format: &str,
) -> Result<(), RiverDataError> {
    let readings = ApiClient::new(config)?.fetch_station_readings(id, &options)?;
    match format {
        "json" => output::json::print(&readings),
        _ => {
            output::table::print_readings(&readings);
            Ok(())
        }
    }
}
