use riverdata_core::error::RiverDataError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), RiverDataError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
