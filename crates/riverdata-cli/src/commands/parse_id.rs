use riverdata_core::error::RiverDataError;
use riverdata_core::ident::parse_measure_id;

pub fn run(id: &str) -> Result<(), RiverDataError> {
    let parsed = parse_measure_id(id);
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}
