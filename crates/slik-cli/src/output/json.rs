use slik_core::error::SlikError;
use slik_core::ConversionResult;

pub fn print(result: &ConversionResult) -> Result<(), SlikError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
