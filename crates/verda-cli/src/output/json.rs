use verda_core::catalog::CatalogFile;
use verda_core::error::VerdaError;
use verda_core::Recognition;

pub fn print_recognition(result: &Recognition) -> Result<(), VerdaError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

pub fn print_catalog(catalog: &CatalogFile) -> Result<(), VerdaError> {
    let json = serde_json::to_string_pretty(catalog)?;
    println!("{json}");
    Ok(())
}
