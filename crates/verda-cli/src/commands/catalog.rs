use std::path::{Path, PathBuf};

use verda_core::catalog::{load_catalog, load_seed_catalog, CatalogFile};
use verda_core::error::VerdaError;

use crate::output;

fn load(catalog_file: Option<PathBuf>) -> Result<CatalogFile, VerdaError> {
    match catalog_file {
        Some(path) => load_catalog(&path),
        None => load_seed_catalog(),
    }
}

pub fn list(catalog_file: Option<PathBuf>, output_format: &str) -> Result<(), VerdaError> {
    let catalog = load(catalog_file)?;
    match output_format {
        "json" => output::json::print_catalog(&catalog)?,
        _ => output::table::print_catalog(&catalog),
    }
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), VerdaError> {
    let catalog = load_catalog(file)?;
    println!(
        "OK: '{}' (v{}) with {} entries",
        catalog.name,
        catalog.version,
        catalog.entries.len()
    );
    Ok(())
}

pub fn schema() -> Result<(), VerdaError> {
    println!("Catalog file format (JSON):\n");
    println!("  name                        string, required");
    println!("  description                 string, optional");
    println!("  version                     string, required");
    println!("  entries                     array, required, non-empty");
    println!();
    println!("Each entry:");
    println!("  name                        string, required");
    println!("  category                    string, required");
    println!("  catalog_eco_score           integer 0-100, optional (default: engine default)");
    println!("  carbon_impact_gram          number >= 0, optional (grams CO2e)");
    println!("  recyclability               High | Medium | Low | Organic | Unknown");
    println!("  alternative_recommendation  string, optional");
    println!("  explanation                 string, optional (cached explanation)");
    println!("  material                    string, optional");
    println!("  reusable                    boolean, optional");
    println!("  single_use                  boolean, optional");
    println!("  recycled_content_percent    integer 0-100, optional");
    println!("  lifecycle_type              string, optional (single_use, reusable, ...)");
    println!();
    println!("Missing sustainability fields are filled by the metadata inference");
    println!("rules at request time.");
    println!();
    println!("Example:");
    println!(
        r#"  {{
    "name": "My catalog",
    "version": "1.0",
    "entries": [
      {{
        "name": "Plastic Bottle",
        "category": "beverage container",
        "catalog_eco_score": 28,
        "carbon_impact_gram": 82.8,
        "recyclability": "Low",
        "material": "PET plastic",
        "reusable": false,
        "single_use": true,
        "recycled_content_percent": 12,
        "lifecycle_type": "single_use"
      }}
    ]
  }}"#
    );
    Ok(())
}
