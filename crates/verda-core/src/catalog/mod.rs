pub mod store;

use crate::error::VerdaError;
use crate::model::CatalogEntry;
use serde::{Deserialize, Serialize};
use std::path::Path;

const SEED_CATALOG_JSON: &str = include_str!("../../../../data/seed-catalog.json");

/// A catalog file: a named, versioned list of sustainability records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub entries: Vec<CatalogEntry>,
}

/// Load a catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, VerdaError> {
    let content = std::fs::read_to_string(path).map_err(|e| VerdaError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let catalog: CatalogFile =
        serde_json::from_str(&content).map_err(|e| VerdaError::CatalogLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Parse a catalog from a JSON string (no file path context).
pub fn parse_catalog_str(json: &str) -> Result<CatalogFile, VerdaError> {
    let catalog: CatalogFile = serde_json::from_str(json)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// The builtin seed catalog shipped with the crate.
pub fn load_seed_catalog() -> Result<CatalogFile, VerdaError> {
    let catalog: CatalogFile = serde_json::from_str(SEED_CATALOG_JSON)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Validate that a catalog file is well-formed.
pub fn validate_catalog(catalog: &CatalogFile) -> Result<(), VerdaError> {
    if catalog.entries.is_empty() {
        return Err(VerdaError::CatalogInvalid(
            "entries must not be empty".into(),
        ));
    }

    for entry in &catalog.entries {
        if entry.name.trim().is_empty() {
            return Err(VerdaError::CatalogInvalid(
                "entry name must not be empty".into(),
            ));
        }
        if entry.category.trim().is_empty() {
            return Err(VerdaError::CatalogInvalid(format!(
                "entry '{}' has an empty category",
                entry.name
            )));
        }
        if let Some(score) = entry.catalog_eco_score {
            if !(0..=100).contains(&score) {
                return Err(VerdaError::CatalogInvalid(format!(
                    "entry '{}' has catalog_eco_score {} outside [0,100]",
                    entry.name, score
                )));
            }
        }
        if let Some(carbon) = entry.carbon_impact_gram {
            if !carbon.is_finite() || carbon < 0.0 {
                return Err(VerdaError::CatalogInvalid(format!(
                    "entry '{}' has invalid carbon_impact_gram {}",
                    entry.name, carbon
                )));
            }
        }
        if let Some(content) = entry.recycled_content_percent {
            if !(0..=100).contains(&content) {
                return Err(VerdaError::CatalogInvalid(format!(
                    "entry '{}' has recycled_content_percent {} outside [0,100]",
                    entry.name, content
                )));
            }
        }
    }

    Ok(())
}
