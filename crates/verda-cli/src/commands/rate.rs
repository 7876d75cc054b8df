use std::path::PathBuf;

use verda_core::catalog::{load_catalog, load_seed_catalog};
use verda_core::error::VerdaError;
use verda_core::{recognize, EngineConfig, InMemoryCatalogStore, RecognitionRequest};

use crate::output;

pub fn run(
    label: String,
    confidence: f64,
    catalog_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    output_format: &str,
    learn: bool,
) -> Result<(), VerdaError> {
    let catalog = match catalog_file {
        Some(path) => load_catalog(&path)?,
        None => load_seed_catalog()?,
    };

    let mut config = match config_file {
        Some(path) => EngineConfig::load(&path)?,
        None => EngineConfig::default(),
    };
    // The CLI carries no image, so learning is opt-in and text-only. The
    // session store is in-memory; learned entries live until exit.
    if learn {
        config.catalog.auto_learn_require_image = false;
    } else {
        config.catalog.auto_learn_enabled = false;
    }

    let store = InMemoryCatalogStore::with_entries(catalog.entries);
    let result = recognize(
        &store,
        &config,
        &RecognitionRequest::from_label(label, confidence),
    );

    match output_format {
        "json" => output::json::print_recognition(&result)?,
        _ => output::table::print_recognition(&result),
    }

    Ok(())
}
