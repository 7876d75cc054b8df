pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod label;
pub mod model;
pub mod providers;

pub use catalog::store::{CatalogStore, FallbackStore, InMemoryCatalogStore};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::VerdaError;
pub use model::{MatchStrategy, Recognition, RecognitionRequest};
pub use providers::{
    ExplanationGenerator, FallbackExplanationGenerator, LabelDetector, NullLabelDetector,
};

/// Main API entry point: score a single label or image against a catalog.
///
/// Builds a one-shot engine over the given store with the default
/// collaborators (no vision provider, no text-generation provider) and runs
/// the full pipeline. Callers wiring real providers construct an
/// [`Engine`] directly.
pub fn recognize(
    store: &dyn CatalogStore,
    config: &EngineConfig,
    request: &RecognitionRequest,
) -> Recognition {
    let engine = Engine::new(
        store,
        &NullLabelDetector,
        &FallbackExplanationGenerator,
        config,
    );
    engine.recognize(request)
}
