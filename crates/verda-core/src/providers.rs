use crate::model::CatalogEntry;

/// Resolves raw image bytes to a label. A remote vision client sits behind
/// this in production; failure or missing configuration yields `None`,
/// never an error into the engine.
pub trait LabelDetector: Send + Sync {
    fn detect_from_image(&self, image: &[u8]) -> Option<String>;
}

/// Detector used when no vision provider is configured.
pub struct NullLabelDetector;

impl LabelDetector for NullLabelDetector {
    fn detect_from_image(&self, _image: &[u8]) -> Option<String> {
        None
    }
}

/// Sentinel returned by generators that could not produce a real
/// explanation. The engine substitutes its rule-based summary instead.
pub const FALLBACK_EXPLANATION: &str =
    "Explanation not available (no API key / generation failed).";

/// Produces a natural-language explanation for a catalog entry. A remote
/// text-generation client sits behind this in production.
pub trait ExplanationGenerator: Send + Sync {
    fn generate(&self, entry: &CatalogEntry) -> String;

    fn is_fallback(&self, text: &str) -> bool {
        text == FALLBACK_EXPLANATION
    }
}

/// Generator used when no text provider is configured: always returns the
/// fallback sentinel, so responses carry the rule-based summary.
pub struct FallbackExplanationGenerator;

impl ExplanationGenerator for FallbackExplanationGenerator {
    fn generate(&self, _entry: &CatalogEntry) -> String {
        FALLBACK_EXPLANATION.to_string()
    }
}
