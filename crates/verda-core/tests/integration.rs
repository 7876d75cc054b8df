//! Integration tests for the full recognition pipeline.
//!
//! Uses the in-memory store and stub providers, so these tests run without
//! any external vision or text-generation service.

use verda_core::catalog::load_seed_catalog;
use verda_core::model::{CatalogEntry, ExplanationStatus, InputSource, MatchStrategy};
use verda_core::providers::{ExplanationGenerator, LabelDetector};
use verda_core::{
    recognize, CatalogStore, Engine, EngineConfig, InMemoryCatalogStore, RecognitionRequest,
};

fn seeded_store() -> InMemoryCatalogStore {
    InMemoryCatalogStore::with_entries(load_seed_catalog().unwrap().entries)
}

struct FixedLabelDetector(Option<String>);

impl LabelDetector for FixedLabelDetector {
    fn detect_from_image(&self, _image: &[u8]) -> Option<String> {
        self.0.clone()
    }
}

struct CannedExplanationGenerator(String);

impl ExplanationGenerator for CannedExplanationGenerator {
    fn generate(&self, _entry: &CatalogEntry) -> String {
        self.0.clone()
    }

    fn is_fallback(&self, text: &str) -> bool {
        text.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Exact and fuzzy matching against the seed catalog
// ---------------------------------------------------------------------------
#[test]
fn exact_match_against_seed_catalog() {
    let store = seeded_store();
    let config = EngineConfig::default();

    let result = recognize(
        &store,
        &config,
        &RecognitionRequest::from_label("Plastic Bottle", 0.9),
    );

    assert_eq!(result.catalog_match_strategy, MatchStrategy::Exact);
    assert_eq!(result.name, "Plastic Bottle");
    assert_eq!(result.catalog_coverage, 1.0);
    assert!(result.confidence > 0.8);
    assert!(!result.catalog_auto_learned);
    // Single-use plastic scores poorly against the seed distribution.
    assert!(result.eco_score < 40);
    assert!(result
        .score_factors
        .iter()
        .any(|f| f.code == "single_use_penalty"));
    assert!(result
        .score_factors
        .iter()
        .any(|f| f.code == "plastic_penalty"));
}

#[test]
fn alias_canonicalization_resolves_to_catalog_name() {
    let store = seeded_store();
    let config = EngineConfig::default();

    let result = recognize(
        &store,
        &config,
        &RecognitionRequest::from_label("Paper Coffee Cup!!", 0.8),
    );

    assert_eq!(result.catalog_match_strategy, MatchStrategy::Exact);
    assert_eq!(result.name, "Paper Cup");
}

#[test]
fn fuzzy_match_partial_label() {
    let store = seeded_store();
    let config = EngineConfig::default();

    let result = recognize(
        &store,
        &config,
        &RecognitionRequest::from_label("bottle", 0.7),
    );

    assert_eq!(result.catalog_match_strategy, MatchStrategy::Fuzzy);
    assert!(result.catalog_coverage >= 0.65);
}

// ---------------------------------------------------------------------------
// Auto-learn: unmatched high-confidence label persists a new entry
// ---------------------------------------------------------------------------
#[test]
fn auto_learn_plastic_bottle_without_catalog() {
    let store = InMemoryCatalogStore::new();
    let mut config = EngineConfig::default();
    config.catalog.auto_learn_require_image = false;

    let result = recognize(
        &store,
        &config,
        &RecognitionRequest::from_label("plastic bottle", 0.9),
    );

    assert_eq!(result.catalog_match_strategy, MatchStrategy::AutoLearned);
    assert!(result.catalog_auto_learned);
    assert_eq!(result.recyclability, "Low");
    assert!(result
        .score_factors
        .iter()
        .any(|f| f.code == "single_use_penalty"));
    assert!(result
        .score_factors
        .iter()
        .any(|f| f.code == "plastic_penalty"));

    let learned = store
        .find_by_name_ignore_case("plastic bottle")
        .unwrap()
        .unwrap();
    assert_eq!(learned.material, "plastic");
    assert_eq!(learned.single_use, Some(true));
    assert_eq!(learned.catalog_eco_score, Some(50));

    // The very next request hits the learned entry exactly.
    let again = recognize(
        &store,
        &config,
        &RecognitionRequest::from_label("plastic bottle", 0.9),
    );
    assert_eq!(again.catalog_match_strategy, MatchStrategy::Exact);
    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn auto_learn_respects_image_requirement() {
    let store = InMemoryCatalogStore::new();
    let config = EngineConfig::default();
    assert!(config.catalog.auto_learn_require_image);

    let result = recognize(
        &store,
        &config,
        &RecognitionRequest::from_label("bamboo toothbrush", 0.95),
    );

    assert_eq!(result.catalog_match_strategy, MatchStrategy::None);
    assert!(store.list_all().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Greener-alternative boost for reusable items
// ---------------------------------------------------------------------------
#[test]
fn reusable_bottle_gets_greener_boost() {
    let store = InMemoryCatalogStore::new();
    let config = EngineConfig::default();

    let result = recognize(
        &store,
        &config,
        &RecognitionRequest::from_label("reusable bottle", 0.5),
    );

    assert!(result.greener_alternative_boost_applied);
    assert_eq!(
        result.greener_alternative_boost,
        config.scoring.greener_alternative_boost
    );
    assert!(result.eco_score > result.pre_boost_score.round() as i32 - 1);
    assert!(result
        .score_factors
        .iter()
        .any(|f| f.code == "greener_boost"));
}

// ---------------------------------------------------------------------------
// Degraded input: empty request and failed image resolution stay total
// ---------------------------------------------------------------------------
#[test]
fn empty_input_returns_complete_result() {
    let store = seeded_store();
    let config = EngineConfig::default();

    let result = recognize(&store, &config, &RecognitionRequest::default());

    assert_eq!(result.catalog_match_strategy, MatchStrategy::None);
    assert_eq!(result.input_source, InputSource::None);
    assert_eq!(result.name, "Unknown Product");
    assert!(result.confidence <= 0.25);
    assert!(!result.alt_recommendation.trim().is_empty());
    assert!(!result.explanation.trim().is_empty());
    assert!((0..=100).contains(&result.eco_score));
}

#[test]
fn failed_image_detection_caps_confidence() {
    let store = seeded_store();
    let config = EngineConfig::default();
    let detector = FixedLabelDetector(None);
    let generator = CannedExplanationGenerator(String::new());
    let engine = Engine::new(&store, &detector, &generator, &config);

    let request = RecognitionRequest {
        label: None,
        image: Some(vec![0xFF, 0xD8]),
        confidence: 1.0,
    };
    let result = engine.recognize(&request);

    assert_eq!(result.input_source, InputSource::Image);
    assert_eq!(result.catalog_match_strategy, MatchStrategy::None);
    assert!(result.confidence <= 0.3);
}

#[test]
fn image_detection_feeds_matching() {
    let store = seeded_store();
    let config = EngineConfig::default();
    let detector = FixedLabelDetector(Some("Aluminum Can".to_string()));
    let generator = CannedExplanationGenerator(String::new());
    let engine = Engine::new(&store, &detector, &generator, &config);

    let request = RecognitionRequest {
        label: None,
        image: Some(vec![0xFF, 0xD8]),
        confidence: 0.88,
    };
    let result = engine.recognize(&request);

    assert_eq!(result.input_source, InputSource::Image);
    assert_eq!(result.catalog_match_strategy, MatchStrategy::Exact);
    assert_eq!(result.name, "Aluminum Can");
}

// ---------------------------------------------------------------------------
// Nature-positive labels: living items are never "products to replace"
// ---------------------------------------------------------------------------
#[test]
fn tree_label_gets_eco_positive_verdict() {
    let store = seeded_store();
    let mut config = EngineConfig::default();
    config.catalog.auto_learn_require_image = false;

    for label in ["tree", "mystery seedling"] {
        let result = recognize(&store, &config, &RecognitionRequest::from_label(label, 0.9));

        assert_eq!(result.catalog_match_strategy, MatchStrategy::None);
        assert!(!result.catalog_auto_learned);
        assert_eq!(result.category, "nature");
        assert_eq!(result.recyclability, "Organic");
        assert!(result.greener_alternative_boost_applied);
        assert!(result.eco_score >= 85, "eco score {} too low", result.eco_score);
        assert!(result.co2_gram <= 12.0);
        assert!(result.alt_recommendation.to_lowercase().contains("eco-positive"));
        assert!(result.explanation.to_lowercase().contains("natural living item"));
        assert!(result
            .explanation
            .to_lowercase()
            .contains("no greener replacement"));
    }
    // Nature labels never pollute the catalog.
    assert_eq!(store.list_all().unwrap().len(), 15);
}

// ---------------------------------------------------------------------------
// Explanation lifecycle
// ---------------------------------------------------------------------------
#[test]
fn cached_explanation_short_circuits_generation() {
    let store = seeded_store();
    let config = EngineConfig::default();

    let result = recognize(
        &store,
        &config,
        &RecognitionRequest::from_label("Reusable Bottle", 0.9),
    );

    assert_eq!(
        result.explanation_status,
        ExplanationStatus::SkippedCachedExplanation
    );
}

#[test]
fn generated_explanation_is_cached_back() {
    let store = seeded_store();
    let config = EngineConfig::default();
    let detector = FixedLabelDetector(None);
    let generator =
        CannedExplanationGenerator("Glass is endlessly recyclable without quality loss.".into());
    let engine = Engine::new(&store, &detector, &generator, &config);

    let result = engine.recognize(&RecognitionRequest::from_label("Glass Bottle", 0.9));

    assert_eq!(result.explanation_status, ExplanationStatus::AttemptedSaved);
    assert!(result.explanation.contains("endlessly recyclable"));
    let updated = store
        .find_by_name_ignore_case("Glass Bottle")
        .unwrap()
        .unwrap();
    assert!(updated.explanation.contains("endlessly recyclable"));
}

#[test]
fn fallback_explanation_uses_rule_based_summary() {
    let store = seeded_store();
    let config = EngineConfig::default();

    let result = recognize(
        &store,
        &config,
        &RecognitionRequest::from_label("Glass Bottle", 0.9),
    );

    assert_eq!(
        result.explanation_status,
        ExplanationStatus::AttemptedFallback
    );
    assert!(!result.explanation.is_empty());
}

// ---------------------------------------------------------------------------
// Audit trail: factor deltas reconstruct the score
// ---------------------------------------------------------------------------
#[test]
fn score_factors_sum_to_pre_clamp_score() {
    let store = seeded_store();
    let config = EngineConfig::default();

    for label in ["Plastic Bottle", "Cloth Bag", "Led Bulb", "Banana"] {
        let result = recognize(&store, &config, &RecognitionRequest::from_label(label, 0.9));
        let factor_sum: f64 = result.score_factors.iter().map(|f| f.delta).sum();
        let expected = result.pre_boost_score + result.greener_alternative_boost as f64;
        assert!(
            (factor_sum - expected).abs() < 0.02,
            "{label}: factor sum {factor_sum} != {expected}"
        );
    }
}

#[test]
fn scoring_version_is_reported() {
    let store = seeded_store();
    let config = EngineConfig::default();
    let result = recognize(
        &store,
        &config,
        &RecognitionRequest::from_label("Banana", 0.9),
    );
    assert_eq!(result.scoring_version, "v2-config-weighted");
}
