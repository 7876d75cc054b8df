pub mod co2;
pub mod confidence;
pub mod inference;
pub mod matcher;
pub mod score;

use crate::catalog::store::CatalogStore;
use crate::config::EngineConfig;
use crate::engine::confidence::{estimate_confidence, estimate_coverage, is_nature_positive_label};
use crate::engine::inference::resolve_metadata;
use crate::engine::matcher::find_best_match;
use crate::engine::score::rate_entry;
use crate::label::{canonicalize, is_missing_text, normalize, to_display_label};
use crate::model::{
    clamp_f64, round_three, CatalogEntry, ExplanationStatus, InputSource, MatchStrategy,
    Recognition, RecognitionRequest,
};
use crate::providers::{ExplanationGenerator, LabelDetector};

/// The scoring pipeline: normalize, match, infer, maybe auto-learn, score,
/// estimate confidence and coverage, assemble the result.
///
/// Total over well-formed input. Collaborator failures (store, detector,
/// generator) are logged and substituted with their documented fallbacks,
/// never propagated to the caller.
pub struct Engine<'a> {
    store: &'a dyn CatalogStore,
    detector: &'a dyn LabelDetector,
    explainer: &'a dyn ExplanationGenerator,
    config: &'a EngineConfig,
}

impl<'a> Engine<'a> {
    pub fn new(
        store: &'a dyn CatalogStore,
        detector: &'a dyn LabelDetector,
        explainer: &'a dyn ExplanationGenerator,
        config: &'a EngineConfig,
    ) -> Self {
        Engine {
            store,
            detector,
            explainer,
            config,
        }
    }

    pub fn recognize(&self, request: &RecognitionRequest) -> Recognition {
        let (raw_label, input_source, image_failed) = self.resolve_input(request);
        let canonical = canonicalize(&normalize(&raw_label));
        let display = to_display_label(&canonical);

        let entries = match self.store.list_all() {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, "catalog listing failed; matching against empty catalog");
                Vec::new()
            }
        };

        let matched = find_best_match(&canonical, &entries);
        let mut strategy = matched.strategy;
        let mut match_score = matched.score;
        let mut entry = matched.entry;
        let mut auto_learned = false;

        let nature_positive = entry.is_none()
            && self.config.scoring.nature_positive.enabled
            && is_nature_positive_label(&canonical);

        if entry.is_none()
            && !nature_positive
            && self.should_auto_learn(request, &canonical, &display)
        {
            if let Some(learned) = self.upsert_auto_learned(&display, &canonical) {
                entry = Some(learned);
                strategy = MatchStrategy::AutoLearned;
                match_score = 0.0;
                auto_learned = true;
            }
        }

        let entry = entry.unwrap_or_else(|| {
            if nature_positive {
                self.nature_positive_entry(&display)
            } else {
                default_entry(&display)
            }
        });

        let resolution = resolve_metadata(&entry, &canonical);

        let distribution = match self.store.carbon_impacts_ordered() {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(error = %err, "carbon distribution unavailable; using default CO2 score");
                Vec::new()
            }
        };

        let rating = rate_entry(
            &entry,
            &resolution,
            nature_positive,
            &distribution,
            &self.config.scoring,
        );

        let (explanation, explanation_status) = self.resolve_explanation(&entry, &rating.summary);

        let confidence = round_three(estimate_confidence(
            request.confidence,
            strategy,
            match_score,
            input_source,
            image_failed,
            &resolution,
        ));
        let coverage = round_three(estimate_coverage(
            strategy,
            match_score,
            &resolution,
            &self.config.catalog.coverage,
        ));

        let alt_recommendation = if entry.alternative_recommendation.trim().is_empty() {
            rating.recommendation.clone()
        } else {
            entry.alternative_recommendation.clone()
        };

        let display_label = display.as_str();
        tracing::info!(
            label = %display_label,
            strategy = %strategy,
            eco_score = rating.eco_score,
            confidence,
            auto_learned,
            "recognition complete"
        );

        Recognition {
            name: entry.name,
            category: entry.category,
            eco_score: rating.eco_score,
            catalog_eco_score: rating.catalog_eco_score,
            co2_score: rating.co2_score,
            co2_gram: rating.co2_gram,
            recyclability: rating.recyclability,
            alt_recommendation,
            explanation,
            confidence,
            catalog_contribution: rating.catalog_contribution,
            co2_contribution: rating.co2_contribution,
            feature_adjustment: rating.feature_adjustment,
            pre_boost_score: rating.pre_boost_score,
            greener_alternative_boost: rating.greener_alternative_boost,
            greener_alternative_boost_applied: rating.greener_alternative,
            scoring_version: self.config.scoring.version.clone(),
            score_factors: rating.score_factors,
            catalog_match_strategy: strategy,
            catalog_coverage: coverage,
            catalog_auto_learned: auto_learned,
            input_source,
            explanation_status,
        }
    }

    /// Text wins over image. An image that fails to resolve still counts as
    /// image input, but caps confidence downstream.
    fn resolve_input(&self, request: &RecognitionRequest) -> (String, InputSource, bool) {
        let text = request
            .label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty());
        match (text, request.image.as_deref()) {
            (Some(label), _) => (label.to_string(), InputSource::Text, false),
            (None, Some(image)) => match self.detector.detect_from_image(image) {
                Some(label) if !label.trim().is_empty() => (label, InputSource::Image, false),
                _ => {
                    tracing::warn!("image label detection yielded no label");
                    (String::new(), InputSource::Image, true)
                }
            },
            (None, None) => (String::new(), InputSource::None, false),
        }
    }

    fn should_auto_learn(
        &self,
        request: &RecognitionRequest,
        canonical: &str,
        display: &str,
    ) -> bool {
        let catalog = &self.config.catalog;
        catalog.auto_learn_enabled
            && (request.image.is_some() || !catalog.auto_learn_require_image)
            && !canonical.is_empty()
            && !is_missing_text(canonical)
            && normalize(display) != "unknown product"
            && clamp_f64(request.confidence, 0.0, 1.0) >= catalog.auto_learn_min_confidence
    }

    /// Persist a new entry for an unmatched high-confidence label. An entry
    /// already stored under the same name or category is returned as-is, so
    /// repeated detections of one label learn at most once.
    fn upsert_auto_learned(&self, display: &str, canonical: &str) -> Option<CatalogEntry> {
        match self.store.find_by_name_ignore_case(display) {
            Ok(Some(existing)) => return Some(existing),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "auto-learn name lookup failed; skipping learn");
                return None;
            }
        }
        match self.store.find_first_by_category_ignore_case(display) {
            Ok(Some(existing)) => return Some(existing),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "auto-learn category lookup failed; skipping learn");
                return None;
            }
        }

        let candidate = self.build_learned_entry(display, canonical);
        match self.store.save(candidate) {
            Ok(saved) => {
                tracing::info!(name = %saved.name, "auto-learned new catalog entry");
                Some(saved)
            }
            Err(err) => {
                tracing::warn!(error = %err, "auto-learn save failed; continuing unmatched");
                None
            }
        }
    }

    /// Catalog defaults plus whatever the inference rules supply for the
    /// label. Fields the rules cannot supply stay absent.
    fn build_learned_entry(&self, display: &str, canonical: &str) -> CatalogEntry {
        let scoring = &self.config.scoring;
        let mut entry = CatalogEntry {
            id: None,
            name: display.to_string(),
            category: display.to_string(),
            catalog_eco_score: Some(scoring.default_catalog_eco_score),
            carbon_impact_gram: Some(scoring.default_carbon_impact_gram),
            recyclability: String::new(),
            alternative_recommendation: String::new(),
            explanation: String::new(),
            material: String::new(),
            reusable: None,
            single_use: None,
            recycled_content_percent: None,
            lifecycle_type: String::new(),
        };
        let resolution = resolve_metadata(&entry, canonical);
        let field = |name: &str| resolution.inferred_fields.iter().any(|f| f == name);
        if field("material") {
            entry.material = resolution.material.clone();
        }
        if field("lifecycle_type") {
            entry.lifecycle_type = resolution.lifecycle_type.clone();
        }
        if field("is_reusable") {
            entry.reusable = Some(resolution.reusable);
        }
        if field("is_single_use") {
            entry.single_use = Some(resolution.single_use);
        }
        if field("recycled_content_percent") {
            entry.recycled_content_percent = Some(resolution.recycled_content_percent);
        }
        if field("recyclability") {
            entry.recyclability = resolution.recyclability.clone();
        }
        entry.alternative_recommendation = if resolution.reusable {
            "Keep using this reusable item and recycle it at end of life.".to_string()
        } else {
            "Consider a reusable alternative to reduce single-use waste.".to_string()
        };
        entry
    }

    fn nature_positive_entry(&self, display: &str) -> CatalogEntry {
        let nature = &self.config.scoring.nature_positive;
        CatalogEntry {
            id: None,
            name: display.to_string(),
            category: "nature".to_string(),
            catalog_eco_score: Some(nature.catalog_eco_score),
            carbon_impact_gram: Some(nature.carbon_impact_gram),
            recyclability: "Organic".to_string(),
            alternative_recommendation: String::new(),
            explanation: String::new(),
            material: "organic matter".to_string(),
            reusable: None,
            single_use: None,
            recycled_content_percent: None,
            lifecycle_type: "living".to_string(),
        }
    }

    /// A cached explanation wins. Otherwise generate one; real text is
    /// cached back onto persisted entries, the fallback sentinel is replaced
    /// by the rule-based summary.
    fn resolve_explanation(
        &self,
        entry: &CatalogEntry,
        summary: &str,
    ) -> (String, ExplanationStatus) {
        if !entry.explanation.trim().is_empty() {
            return (
                entry.explanation.clone(),
                ExplanationStatus::SkippedCachedExplanation,
            );
        }
        let text = self.explainer.generate(entry);
        if self.explainer.is_fallback(&text) {
            return (summary.to_string(), ExplanationStatus::AttemptedFallback);
        }
        if entry.id.is_none() {
            return (text, ExplanationStatus::AttemptedFailed);
        }
        let mut updated = entry.clone();
        updated.explanation = text.clone();
        match self.store.save(updated) {
            Ok(_) => (text, ExplanationStatus::AttemptedSaved),
            Err(err) => {
                tracing::warn!(error = %err, "caching explanation failed");
                (text, ExplanationStatus::AttemptedFailed)
            }
        }
    }
}

fn default_entry(display: &str) -> CatalogEntry {
    CatalogEntry {
        id: None,
        name: display.to_string(),
        category: "unknown".to_string(),
        catalog_eco_score: None,
        carbon_impact_gram: None,
        recyclability: "Unknown".to_string(),
        alternative_recommendation: "Consider a reusable alternative to reduce waste.".to_string(),
        explanation: String::new(),
        material: String::new(),
        reusable: None,
        single_use: None,
        recycled_content_percent: None,
        lifecycle_type: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::InMemoryCatalogStore;
    use crate::providers::{FallbackExplanationGenerator, NullLabelDetector};

    fn entry_json(json: &str) -> CatalogEntry {
        serde_json::from_str(json).unwrap()
    }

    fn engine<'a>(store: &'a InMemoryCatalogStore, config: &'a EngineConfig) -> Engine<'a> {
        Engine::new(store, &NullLabelDetector, &FallbackExplanationGenerator, config)
    }

    #[test]
    fn test_empty_input_is_total() {
        let store = InMemoryCatalogStore::new();
        let config = EngineConfig::default();
        let result = engine(&store, &config).recognize(&RecognitionRequest::default());
        assert_eq!(result.catalog_match_strategy, MatchStrategy::None);
        assert_eq!(result.input_source, InputSource::None);
        assert_eq!(result.name, "Unknown Product");
        assert_eq!(result.category, "unknown");
        assert!(result.confidence <= 0.25);
        assert!(!result.catalog_auto_learned);
    }

    #[test]
    fn test_exact_match_uses_catalog_entry() {
        let store = InMemoryCatalogStore::with_entries(vec![entry_json(
            r#"{
                "name": "Glass Bottle",
                "category": "beverage container",
                "catalog_eco_score": 70,
                "carbon_impact_gram": 55.0,
                "recyclability": "High",
                "material": "glass",
                "reusable": true,
                "single_use": false,
                "recycled_content_percent": 40,
                "lifecycle_type": "reusable"
            }"#,
        )]);
        let config = EngineConfig::default();
        let result =
            engine(&store, &config).recognize(&RecognitionRequest::from_label("Glass Bottle!", 0.9));
        assert_eq!(result.catalog_match_strategy, MatchStrategy::Exact);
        assert_eq!(result.name, "Glass Bottle");
        assert_eq!(result.input_source, InputSource::Text);
        assert_eq!(result.catalog_coverage, 1.0);
    }

    #[test]
    fn test_auto_learn_requires_confidence() {
        let store = InMemoryCatalogStore::new();
        let mut config = EngineConfig::default();
        config.catalog.auto_learn_require_image = false;
        let engine = engine(&store, &config);

        let low = engine.recognize(&RecognitionRequest::from_label("plastic bottle", 0.2));
        assert_eq!(low.catalog_match_strategy, MatchStrategy::None);
        assert!(!low.catalog_auto_learned);

        let high = engine.recognize(&RecognitionRequest::from_label("plastic bottle", 0.9));
        assert_eq!(high.catalog_match_strategy, MatchStrategy::AutoLearned);
        assert!(high.catalog_auto_learned);
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_auto_learn_is_idempotent() {
        let store = InMemoryCatalogStore::new();
        let mut config = EngineConfig::default();
        config.catalog.auto_learn_require_image = false;
        let engine = engine(&store, &config);
        engine.recognize(&RecognitionRequest::from_label("bamboo toothbrush", 0.9));
        engine.recognize(&RecognitionRequest::from_label("bamboo toothbrush", 0.9));
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_text_labels_never_learn() {
        let store = InMemoryCatalogStore::new();
        let mut config = EngineConfig::default();
        config.catalog.auto_learn_require_image = false;
        let engine = engine(&store, &config);
        for label in ["unknown", "n/a", "none", "   "] {
            let result = engine.recognize(&RecognitionRequest::from_label(label, 0.99));
            assert_eq!(result.catalog_match_strategy, MatchStrategy::None);
        }
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_cached_explanation_is_reused() {
        let store = InMemoryCatalogStore::with_entries(vec![entry_json(
            r#"{
                "name": "Reusable Bottle",
                "category": "beverage container",
                "catalog_eco_score": 86,
                "carbon_impact_gram": 15.5,
                "recyclability": "High",
                "material": "stainless steel",
                "reusable": true,
                "single_use": false,
                "recycled_content_percent": 35,
                "lifecycle_type": "reusable",
                "explanation": "Durable bottles amortize their footprint over years of refills."
            }"#,
        )]);
        let config = EngineConfig::default();
        let result =
            engine(&store, &config).recognize(&RecognitionRequest::from_label("reusable bottle", 0.9));
        assert_eq!(
            result.explanation_status,
            ExplanationStatus::SkippedCachedExplanation
        );
        assert!(result.explanation.contains("amortize"));
    }

    #[test]
    fn test_fallback_explanation_substitutes_summary() {
        let store = InMemoryCatalogStore::new();
        let config = EngineConfig::default();
        let result =
            engine(&store, &config).recognize(&RecognitionRequest::from_label("wooden chair", 0.5));
        assert_eq!(
            result.explanation_status,
            ExplanationStatus::AttemptedFallback
        );
        assert!(!result.explanation.is_empty());
    }

    #[test]
    fn test_alt_recommendation_falls_back_to_rating() {
        let store = InMemoryCatalogStore::new();
        let config = EngineConfig::default();
        let result =
            engine(&store, &config).recognize(&RecognitionRequest::from_label("wooden chair", 0.5));
        assert!(!result.alt_recommendation.is_empty());
    }

    #[test]
    fn test_nature_positive_label_is_not_learned() {
        let store = InMemoryCatalogStore::new();
        let mut config = EngineConfig::default();
        config.catalog.auto_learn_require_image = false;
        let result =
            engine(&store, &config).recognize(&RecognitionRequest::from_label("tree", 0.95));
        assert_eq!(result.catalog_match_strategy, MatchStrategy::None);
        assert!(!result.catalog_auto_learned);
        assert_eq!(result.category, "nature");
        assert!(result.greener_alternative_boost_applied);
        assert!(store.list_all().unwrap().is_empty());
    }
}
