use crate::config::Coverage;
use crate::engine::inference::MetadataResolution;
use crate::label::normalize;
use crate::model::{clamp_f64, InputSource, MatchStrategy};

const REQUEST_WEIGHT: f64 = 0.35;
const STRATEGY_WEIGHT: f64 = 0.65;

const EXACT_CONFIDENCE: f64 = 0.96;
const FUZZY_MIN_CONFIDENCE: f64 = 0.4;
const AUTO_LEARNED_CONFIDENCE: f64 = 0.55;
const NONE_CONFIDENCE: f64 = 0.28;

const IMAGE_FAILED_CAP: f64 = 0.3;
const NO_INPUT_CAP: f64 = 0.25;

const DEFAULT_INFERENCE_MULTIPLIER: f64 = 0.84;
const INFERENCE_FIELD_PENALTY: f64 = 0.03;
const INFERENCE_PENALTY_CAP: f64 = 0.18;

/// Blend request-reported confidence with a per-strategy constant, cap for
/// degraded inputs, then discount for inferred metadata. Always in [0,1].
pub fn estimate_confidence(
    request_confidence: f64,
    strategy: MatchStrategy,
    match_score: f64,
    input_source: InputSource,
    image_resolution_failed: bool,
    resolution: &MetadataResolution,
) -> f64 {
    let request_confidence = clamp_f64(request_confidence, 0.0, 1.0);
    let strategy_confidence = match strategy {
        MatchStrategy::Exact => EXACT_CONFIDENCE,
        MatchStrategy::Fuzzy => FUZZY_MIN_CONFIDENCE.max(clamp_f64(match_score, 0.0, 1.0)),
        MatchStrategy::AutoLearned => AUTO_LEARNED_CONFIDENCE,
        MatchStrategy::None => NONE_CONFIDENCE,
    };

    let mut confidence =
        REQUEST_WEIGHT * request_confidence + STRATEGY_WEIGHT * strategy_confidence;

    if image_resolution_failed {
        confidence = confidence.min(IMAGE_FAILED_CAP);
    }
    if input_source == InputSource::None {
        confidence = confidence.min(NO_INPUT_CAP);
    }

    if resolution.inferred {
        let rule_multiplier = if resolution.confidence_multiplier > 0.0 {
            resolution.confidence_multiplier
        } else {
            DEFAULT_INFERENCE_MULTIPLIER
        };
        let field_penalty = 1.0
            - INFERENCE_PENALTY_CAP
                .min(INFERENCE_FIELD_PENALTY * resolution.inferred_fields.len() as f64);
        confidence *= rule_multiplier * field_penalty;
    }

    clamp_f64(confidence, 0.0, 1.0)
}

/// How well the catalog explains the result: a base value per strategy,
/// discounted when metadata had to be inferred on a non-exact match.
pub fn estimate_coverage(
    strategy: MatchStrategy,
    match_score: f64,
    resolution: &MetadataResolution,
    coverage: &Coverage,
) -> f64 {
    let base = match strategy {
        MatchStrategy::Exact => coverage.exact,
        MatchStrategy::Fuzzy => coverage.fuzzy_min.max(clamp_f64(match_score, 0.0, 1.0)),
        MatchStrategy::AutoLearned => coverage.auto_learned,
        MatchStrategy::None => coverage.none,
    };
    let penalized = if resolution.inferred && strategy != MatchStrategy::Exact {
        base * coverage.inference_penalty
    } else {
        base
    };
    clamp_f64(penalized, 0.0, 1.0)
}

/// Labels naming living/natural items that should never be treated as
/// products to replace.
const NATURE_POSITIVE_LABELS: &[&str] = &[
    "tree",
    "sapling",
    "seedling",
    "plant",
    "houseplant",
    "flower",
    "shrub",
    "bush",
    "garden",
    "forest",
    "leaf",
    "grass",
];

/// True when the normalized label names a living/natural item.
pub fn is_nature_positive_label(label: &str) -> bool {
    let label = normalize(label);
    NATURE_POSITIVE_LABELS.iter().any(|candidate| {
        label == *candidate || label.split_whitespace().any(|token| token == *candidate)
    })
}
