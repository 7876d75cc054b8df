use serde::{Deserialize, Serialize};
use std::fmt;

/// One sustainability record in the catalog.
///
/// Entries are created by seeding or by auto-learn, mutated when an
/// explanation is generated and cached, and never deleted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Identity assigned by the store on first save. Entries loaded from a
    /// catalog file get theirs on insertion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub category: String,
    /// Catalog-asserted baseline score, 0-100. Absent means "use the
    /// configured default".
    #[serde(default)]
    pub catalog_eco_score: Option<i32>,
    /// Absolute carbon impact in grams CO2e, >= 0.
    #[serde(default)]
    pub carbon_impact_gram: Option<f64>,
    /// High / Medium / Low / Organic / Unknown.
    #[serde(default = "unknown_recyclability")]
    pub recyclability: String,
    #[serde(default)]
    pub alternative_recommendation: String,
    /// May be empty until an explanation is generated and cached.
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub reusable: Option<bool>,
    #[serde(default)]
    pub single_use: Option<bool>,
    /// 0-100 when present.
    #[serde(default)]
    pub recycled_content_percent: Option<i32>,
    #[serde(default)]
    pub lifecycle_type: String,
}

fn unknown_recyclability() -> String {
    "Unknown".to_string()
}

/// How a label was resolved to a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    Fuzzy,
    AutoLearned,
    None,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStrategy::Exact => write!(f, "exact"),
            MatchStrategy::Fuzzy => write!(f, "fuzzy"),
            MatchStrategy::AutoLearned => write!(f, "auto_learned"),
            MatchStrategy::None => write!(f, "none"),
        }
    }
}

/// Outcome of a catalog lookup.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub entry: Option<CatalogEntry>,
    pub strategy: MatchStrategy,
    /// Similarity of the best candidate, in [0,1]. 1.0 for exact matches.
    pub score: f64,
}

/// Where the label for a request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    Text,
    Image,
    None,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Text => write!(f, "text"),
            InputSource::Image => write!(f, "image"),
            InputSource::None => write!(f, "none"),
        }
    }
}

/// What happened to the cached explanation for the matched entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationStatus {
    /// The entry already carried a non-blank explanation.
    SkippedCachedExplanation,
    /// Generated and persisted back to the catalog.
    AttemptedSaved,
    /// Generator returned its fallback sentinel; rule-based summary used.
    AttemptedFallback,
    /// Generated but could not be cached back to the catalog.
    AttemptedFailed,
}

/// One audited contribution to the composite score.
///
/// The deltas of all factors for a request sum to the final pre-clamp score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub code: String,
    pub label: String,
    pub delta: f64,
    pub detail: String,
}

impl ScoreFactor {
    pub fn new(
        code: impl Into<String>,
        label: impl Into<String>,
        delta: f64,
        detail: impl Into<String>,
    ) -> Self {
        ScoreFactor {
            code: code.into(),
            label: label.into(),
            delta,
            detail: detail.into(),
        }
    }
}

/// The scoring verdict for one request.
#[derive(Debug, Clone)]
pub struct RatingDecision {
    pub eco_score: i32,
    pub catalog_eco_score: i32,
    pub co2_score: i32,
    pub co2_gram: f64,
    pub recyclability: String,
    pub recommendation: String,
    pub summary: String,
    pub greener_alternative: bool,
    pub catalog_contribution: f64,
    pub co2_contribution: f64,
    pub feature_adjustment: i32,
    pub pre_boost_score: f64,
    pub greener_alternative_boost: i32,
    pub score_factors: Vec<ScoreFactor>,
}

/// The complete result handed to the caller. Total: produced for any
/// well-formed input, including an empty label and no image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recognition {
    pub name: String,
    pub category: String,
    pub eco_score: i32,
    pub catalog_eco_score: i32,
    pub co2_score: i32,
    pub co2_gram: f64,
    pub recyclability: String,
    pub alt_recommendation: String,
    pub explanation: String,
    pub confidence: f64,
    pub catalog_contribution: f64,
    pub co2_contribution: f64,
    pub feature_adjustment: i32,
    pub pre_boost_score: f64,
    pub greener_alternative_boost: i32,
    pub greener_alternative_boost_applied: bool,
    pub scoring_version: String,
    pub score_factors: Vec<ScoreFactor>,
    pub catalog_match_strategy: MatchStrategy,
    pub catalog_coverage: f64,
    pub catalog_auto_learned: bool,
    pub input_source: InputSource,
    pub explanation_status: ExplanationStatus,
}

/// Input to one recognition: a free-text label and/or raw image bytes, plus
/// the detector's confidence for the label.
#[derive(Debug, Clone, Default)]
pub struct RecognitionRequest {
    pub label: Option<String>,
    pub image: Option<Vec<u8>>,
    pub confidence: f64,
}

impl RecognitionRequest {
    pub fn from_label(label: impl Into<String>, confidence: f64) -> Self {
        RecognitionRequest {
            label: Some(label.into()),
            image: None,
            confidence,
        }
    }
}

/// Round to two decimals, matching the precision of persisted contributions.
pub(crate) fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to three decimals, used for confidence and coverage.
pub(crate) fn round_three(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Clamp with non-finite inputs collapsing to the minimum.
pub(crate) fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.clamp(min, max)
}

pub(crate) fn clamp_i32(value: i32, min: i32, max: i32) -> i32 {
    value.clamp(min, max)
}
