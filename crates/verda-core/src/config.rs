use crate::error::VerdaError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Weights, thresholds and adjustment magnitudes for the score calculator.
/// Loaded once at startup; no dynamic reconfiguration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub version: String,
    pub min_score: i32,
    pub max_score: i32,
    pub default_catalog_eco_score: i32,
    pub default_co2_score: i32,
    pub default_carbon_impact_gram: f64,
    pub catalog_weight: f64,
    pub co2_weight: f64,
    pub greener_alternative_boost: i32,
    pub greener_alternative_threshold: i32,
    pub high_impact_threshold: i32,
    pub moderate_impact_threshold: i32,
    pub adjustments: Adjustments,
    pub feature_thresholds: FeatureThresholds,
    pub co2_normalization: Co2Normalization,
    pub nature_positive: NaturePositive,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            version: "v2-config-weighted".to_string(),
            min_score: 0,
            max_score: 100,
            default_catalog_eco_score: 50,
            default_co2_score: 50,
            default_carbon_impact_gram: 100.0,
            catalog_weight: 0.45,
            co2_weight: 0.55,
            greener_alternative_boost: 6,
            greener_alternative_threshold: 90,
            high_impact_threshold: 40,
            moderate_impact_threshold: 70,
            adjustments: Adjustments::default(),
            feature_thresholds: FeatureThresholds::default(),
            co2_normalization: Co2Normalization::default(),
            nature_positive: NaturePositive::default(),
        }
    }
}

/// Per-rule deltas added by the feature-adjustment pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    pub single_use_penalty: i32,
    pub reusable_bonus: i32,
    pub refillable_lifecycle_bonus: i32,
    pub long_life_lifecycle_bonus: i32,
    pub biodegradable_lifecycle_bonus: i32,
    pub plastic_penalty: i32,
    pub paper_penalty: i32,
    pub aluminum_glass_bonus: i32,
    pub cloth_recycled_bonus: i32,
    pub recycled_content_high_bonus: i32,
    pub recycled_content_medium_bonus: i32,
    pub recyclability_high_bonus: i32,
    pub recyclability_medium_bonus: i32,
    pub recyclability_low_penalty: i32,
    pub recyclability_organic_bonus: i32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Adjustments {
            single_use_penalty: -18,
            reusable_bonus: 18,
            refillable_lifecycle_bonus: 6,
            long_life_lifecycle_bonus: 5,
            biodegradable_lifecycle_bonus: 6,
            plastic_penalty: -10,
            paper_penalty: -2,
            aluminum_glass_bonus: 5,
            cloth_recycled_bonus: 10,
            recycled_content_high_bonus: 8,
            recycled_content_medium_bonus: 4,
            recyclability_high_bonus: 10,
            recyclability_medium_bonus: 3,
            recyclability_low_penalty: -8,
            recyclability_organic_bonus: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureThresholds {
    pub recycled_content_high_percent: i32,
    pub recycled_content_medium_percent: i32,
}

impl Default for FeatureThresholds {
    fn default() -> Self {
        FeatureThresholds {
            recycled_content_high_percent: 50,
            recycled_content_medium_percent: 25,
        }
    }
}

/// Percentile window used when mapping a carbon value onto the score range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Co2Normalization {
    pub lower_percentile: f64,
    pub upper_percentile: f64,
}

impl Default for Co2Normalization {
    fn default() -> Self {
        Co2Normalization {
            lower_percentile: 0.05,
            upper_percentile: 0.95,
        }
    }
}

/// Defaults substituted for an unmatched label that names a living/natural
/// item (tree, seedling, ...). Such items get an eco-positive verdict rather
/// than the generic unknown-product baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NaturePositive {
    pub enabled: bool,
    pub catalog_eco_score: i32,
    pub carbon_impact_gram: f64,
}

impl Default for NaturePositive {
    fn default() -> Self {
        NaturePositive {
            enabled: true,
            catalog_eco_score: 92,
            carbon_impact_gram: 4.0,
        }
    }
}

/// Catalog auto-learn toggles and coverage constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub auto_learn_enabled: bool,
    pub auto_learn_require_image: bool,
    pub auto_learn_min_confidence: f64,
    pub coverage: Coverage,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            auto_learn_enabled: true,
            auto_learn_require_image: true,
            auto_learn_min_confidence: 0.65,
            coverage: Coverage::default(),
        }
    }
}

/// Base coverage per match strategy, plus the penalty applied when metadata
/// was inferred on a non-exact match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Coverage {
    pub exact: f64,
    pub fuzzy_min: f64,
    pub auto_learned: f64,
    pub none: f64,
    pub inference_penalty: f64,
}

impl Default for Coverage {
    fn default() -> Self {
        Coverage {
            exact: 1.0,
            fuzzy_min: 0.65,
            auto_learned: 0.6,
            none: 0.3,
            inference_penalty: 0.9,
        }
    }
}

/// Top-level configuration tree, deserializable from a JSON file. Every
/// field defaults, so `{}` is a valid config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub catalog: CatalogConfig,
}

impl EngineConfig {
    /// Load from a JSON file and sanitize.
    pub fn load(path: &Path) -> Result<EngineConfig, VerdaError> {
        let content = std::fs::read_to_string(path).map_err(|e| VerdaError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut config: EngineConfig =
            serde_json::from_str(&content).map_err(|e| VerdaError::ConfigLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.sanitize();
        Ok(config)
    }

    /// Repair precondition violations instead of failing: an inverted or
    /// degenerate percentile window resets to the full [0,1] range.
    pub fn sanitize(&mut self) {
        let window = &mut self.scoring.co2_normalization;
        window.lower_percentile = window.lower_percentile.clamp(0.0, 1.0);
        window.upper_percentile = window.upper_percentile.clamp(0.0, 1.0);
        if window.upper_percentile <= window.lower_percentile {
            tracing::warn!(
                lower = window.lower_percentile,
                upper = window.upper_percentile,
                "CO2 percentile window is degenerate; resetting to [0,1]"
            );
            window.lower_percentile = 0.0;
            window.upper_percentile = 1.0;
        }
        if self.scoring.max_score < self.scoring.min_score {
            tracing::warn!(
                min = self.scoring.min_score,
                max = self.scoring.max_score,
                "score range is inverted; resetting to [0,100]"
            );
            self.scoring.min_score = 0;
            self.scoring.max_score = 100;
        }
    }
}
