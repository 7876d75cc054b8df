use crate::config::ScoringConfig;
use crate::engine::co2::compute_co2_score;
use crate::engine::inference::MetadataResolution;
use crate::label::{contains_any, normalize};
use crate::model::{clamp_i32, round_two, CatalogEntry, RatingDecision, ScoreFactor};

struct FeatureAdjustment {
    total: i32,
    factors: Vec<ScoreFactor>,
}

/// Combine catalog score, CO2 score and feature adjustments into a bounded
/// eco-score with a full audit trail. The factor deltas sum to the final
/// pre-clamp score.
pub fn rate_entry(
    entry: &CatalogEntry,
    resolution: &MetadataResolution,
    nature_positive: bool,
    distribution: &[f64],
    config: &ScoringConfig,
) -> RatingDecision {
    let catalog_eco_score = entry
        .catalog_eco_score
        .unwrap_or(config.default_catalog_eco_score);
    let co2_gram = entry
        .carbon_impact_gram
        .unwrap_or(config.default_carbon_impact_gram);
    let co2_result = compute_co2_score(co2_gram, distribution, config);
    let co2_score = co2_result.score;

    let catalog_contribution = config.catalog_weight * catalog_eco_score as f64;
    let co2_contribution = config.co2_weight * co2_score as f64;

    let recyclability = resolution.recyclability.clone();
    let recyclability_normalized = normalize(&recyclability);
    let combined = normalize(&format!("{} {}", entry.category, entry.name));

    let adjustment = compute_feature_adjustment(resolution, &combined, &recyclability_normalized, config);

    let mut score_factors = Vec::new();
    score_factors.push(ScoreFactor::new(
        "catalog_weight",
        "Catalog eco score contribution",
        round_two(catalog_contribution),
        format!(
            "catalog_eco_score={}, weight={}",
            catalog_eco_score, config.catalog_weight
        ),
    ));
    score_factors.push(ScoreFactor::new(
        "co2_weight",
        "CO2 score contribution",
        round_two(co2_contribution),
        format!(
            "co2_score={}, co2_gram={}, weight={}, {}",
            co2_score,
            round_two(co2_gram),
            config.co2_weight,
            co2_result.detail
        ),
    ));
    if resolution.inferred {
        score_factors.push(ScoreFactor::new(
            "metadata_inference",
            "Metadata inferred from label/category",
            0.0,
            format!(
                "rule={}, fields={}, confidence_multiplier={}",
                resolution.rule_code,
                resolution.inferred_fields.join("|"),
                resolution.confidence_multiplier
            ),
        ));
    }
    score_factors.extend(adjustment.factors);

    let mut score = catalog_contribution + co2_contribution + adjustment.total as f64;
    let pre_boost_score = round_two(score);

    let greener_alternative = resolution.reusable
        || score >= config.greener_alternative_threshold as f64
        || nature_positive;
    let mut greener_boost = 0;
    if greener_alternative {
        greener_boost = config.greener_alternative_boost;
        score += greener_boost as f64;
        score_factors.push(ScoreFactor::new(
            "greener_boost",
            "Greener alternative boost",
            greener_boost as f64,
            format!("threshold={}", config.greener_alternative_threshold),
        ));
    }
    let eco_score = clamp_i32(score.round() as i32, config.min_score, config.max_score);

    let (recommendation, summary) = if nature_positive {
        (
            "Already eco-positive. No swap needed; plant it, protect it, and keep it growing."
                .to_string(),
            "This looks like a natural living item with a net-positive environmental role. \
             There is no greener replacement to suggest."
                .to_string(),
        )
    } else if greener_alternative {
        (
            "Great choice. This is already a greener alternative.".to_string(),
            "This item is a greener alternative with a strong eco profile. Keep using \
             reusable or refillable options."
                .to_string(),
        )
    } else if eco_score < config.high_impact_threshold {
        (
            "Consider switching to reusable/refillable alternatives when possible.".to_string(),
            "This item has a relatively high environmental impact due to material or \
             single-use pattern."
                .to_string(),
        )
    } else if eco_score < config.moderate_impact_threshold {
        (
            "Try a lower-impact alternative or improve recycling habits.".to_string(),
            "This item has a moderate impact and can be improved with better reuse or \
             recycling choices."
                .to_string(),
        )
    } else {
        (
            "Good choice overall. Look for refill/reuse opportunities to improve further."
                .to_string(),
            "This item has a relatively good eco profile compared with common alternatives."
                .to_string(),
        )
    };

    RatingDecision {
        eco_score,
        catalog_eco_score,
        co2_score,
        co2_gram,
        recyclability,
        recommendation,
        summary,
        greener_alternative,
        catalog_contribution: round_two(catalog_contribution),
        co2_contribution: round_two(co2_contribution),
        feature_adjustment: adjustment.total,
        pre_boost_score,
        greener_alternative_boost: greener_boost,
        score_factors,
    }
}

/// Sum of independently triggered deltas, except the recycled-content and
/// recyclability tiers which are ordered first-match ladders.
fn compute_feature_adjustment(
    resolution: &MetadataResolution,
    combined: &str,
    recyclability_normalized: &str,
    config: &ScoringConfig,
) -> FeatureAdjustment {
    let adjustments = &config.adjustments;
    let thresholds = &config.feature_thresholds;
    let mut total = 0;
    let mut factors = Vec::new();

    let (material_context, material_source) = if resolution.material.trim().is_empty() {
        (combined, "fallback_name_category")
    } else {
        (resolution.material.as_str(), "catalog_material")
    };
    let lifecycle = resolution.lifecycle_type.as_str();
    let recycled_content = resolution.recycled_content_percent.clamp(0, 100);

    if resolution.single_use {
        total += adjustments.single_use_penalty;
        factors.push(ScoreFactor::new(
            "single_use_penalty",
            "Single-use penalty",
            adjustments.single_use_penalty as f64,
            "lifecycle indicates single-use",
        ));
    }
    if resolution.reusable {
        total += adjustments.reusable_bonus;
        factors.push(ScoreFactor::new(
            "reusable_bonus",
            "Reusable bonus",
            adjustments.reusable_bonus as f64,
            "is_reusable=true or lifecycle indicates reusable",
        ));
    }
    if contains_any(lifecycle, &["refillable"]) {
        total += adjustments.refillable_lifecycle_bonus;
        factors.push(ScoreFactor::new(
            "refillable_lifecycle_bonus",
            "Refillable lifecycle bonus",
            adjustments.refillable_lifecycle_bonus as f64,
            "lifecycle_type=refillable",
        ));
    }
    if contains_any(lifecycle, &["long life", "long_life", "durable"]) {
        total += adjustments.long_life_lifecycle_bonus;
        factors.push(ScoreFactor::new(
            "long_life_lifecycle_bonus",
            "Long-life lifecycle bonus",
            adjustments.long_life_lifecycle_bonus as f64,
            "lifecycle_type=long_life/durable",
        ));
    }
    if contains_any(lifecycle, &["biodegradable", "compostable"]) {
        total += adjustments.biodegradable_lifecycle_bonus;
        factors.push(ScoreFactor::new(
            "biodegradable_lifecycle_bonus",
            "Biodegradable lifecycle bonus",
            adjustments.biodegradable_lifecycle_bonus as f64,
            "lifecycle_type=biodegradable/compostable",
        ));
    }
    if contains_any(material_context, &["plastic", "polystyrene", "polyester"]) {
        total += adjustments.plastic_penalty;
        factors.push(ScoreFactor::new(
            "plastic_penalty",
            "Plastic material penalty",
            adjustments.plastic_penalty as f64,
            format!("source={material_source}, material contains plastic"),
        ));
    }
    if contains_any(material_context, &["paper", "carton"]) {
        total += adjustments.paper_penalty;
        factors.push(ScoreFactor::new(
            "paper_penalty",
            "Paper material adjustment",
            adjustments.paper_penalty as f64,
            format!("source={material_source}, material contains paper/carton"),
        ));
    }
    if contains_any(material_context, &["aluminum", "glass"]) {
        total += adjustments.aluminum_glass_bonus;
        factors.push(ScoreFactor::new(
            "aluminum_glass_bonus",
            "Aluminum/Glass bonus",
            adjustments.aluminum_glass_bonus as f64,
            format!("source={material_source}, material contains aluminum/glass"),
        ));
    }
    if contains_any(material_context, &["cloth", "jute", "bamboo", "beeswax"]) {
        total += adjustments.cloth_recycled_bonus;
        factors.push(ScoreFactor::new(
            "cloth_recycled_bonus",
            "Cloth/Recycled bonus",
            adjustments.cloth_recycled_bonus as f64,
            format!("source={material_source}, material contains cloth/jute/bamboo/beeswax"),
        ));
    }
    if recycled_content >= thresholds.recycled_content_high_percent {
        total += adjustments.recycled_content_high_bonus;
        factors.push(ScoreFactor::new(
            "recycled_content_high_bonus",
            "High recycled-content bonus",
            adjustments.recycled_content_high_bonus as f64,
            format!(
                "recycled_content_percent={recycled_content}, threshold={}",
                thresholds.recycled_content_high_percent
            ),
        ));
    } else if recycled_content >= thresholds.recycled_content_medium_percent {
        total += adjustments.recycled_content_medium_bonus;
        factors.push(ScoreFactor::new(
            "recycled_content_medium_bonus",
            "Medium recycled-content bonus",
            adjustments.recycled_content_medium_bonus as f64,
            format!(
                "recycled_content_percent={recycled_content}, threshold={}",
                thresholds.recycled_content_medium_percent
            ),
        ));
    }
    if contains_any(recyclability_normalized, &["high"]) {
        total += adjustments.recyclability_high_bonus;
        factors.push(ScoreFactor::new(
            "recyclability_high_bonus",
            "High recyclability bonus",
            adjustments.recyclability_high_bonus as f64,
            "recyclability=high",
        ));
    } else if contains_any(recyclability_normalized, &["medium"]) {
        total += adjustments.recyclability_medium_bonus;
        factors.push(ScoreFactor::new(
            "recyclability_medium_bonus",
            "Medium recyclability bonus",
            adjustments.recyclability_medium_bonus as f64,
            "recyclability=medium",
        ));
    } else if contains_any(recyclability_normalized, &["low", "unknown"]) {
        total += adjustments.recyclability_low_penalty;
        factors.push(ScoreFactor::new(
            "recyclability_low_penalty",
            "Low recyclability penalty",
            adjustments.recyclability_low_penalty as f64,
            "recyclability=low/unknown",
        ));
    } else if contains_any(recyclability_normalized, &["organic"]) {
        total += adjustments.recyclability_organic_bonus;
        factors.push(ScoreFactor::new(
            "recyclability_organic_bonus",
            "Organic recyclability bonus",
            adjustments.recyclability_organic_bonus as f64,
            "recyclability=organic",
        ));
    }

    FeatureAdjustment { total, factors }
}
