use crate::label::{contains_any, is_missing_text, normalize};
use crate::model::CatalogEntry;

/// One metadata inference rule: the first rule whose any phrase is contained
/// in the match context supplies defaults for attributes the catalog record
/// is missing. List order is load-bearing and must not be reordered.
#[derive(Debug, Clone)]
pub struct InferenceRule {
    pub code: &'static str,
    pub phrases: &'static [&'static str],
    pub material: &'static str,
    pub reusable: Option<bool>,
    pub single_use: Option<bool>,
    pub recycled_content_percent: Option<i32>,
    pub lifecycle_type: &'static str,
    pub recyclability: &'static str,
    /// Confidence multiplier in (0,1] applied when this rule fires.
    pub confidence_multiplier: f64,
}

pub const METADATA_INFERENCE_RULES: &[InferenceRule] = &[
    InferenceRule {
        code: "plastic_bottle",
        phrases: &["plastic bottle", "water bottle"],
        material: "plastic",
        reusable: Some(false),
        single_use: Some(true),
        recycled_content_percent: Some(0),
        lifecycle_type: "single_use",
        recyclability: "Low",
        confidence_multiplier: 0.82,
    },
    InferenceRule {
        code: "reusable_bottle",
        phrases: &["reusable bottle", "steel bottle", "insulated bottle"],
        material: "stainless steel",
        reusable: Some(true),
        single_use: Some(false),
        recycled_content_percent: Some(35),
        lifecycle_type: "reusable",
        recyclability: "High",
        confidence_multiplier: 0.9,
    },
    InferenceRule {
        code: "paper_cup",
        phrases: &["paper cup", "coffee cup", "disposable cup"],
        material: "paper lined",
        reusable: Some(false),
        single_use: Some(true),
        recycled_content_percent: Some(20),
        lifecycle_type: "single_use",
        recyclability: "Medium",
        confidence_multiplier: 0.84,
    },
    InferenceRule {
        code: "food_packaging_single_use",
        phrases: &["food packaging", "food container", "takeaway container"],
        material: "mixed plastic",
        reusable: Some(false),
        single_use: Some(true),
        recycled_content_percent: Some(0),
        lifecycle_type: "single_use",
        recyclability: "Low",
        confidence_multiplier: 0.82,
    },
    InferenceRule {
        code: "glass_container",
        phrases: &["glass bottle", "glass container"],
        material: "glass",
        reusable: Some(true),
        single_use: Some(false),
        recycled_content_percent: Some(35),
        lifecycle_type: "reusable",
        recyclability: "High",
        confidence_multiplier: 0.9,
    },
    InferenceRule {
        code: "plastic_bag",
        phrases: &["plastic bag", "grocery bag"],
        material: "plastic",
        reusable: Some(false),
        single_use: Some(true),
        recycled_content_percent: Some(0),
        lifecycle_type: "single_use",
        recyclability: "Low",
        confidence_multiplier: 0.82,
    },
    InferenceRule {
        code: "cloth_bag",
        phrases: &["cloth bag", "jute bag", "shopping bag"],
        material: "cloth",
        reusable: Some(true),
        single_use: Some(false),
        recycled_content_percent: Some(60),
        lifecycle_type: "reusable",
        recyclability: "High",
        confidence_multiplier: 0.9,
    },
    InferenceRule {
        code: "disposable_utensils",
        phrases: &["plastic straw", "disposable cutlery", "plastic fork"],
        material: "plastic",
        reusable: Some(false),
        single_use: Some(true),
        recycled_content_percent: Some(0),
        lifecycle_type: "single_use",
        recyclability: "Low",
        confidence_multiplier: 0.82,
    },
    InferenceRule {
        code: "reusable_utensils",
        phrases: &["metal straw", "reusable cutlery"],
        material: "stainless steel",
        reusable: Some(true),
        single_use: Some(false),
        recycled_content_percent: Some(30),
        lifecycle_type: "reusable",
        recyclability: "High",
        confidence_multiplier: 0.9,
    },
    InferenceRule {
        code: "fast_fashion",
        phrases: &["fast fashion", "polyester shirt"],
        material: "polyester",
        reusable: Some(false),
        single_use: Some(false),
        recycled_content_percent: Some(0),
        lifecycle_type: "fast_fashion",
        recyclability: "Low",
        confidence_multiplier: 0.8,
    },
    InferenceRule {
        code: "slow_fashion",
        phrases: &["second hand", "denim jacket"],
        material: "denim",
        reusable: Some(true),
        single_use: Some(false),
        recycled_content_percent: Some(0),
        lifecycle_type: "long_life",
        recyclability: "Medium",
        confidence_multiplier: 0.88,
    },
];

/// Per-request resolved metadata, tracking which attributes came from an
/// inference rule rather than the catalog record.
#[derive(Debug, Clone)]
pub struct MetadataResolution {
    pub material: String,
    pub lifecycle_type: String,
    pub reusable: bool,
    pub single_use: bool,
    pub recycled_content_percent: i32,
    pub recyclability: String,
    pub inferred: bool,
    pub inferred_fields: Vec<String>,
    pub confidence_multiplier: f64,
    pub rule_code: String,
}

/// Fill missing sustainability attributes on a catalog entry from the rule
/// table, then apply the documented fallbacks for anything still missing.
pub fn resolve_metadata(entry: &CatalogEntry, normalized_label: &str) -> MetadataResolution {
    let combined = normalize(&format!("{} {}", entry.category, entry.name));
    let material_normalized = normalize(&entry.material);
    let lifecycle_normalized = normalize(&entry.lifecycle_type);

    let material_missing = is_missing_text(&material_normalized);
    let lifecycle_missing = is_missing_text(&lifecycle_normalized);
    let reusable_missing = entry.reusable.is_none();
    let single_use_missing = entry.single_use.is_none();
    let recycled_content_missing = entry.recycled_content_percent.is_none();
    let recyclability_missing = is_missing_text(&entry.recyclability);

    let any_missing = material_missing
        || lifecycle_missing
        || reusable_missing
        || single_use_missing
        || recycled_content_missing
        || recyclability_missing;

    let rule = if any_missing {
        match_inference_rule(normalized_label, &combined)
    } else {
        None
    };

    let mut resolved_material = material_normalized;
    let mut resolved_lifecycle = lifecycle_normalized.clone();
    let mut resolved_reusable = resolve_reusable(entry, &lifecycle_normalized, &combined);
    let mut resolved_single_use = resolve_single_use(entry, &lifecycle_normalized, &combined);
    let mut resolved_recycled_content = entry
        .recycled_content_percent
        .map(|v| v.clamp(0, 100))
        .unwrap_or(-1);
    let mut resolved_recyclability = entry.recyclability.clone();
    let mut inferred_fields: Vec<String> = Vec::new();
    let mut rule_code = "none".to_string();
    let mut confidence_multiplier = 1.0;

    if let Some(rule) = rule {
        rule_code = rule.code.to_string();
        confidence_multiplier = rule.confidence_multiplier.clamp(0.0, 1.0);
        if material_missing && !is_missing_text(rule.material) {
            resolved_material = normalize(rule.material);
            inferred_fields.push("material".to_string());
        }
        if lifecycle_missing && !is_missing_text(rule.lifecycle_type) {
            resolved_lifecycle = normalize(rule.lifecycle_type);
            inferred_fields.push("lifecycle_type".to_string());
        }
        if reusable_missing {
            if let Some(reusable) = rule.reusable {
                resolved_reusable = reusable;
                inferred_fields.push("is_reusable".to_string());
            }
        }
        if single_use_missing {
            if let Some(single_use) = rule.single_use {
                resolved_single_use = single_use;
                inferred_fields.push("is_single_use".to_string());
            }
        }
        if recycled_content_missing {
            if let Some(content) = rule.recycled_content_percent {
                resolved_recycled_content = content.clamp(0, 100);
                inferred_fields.push("recycled_content_percent".to_string());
            }
        }
        if recyclability_missing && !is_missing_text(rule.recyclability) {
            resolved_recyclability = rule.recyclability.to_string();
            inferred_fields.push("recyclability".to_string());
        }
    }

    if resolved_recycled_content < 0 {
        resolved_recycled_content = 0;
    }
    if is_missing_text(&resolved_material) {
        resolved_material = combined.clone();
    }
    if is_missing_text(&resolved_lifecycle) {
        resolved_lifecycle = normalize(&entry.lifecycle_type);
    }
    if is_missing_text(&resolved_recyclability) {
        resolved_recyclability = "Unknown".to_string();
    }

    let inferred = !inferred_fields.is_empty();
    MetadataResolution {
        material: resolved_material,
        lifecycle_type: resolved_lifecycle,
        reusable: resolved_reusable,
        single_use: resolved_single_use,
        recycled_content_percent: resolved_recycled_content,
        recyclability: resolved_recyclability,
        inferred,
        inferred_fields,
        confidence_multiplier: if inferred { confidence_multiplier } else { 1.0 },
        rule_code,
    }
}

/// First rule with any phrase contained in `label + " " + combined` wins.
fn match_inference_rule(normalized_label: &str, combined: &str) -> Option<&'static InferenceRule> {
    let context = format!("{} {}", normalized_label, combined);
    let context = context.trim();
    METADATA_INFERENCE_RULES.iter().find(|rule| {
        rule.phrases.iter().any(|phrase| {
            let normalized = normalize(phrase);
            !normalized.is_empty() && context.contains(&normalized)
        })
    })
}

/// Secondary heuristic for a missing single-use flag.
fn resolve_single_use(entry: &CatalogEntry, lifecycle: &str, combined: &str) -> bool {
    if let Some(single_use) = entry.single_use {
        return single_use;
    }
    if contains_any(lifecycle, &["single use", "single_use", "single-use", "disposable"]) {
        return true;
    }
    contains_any(
        combined,
        &["single use", "single-use", "disposable", "plastic bottle", "plastic bag"],
    )
}

/// Secondary heuristic for a missing reusable flag.
fn resolve_reusable(entry: &CatalogEntry, lifecycle: &str, combined: &str) -> bool {
    if let Some(reusable) = entry.reusable {
        return reusable;
    }
    if contains_any(
        lifecycle,
        &["reusable", "refillable", "long life", "long_life", "durable"],
    ) {
        return true;
    }
    contains_any(
        combined,
        &["reusable", "refillable", "cloth bag", "steel bottle", "led"],
    )
}
