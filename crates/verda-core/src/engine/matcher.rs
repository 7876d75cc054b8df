use crate::label::normalize;
use crate::model::{CatalogEntry, MatchResult, MatchStrategy};
use std::collections::HashSet;

/// Minimum similarity for a fuzzy hit.
const FUZZY_MATCH_THRESHOLD: f64 = 0.45;

/// Look up a canonical label against a catalog snapshot.
///
/// Exact match on normalized name or category strictly dominates fuzzy.
/// Entries are scanned in the order given; equally-best fuzzy candidates
/// resolve to the first encountered, so a store with a stable enumeration
/// order makes matching deterministic.
pub fn find_best_match(label: &str, entries: &[CatalogEntry]) -> MatchResult {
    if label.trim().is_empty() {
        return MatchResult {
            entry: None,
            strategy: MatchStrategy::None,
            score: 0.0,
        };
    }

    for entry in entries {
        let name = normalize(&entry.name);
        let category = normalize(&entry.category);
        if label == name || label == category {
            tracing::info!(label, entry = %entry.name, "catalog match strategy=exact");
            return MatchResult {
                entry: Some(entry.clone()),
                strategy: MatchStrategy::Exact,
                score: 1.0,
            };
        }
    }

    let mut best: Option<&CatalogEntry> = None;
    let mut best_score = 0.0;
    for entry in entries {
        let name = normalize(&entry.name);
        let category = normalize(&entry.category);
        let combined = format!("{} {}", name, category);
        let score = similarity(label, &name)
            .max(similarity(label, &category))
            .max(similarity(label, combined.trim()));
        if score > best_score {
            best_score = score;
            best = Some(entry);
        }
    }

    match best {
        Some(entry) if best_score >= FUZZY_MATCH_THRESHOLD => {
            tracing::info!(
                label,
                entry = %entry.name,
                score = format!("{best_score:.3}"),
                "catalog match strategy=fuzzy"
            );
            MatchResult {
                entry: Some(entry.clone()),
                strategy: MatchStrategy::Fuzzy,
                score: best_score,
            }
        }
        _ => {
            tracing::info!(
                label,
                best_score = format!("{best_score:.3}"),
                "catalog match strategy=none"
            );
            MatchResult {
                entry: None,
                strategy: MatchStrategy::None,
                score: best_score,
            }
        }
    }
}

/// Similarity of two normalized strings: 1.0 on equality, 0.9 when one
/// contains the other, else the Jaccard index of their whitespace token
/// sets.
pub fn similarity(input: &str, candidate: &str) -> f64 {
    if input.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    if input == candidate {
        return 1.0;
    }
    if candidate.contains(input) || input.contains(candidate) {
        return 0.9;
    }

    let input_tokens: HashSet<&str> = input.split_whitespace().collect();
    let candidate_tokens: HashSet<&str> = candidate.split_whitespace().collect();
    if input_tokens.is_empty() || candidate_tokens.is_empty() {
        return 0.0;
    }

    let intersection = input_tokens.intersection(&candidate_tokens).count();
    let union = input_tokens.len() + candidate_tokens.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}
