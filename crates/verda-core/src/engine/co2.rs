use crate::config::ScoringConfig;
use crate::model::{clamp_f64, clamp_i32, round_three};

/// CO2 score plus the method detail recorded in the audit factor.
#[derive(Debug, Clone)]
pub struct Co2ScoreResult {
    pub score: i32,
    pub detail: String,
}

/// Convert an absolute carbon value into a score in `[min,max]` via
/// percentile rank against the catalog distribution. Lower carbon means a
/// higher score; monotonic for a fixed distribution.
pub fn compute_co2_score(co2_gram: f64, distribution: &[f64], config: &ScoringConfig) -> Co2ScoreResult {
    if distribution.is_empty() {
        return Co2ScoreResult {
            score: config.default_co2_score,
            detail: "method=default, reason=missing_distribution".to_string(),
        };
    }

    let percentile_rank = percentile_rank(co2_gram, distribution);

    let mut lower = clamp_f64(config.co2_normalization.lower_percentile, 0.0, 1.0);
    let mut upper = clamp_f64(config.co2_normalization.upper_percentile, 0.0, 1.0);
    if upper <= lower {
        // Degenerate window: fall back to the full range rather than fail.
        lower = 0.0;
        upper = 1.0;
    }

    let normalized = clamp_f64((percentile_rank - lower) / (upper - lower), 0.0, 1.0);
    let inverse = 1.0 - normalized;
    let range = (config.max_score - config.min_score) as f64;
    let score = (config.min_score as f64 + inverse * range).round() as i32;
    let detail = format!(
        "method=percentile_rank, percentile_rank={}, bounds=[{},{}], sample_size={}",
        round_three(percentile_rank),
        round_three(lower),
        round_three(upper),
        distribution.len()
    );
    Co2ScoreResult {
        score: clamp_i32(score, config.min_score, config.max_score),
        detail,
    }
}

/// Fractional position of `value` within the ascending `sorted_values`,
/// using midpoint-of-ties handling. A distribution of fewer than two values
/// pins the rank to 0.5.
pub fn percentile_rank(value: f64, sorted_values: &[f64]) -> f64 {
    if sorted_values.len() < 2 {
        return 0.5;
    }

    let lower_bound = first_index_ge(sorted_values, value);
    let upper_bound = first_index_gt(sorted_values, value);
    let mut rank = lower_bound as f64;
    if upper_bound > lower_bound {
        rank = lower_bound as f64 + (upper_bound - lower_bound - 1) as f64 / 2.0;
    }
    clamp_f64(rank / (sorted_values.len() - 1) as f64, 0.0, 1.0)
}

/// First index whose value is >= target.
fn first_index_ge(values: &[f64], target: f64) -> usize {
    values.partition_point(|v| *v < target)
}

/// First index whose value is > target.
fn first_index_gt(values: &[f64], target: f64) -> usize {
    values.partition_point(|v| *v <= target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_distribution_uses_default() {
        let config = ScoringConfig::default();
        let result = compute_co2_score(42.0, &[], &config);
        assert_eq!(result.score, config.default_co2_score);
        assert!(result.detail.contains("missing_distribution"));
    }

    #[test]
    fn test_single_value_distribution_is_midpoint() {
        assert_eq!(percentile_rank(100.0, &[100.0]), 0.5);
        assert_eq!(percentile_rank(5.0, &[100.0]), 0.5);
    }

    #[test]
    fn test_rank_below_and_above_distribution() {
        let dist = [10.0, 20.0, 30.0];
        assert_eq!(percentile_rank(1.0, &dist), 0.0);
        assert_eq!(percentile_rank(100.0, &dist), 1.0);
    }

    #[test]
    fn test_rank_midpoint_of_ties() {
        // value 20 spans indices 1..=3; rank = 1 + (4-1-1)/2 = 2, over n-1=4
        let dist = [10.0, 20.0, 20.0, 20.0, 30.0];
        assert!((percentile_rank(20.0, &dist) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rank_between_values() {
        // 25 is not present: lower == upper == 2, rank 2/3
        let dist = [10.0, 20.0, 30.0, 40.0];
        assert!((percentile_rank(25.0, &dist) - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_lower_carbon_scores_higher() {
        let config = ScoringConfig::default();
        let dist = [5.0, 10.0, 25.0, 50.0, 100.0, 200.0];
        let low = compute_co2_score(5.0, &dist, &config);
        let high = compute_co2_score(200.0, &dist, &config);
        assert!(low.score > high.score);
    }

    #[test]
    fn test_monotonic_non_increasing() {
        let config = ScoringConfig::default();
        let dist = [1.0, 4.0, 9.0, 16.0, 25.0, 36.0, 49.0];
        let mut previous = i32::MAX;
        for gram in [0.0, 1.0, 5.0, 10.0, 20.0, 40.0, 60.0] {
            let score = compute_co2_score(gram, &dist, &config).score;
            assert!(score <= previous);
            previous = score;
        }
    }

    #[test]
    fn test_degenerate_window_resets_to_full_range() {
        let mut config = ScoringConfig::default();
        config.co2_normalization.lower_percentile = 0.8;
        config.co2_normalization.upper_percentile = 0.2;
        let dist = [10.0, 20.0, 30.0];
        let result = compute_co2_score(10.0, &dist, &config);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_score_always_in_range() {
        let config = ScoringConfig::default();
        let dist = [1.0, 2.0, 3.0];
        for gram in [-10.0, 0.0, 2.0, 1e12] {
            let score = compute_co2_score(gram, &dist, &config).score;
            assert!((config.min_score..=config.max_score).contains(&score));
        }
    }
}
