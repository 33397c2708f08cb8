use std::collections::HashSet;

use opportunity_core::stats::texts_overlap;
use opportunity_core::TrendObservation;

/// Minimum similarity for a trend to be listed as related
const RELATED_THRESHOLD: f64 = 0.3;
const MAX_RELATED: usize = 3;

/// Names of the (up to three) trends in `pool` most similar to `trend`.
pub fn find_related_trends(trend: &TrendObservation, pool: &[TrendObservation]) -> Vec<String> {
    let mut scored: Vec<(f64, &TrendObservation)> = pool
        .iter()
        .filter(|other| other.id != trend.id)
        .map(|other| (trend_similarity(trend, other), other))
        .filter(|(similarity, _)| *similarity > RELATED_THRESHOLD)
        .collect();

    // Stable sort keeps pool order among ties
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    scored
        .into_iter()
        .take(MAX_RELATED)
        .map(|(_, other)| other.trend_name.clone())
        .collect()
}

/// Category match, segment Jaccard overlap and shared key drivers.
pub fn trend_similarity(a: &TrendObservation, b: &TrendObservation) -> f64 {
    let mut similarity = 0.0;

    if a.category == b.category {
        similarity += 0.3;
    }

    let segments_a: HashSet<&str> = a.market_segments.iter().map(String::as_str).collect();
    let segments_b: HashSet<&str> = b.market_segments.iter().map(String::as_str).collect();
    let union = segments_a.union(&segments_b).count();
    if union > 0 {
        let shared = segments_a.intersection(&segments_b).count();
        similarity += shared as f64 / union as f64 * 0.4;
    }

    let shares_driver = a.supporting_data.key_drivers.iter().any(|driver| {
        b.supporting_data
            .key_drivers
            .iter()
            .any(|other| texts_overlap(driver, other))
    });
    if shares_driver {
        similarity += 0.3;
    }

    similarity
}
