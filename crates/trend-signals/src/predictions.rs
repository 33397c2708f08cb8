//! Short, medium and long term prediction sentences for a trend signal.
//!
//! Each horizon has three candidate sentences. The one reported is picked by
//! hashing the trend id with the horizon, so the same trend always gets the
//! same text.

use opportunity_core::{Momentum, Predictions, TrendObservation};
use sha2::{Digest, Sha256};

pub fn generate_predictions(trend: &TrendObservation, velocity: f64, momentum: Momentum) -> Predictions {
    let factor = momentum.projection_factor();
    let projected = trend.growth_rate * factor;

    Predictions {
        short_term: pick(&trend.id, "short", short_term_templates(projected, velocity, factor)),
        medium_term: pick(&trend.id, "medium", medium_term_templates(trend, projected, factor)),
        long_term: pick(&trend.id, "long", long_term_templates(trend, projected, factor)),
    }
}

fn short_term_templates(projected: f64, velocity: f64, factor: f64) -> [String; 3] {
    [
        format!(
            "Expected {} of {:.1}% over next 3 months",
            if projected > 0.0 { "growth" } else { "decline" },
            projected.abs()
        ),
        format!(
            "{} adoption expected in early adopter segments",
            if velocity > 70.0 { "Rapid" } else { "Moderate" }
        ),
        format!(
            "Key drivers will {} market position",
            if factor > 1.0 { "strengthen" } else { "stabilize" }
        ),
    ]
}

fn medium_term_templates(trend: &TrendObservation, projected: f64, factor: f64) -> [String; 3] {
    let penetration = (trend.confidence_score + 20.0).min(80.0);
    [
        format!("Market penetration projected to reach {}% within 12 months", penetration),
        format!(
            "{} will become {} in target markets",
            trend.trend_name,
            if projected > 15.0 { "mainstream" } else { "established" }
        ),
        format!(
            "Infrastructure development will {}",
            if factor > 1.0 { "accelerate" } else { "proceed steadily" }
        ),
    ]
}

fn long_term_templates(trend: &TrendObservation, projected: f64, factor: f64) -> [String; 3] {
    [
        format!(
            "{} expected to {}",
            trend.trend_name,
            if projected > 0.0 {
                "mature into standard practice"
            } else {
                "be replaced by next-generation solutions"
            }
        ),
        format!(
            "Market consolidation likely as {}",
            if projected > 10.0 { "winners emerge" } else { "growth stabilizes" }
        ),
        if factor > 1.0 {
            "Innovation cycles will continue".to_string()
        } else {
            "Technology plateau anticipated".to_string()
        },
    ]
}

fn pick(trend_id: &str, horizon: &str, templates: [String; 3]) -> String {
    let idx = template_index(trend_id, horizon, templates.len());
    let [a, b, c] = templates;
    match idx {
        0 => a,
        1 => b,
        _ => c,
    }
}

/// Stable index derived from the first byte of SHA-256(trend id ":" horizon).
pub fn template_index(trend_id: &str, horizon: &str, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let mut hasher = Sha256::new();
    hasher.update(trend_id.as_bytes());
    hasher.update(b":");
    hasher.update(horizon.as_bytes());
    let digest = hasher.finalize();
    digest[0] as usize % count
}
