//! Trend Signal Detection
//!
//! Turns a raw trend observation into a derived signal: velocity, momentum,
//! lifecycle stage, market impact, opportunity score and signal strength.

use chrono::{DateTime, Duration, Utc};
use opportunity_core::stats::clamp_score;
use opportunity_core::{
    EngineResult, GeographicScope, LifecycleStage, Momentum, SignalType, SourceMomentum,
    TrendCategory, TrendObservation, TrendSignal,
};
use rayon::prelude::*;

use crate::predictions::generate_predictions;
use crate::related::find_related_trends;

/// Signals scoring above this are flagged as watched
pub const WATCH_THRESHOLD: f64 = 75.0;

#[derive(Debug, Clone, Default)]
pub struct DetectionConfig {
    /// Drop signals whose confidence falls below this value in batch detection
    pub min_confidence: Option<f64>,
}

/// Single authoritative detector for trend signals
#[derive(Debug, Clone, Default)]
pub struct TrendSignalDetector {
    config: DetectionConfig,
}

impl TrendSignalDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Derive the signal for one observation. `pool` is searched for related trends.
    pub fn detect(
        &self,
        trend: &TrendObservation,
        pool: &[TrendObservation],
        as_of: DateTime<Utc>,
    ) -> EngineResult<TrendSignal> {
        trend.validate()?;

        let confidence = clamp_score(trend.confidence_score);
        let velocity = calculate_velocity(trend);
        let momentum = analyze_momentum(trend, velocity);
        let lifecycle_stage = determine_lifecycle_stage(trend, velocity);
        let market_impact = calculate_market_impact(trend);
        let opportunity_score = calculate_opportunity_score(trend, velocity, market_impact);
        let signal_type = determine_signal_strength(confidence, velocity, opportunity_score);
        let time_to_peak = calculate_time_to_peak(trend, momentum, velocity);
        let predictions = generate_predictions(trend, velocity, momentum);

        tracing::debug!(
            "Detected signal for {}: velocity={:.1} momentum={} stage={} opportunity={:.1}",
            trend.id,
            velocity,
            momentum,
            lifecycle_stage,
            opportunity_score
        );

        Ok(TrendSignal {
            id: format!("signal_{}", trend.id),
            trend_id: trend.id.clone(),
            signal_type,
            trend_name: trend.trend_name.clone(),
            description: trend.description.clone(),
            category: trend.category,
            time_horizon: trend.time_horizon,
            confidence_score: confidence,
            velocity,
            momentum,
            market_impact,
            time_to_peak,
            lifecycle_stage,
            related_trends: find_related_trends(trend, pool),
            key_drivers: trend.supporting_data.key_drivers.clone(),
            risk_factors: trend.supporting_data.barriers.clone(),
            opportunity_score,
            first_detected: estimate_first_detection(confidence, as_of),
            last_updated: as_of,
            data_sources: identify_data_sources(trend.category),
            geographic_scope: GeographicScope::for_category(trend.category),
            market_segments: trend.market_segments.clone(),
            watched: opportunity_score > WATCH_THRESHOLD,
            predictions,
            history: trend.supporting_data.data_points.clone(),
        })
    }

    /// Detect signals for every observation in parallel, using the whole batch as the
    /// related-trend pool. Output follows input order.
    pub fn detect_all(
        &self,
        trends: &[TrendObservation],
        as_of: DateTime<Utc>,
    ) -> EngineResult<Vec<TrendSignal>> {
        let detected = trends
            .par_iter()
            .map(|trend| self.detect(trend, trends, as_of))
            .collect::<EngineResult<Vec<_>>>()?;

        let signals: Vec<TrendSignal> = detected
            .into_iter()
            .filter(|signal| self.passes_filter(signal))
            .collect();

        tracing::info!("Detected {} trend signals from {} observations", signals.len(), trends.len());
        Ok(signals)
    }

    /// Whether a signal clears the configured confidence threshold
    pub fn passes_filter(&self, signal: &TrendSignal) -> bool {
        match self.config.min_confidence {
            Some(min) => signal.confidence_score >= min,
            None => true,
        }
    }
}

/// Velocity: growth magnitude scaled by momentum, confidence, horizon and category.
pub fn calculate_velocity(trend: &TrendObservation) -> f64 {
    let mut velocity = trend.growth_rate.abs() * 2.0;
    velocity *= trend.momentum.velocity_factor();
    velocity *= clamp_score(trend.confidence_score) / 100.0;
    velocity *= trend.time_horizon.velocity_factor();
    velocity *= trend.category.velocity_factor();
    clamp_score(velocity)
}

pub fn analyze_momentum(trend: &TrendObservation, velocity: f64) -> Momentum {
    if trend.growth_rate < -10.0 && trend.momentum == SourceMomentum::Decelerating {
        return Momentum::Reversing;
    }
    if velocity > 80.0 && trend.momentum == SourceMomentum::Accelerating {
        return Momentum::Accelerating;
    }
    if velocity < 30.0 && trend.growth_rate > 0.0 && trend.momentum == SourceMomentum::Decelerating {
        return Momentum::Decelerating;
    }
    trend.momentum.into()
}

pub fn determine_lifecycle_stage(trend: &TrendObservation, velocity: f64) -> LifecycleStage {
    let confidence = clamp_score(trend.confidence_score);

    // Low confidence but moving fast
    if confidence < 60.0 && velocity > 60.0 {
        return LifecycleStage::Emerging;
    }
    if confidence > 70.0 && velocity > 50.0 && trend.growth_rate > 15.0 {
        return LifecycleStage::Growing;
    }
    if confidence > 80.0 && velocity < 50.0 && trend.growth_rate > 0.0 {
        return LifecycleStage::Mature;
    }
    if trend.growth_rate < 0.0 {
        return LifecycleStage::Declining;
    }
    LifecycleStage::Emerging
}

pub fn calculate_market_impact(trend: &TrendObservation) -> f64 {
    let base = (clamp_score(trend.confidence_score) + trend.growth_rate.abs()) / 2.0;
    let scaled = base * trend.category.impact_factor() * trend.time_horizon.impact_factor();
    clamp_score(scaled + trend.market_segments.len() as f64 * 5.0)
}

pub fn calculate_opportunity_score(trend: &TrendObservation, velocity: f64, market_impact: f64) -> f64 {
    let mut score = clamp_score(trend.confidence_score) * 0.3
        + velocity * 0.3
        + market_impact * 0.2
        + trend.growth_rate.abs() * 0.2;

    if !trend.opportunities.is_empty() {
        let avg_value = trend.opportunities.iter().map(|o| o.potential_value).sum::<f64>()
            / trend.opportunities.len() as f64;
        score += (avg_value / 100_000.0).clamp(0.0, 20.0);
    }

    score -= trend.supporting_data.barriers.len() as f64 * 2.0;

    if trend.opportunities.iter().any(|o| o.time_to_market <= 6.0) {
        score += 10.0;
    }

    clamp_score(score)
}

pub fn combined_strength(confidence: f64, velocity: f64, opportunity: f64) -> f64 {
    (confidence + velocity + opportunity) / 3.0
}

pub fn determine_signal_strength(confidence: f64, velocity: f64, opportunity: f64) -> SignalType {
    let combined = combined_strength(confidence, velocity, opportunity);
    if combined > 85.0 && velocity > 80.0 {
        SignalType::Breakthrough
    } else if combined > 75.0 {
        SignalType::Strong
    } else if combined > 60.0 {
        SignalType::Moderate
    } else {
        SignalType::Weak
    }
}

pub fn calculate_time_to_peak(trend: &TrendObservation, momentum: Momentum, velocity: f64) -> u32 {
    let mut months = momentum.peak_base_months();

    if velocity > 80.0 {
        months *= 0.7;
    } else if velocity < 30.0 {
        months *= 1.5;
    }

    months *= trend.time_horizon.peak_factor();

    months.clamp(1.0, 36.0).round() as u32
}

/// Older, better-established trends were first seen further in the past.
pub fn estimate_first_detection(confidence: f64, as_of: DateTime<Utc>) -> DateTime<Utc> {
    let days_ago = if confidence < 50.0 {
        30
    } else if confidence < 70.0 {
        60
    } else if confidence < 85.0 {
        90
    } else {
        120
    };
    as_of - Duration::days(days_ago)
}

pub fn identify_data_sources(category: TrendCategory) -> Vec<String> {
    let mut sources = vec!["Market Research"];
    match category {
        TrendCategory::Technology => sources.extend(["Patent Filings", "R&D Investment Data"]),
        TrendCategory::Consumer => sources.extend(["Social Media Analytics", "Consumer Surveys"]),
        TrendCategory::Economic => sources.extend(["Economic Indicators", "Financial Reports"]),
        TrendCategory::Regulatory => sources.extend(["Government Publications", "Legal Databases"]),
        TrendCategory::Demographic => {}
    }
    sources.extend(["Industry Reports", "News Analytics"]);
    sources.into_iter().map(String::from).collect()
}
