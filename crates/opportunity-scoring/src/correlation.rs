//! Trend / Opportunity Correlation
//!
//! Links derived trend signals to an opportunity with a bounded correlation
//! in [-1, 1], classifies how and when the trend acts on the opportunity and
//! projects the effect of the trend speeding up or slowing down.

use chrono::{DateTime, Months, Utc};
use opportunity_core::stats::{clamp_score, mean, pearson};
use opportunity_core::{
    closed_enum, CompetitionLevel, EngineError, EngineResult, LifecycleStage, Momentum,
    Opportunity, OpportunityType, TrendSignal,
};
use serde::{Deserialize, Serialize};

/// Correlations at or below this magnitude are dropped
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.3;
/// Monthly points synthesised when a signal carries no history
const FLAT_HISTORY_MONTHS: u32 = 12;

closed_enum! {
    pub enum InfluenceType: "influence type" {
        Driver => "driver",
        Enabler => "enabler",
        Barrier => "barrier",
        Catalyst => "catalyst",
    }
}

impl InfluenceType {
    pub fn from_correlation(correlation: f64) -> Self {
        if correlation > 0.6 {
            InfluenceType::Catalyst
        } else if correlation > 0.3 {
            InfluenceType::Driver
        } else if correlation > 0.0 {
            InfluenceType::Enabler
        } else {
            InfluenceType::Barrier
        }
    }
}

closed_enum! {
    pub enum ImpactTiming: "impact timing" {
        Immediate => "immediate",
        ShortTerm => "short_term",
        MediumTerm => "medium_term",
        LongTerm => "long_term",
    }
}

impl ImpactTiming {
    pub fn from_time_to_peak(months: u32) -> Self {
        match months {
            0..=3 => ImpactTiming::Immediate,
            4..=6 => ImpactTiming::ShortTerm,
            7..=12 => ImpactTiming::MediumTerm,
            _ => ImpactTiming::LongTerm,
        }
    }
}

closed_enum! {
    pub enum TrendDirection: "trend direction" {
        Positive => "positive",
        Negative => "negative",
        Neutral => "neutral",
    }
}

impl TrendDirection {
    pub fn from_coefficient(coefficient: f64) -> Self {
        if coefficient > 0.1 {
            TrendDirection::Positive
        } else if coefficient < -0.1 {
            TrendDirection::Negative
        } else {
            TrendDirection::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: DateTime<Utc>,
    pub trend_strength: f64,
    pub opportunity_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalCorrelation {
    pub data_points: Vec<HistoricalPoint>,
    pub correlation_coefficient: f64,
    pub trend_direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioImpact {
    pub score_change: f64,
    pub timeline_change: String,
    pub risk_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveImpact {
    pub if_trend_accelerates: ScenarioImpact,
    pub if_trend_decelerates: ScenarioImpact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityTrend {
    pub trend_id: String,
    pub opportunity_correlation: f64,
    pub influence_type: InfluenceType,
    pub impact_timing: ImpactTiming,
    pub confidence_level: f64,
    pub historical_correlation: HistoricalCorrelation,
    pub predictive_impact: PredictiveImpact,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationConfig {
    /// Terms that mark an opportunity as part of the tracked market
    pub market_keywords: Vec<String>,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            market_keywords: vec!["dental".to_string(), "aesthetic".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorrelationAnalyzer {
    config: CorrelationConfig,
}

impl CorrelationAnalyzer {
    pub fn new(config: CorrelationConfig) -> Self {
        Self { config }
    }

    /// Significant correlations between `opp` and `signals`, strongest first.
    ///
    /// `overall_score` anchors the opportunity side of the historical series.
    pub fn analyze(
        &self,
        opp: &Opportunity,
        overall_score: f64,
        signals: &[TrendSignal],
        as_of: DateTime<Utc>,
    ) -> EngineResult<Vec<OpportunityTrend>> {
        let mut trends = Vec::new();

        for signal in signals {
            let correlation = self.correlation(opp, signal);
            if correlation.abs() <= SIGNIFICANCE_THRESHOLD {
                continue;
            }
            trends.push(OpportunityTrend {
                trend_id: signal.trend_id.clone(),
                opportunity_correlation: correlation,
                influence_type: InfluenceType::from_correlation(correlation),
                impact_timing: ImpactTiming::from_time_to_peak(signal.time_to_peak),
                confidence_level: signal.confidence_score,
                historical_correlation: historical_correlation(correlation, overall_score, signal, as_of)?,
                predictive_impact: predictive_impact(correlation, signal),
            });
        }

        trends.sort_by(|a, b| {
            b.opportunity_correlation
                .abs()
                .total_cmp(&a.opportunity_correlation.abs())
        });

        tracing::debug!(
            "Correlated {} with {} of {} signals",
            opp.id,
            trends.len(),
            signals.len()
        );
        Ok(trends)
    }

    /// Sum of fixed contributions in tenths, so thresholds compare exactly.
    pub fn correlation(&self, opp: &Opportunity, signal: &TrendSignal) -> f64 {
        let mut tenths: i32 = 0;

        if self.mentions_market(&opp.description, signal) {
            tenths += 3;
        }

        if (opp.growth_potential - signal.velocity).abs() < 20.0 {
            tenths += 2;
        } else {
            tenths -= 1;
        }

        match (signal.lifecycle_stage, opp.opportunity_type) {
            (LifecycleStage::Emerging, OpportunityType::NewMarket) => tenths += 3,
            (LifecycleStage::Declining, OpportunityType::Acquisition) => tenths += 2,
            _ => {}
        }

        if signal.momentum == Momentum::Accelerating && opp.competition_level == CompetitionLevel::Low {
            tenths += 2;
        }

        (f64::from(tenths) / 10.0).clamp(-1.0, 1.0)
    }

    fn mentions_market(&self, description: &str, signal: &TrendSignal) -> bool {
        let description = description.to_lowercase();
        signal
            .market_segments
            .iter()
            .chain(self.config.market_keywords.iter())
            .map(|term| term.trim().to_lowercase())
            .any(|term| !term.is_empty() && description.contains(&term))
    }
}

fn historical_correlation(
    correlation: f64,
    overall_score: f64,
    signal: &TrendSignal,
    as_of: DateTime<Utc>,
) -> EngineResult<HistoricalCorrelation> {
    let data_points = if signal.history.is_empty() {
        flat_history(overall_score, signal, as_of)?
    } else {
        let strengths: Vec<f64> = signal.history.iter().map(|p| clamp_score(p.value)).collect();
        let baseline = mean(&strengths);
        signal
            .history
            .iter()
            .zip(&strengths)
            .map(|(point, &strength)| HistoricalPoint {
                date: point.date,
                trend_strength: strength,
                opportunity_score: clamp_score(overall_score + correlation * (strength - baseline) * 0.5),
            })
            .collect()
    };

    let strengths: Vec<f64> = data_points.iter().map(|p| p.trend_strength).collect();
    let scores: Vec<f64> = data_points.iter().map(|p| p.opportunity_score).collect();
    let coefficient = pearson(&strengths, &scores).unwrap_or(correlation);

    Ok(HistoricalCorrelation {
        data_points,
        correlation_coefficient: coefficient,
        trend_direction: TrendDirection::from_coefficient(coefficient),
    })
}

/// Thirteen monthly points ending at `as_of`, flat at the signal's confidence.
fn flat_history(overall_score: f64, signal: &TrendSignal, as_of: DateTime<Utc>) -> EngineResult<Vec<HistoricalPoint>> {
    (0..=FLAT_HISTORY_MONTHS)
        .rev()
        .map(|months_back| {
            let date = as_of
                .checked_sub_months(Months::new(months_back))
                .ok_or_else(|| EngineError::InvalidData(format!("history date out of range ({} months back)", months_back)))?;
            Ok(HistoricalPoint {
                date,
                trend_strength: clamp_score(signal.confidence_score),
                opportunity_score: clamp_score(overall_score),
            })
        })
        .collect()
}

fn predictive_impact(correlation: f64, signal: &TrendSignal) -> PredictiveImpact {
    let base = correlation.abs() * 15.0;
    let positive = correlation > 0.0;

    PredictiveImpact {
        if_trend_accelerates: ScenarioImpact {
            score_change: if positive { base } else { -base },
            timeline_change: if signal.momentum == Momentum::Accelerating {
                "accelerated by 2-3 months".to_string()
            } else {
                "minimal change".to_string()
            },
            risk_change: if positive { -5.0 } else { 10.0 },
        },
        if_trend_decelerates: ScenarioImpact {
            score_change: if positive { -base * 0.6 } else { base * 0.6 },
            timeline_change: "delayed by 1-2 months".to_string(),
            risk_change: if positive { 8.0 } else { -3.0 },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{as_of, reference_opportunity, signal};
    use approx::assert_relative_eq;
    use chrono::Duration;
    use opportunity_core::TrendDataPoint;

    #[test]
    fn test_full_alignment_is_catalyst() {
        let opp = reference_opportunity();
        let mut s = signal("t1", 50.0);
        s.lifecycle_stage = LifecycleStage::Emerging;
        s.momentum = Momentum::Accelerating;

        let analyzer = CorrelationAnalyzer::default();
        assert_relative_eq!(analyzer.correlation(&opp, &s), 1.0, epsilon = 1e-12);

        let trends = analyzer.analyze(&opp, 78.0, &[s], as_of()).unwrap();
        assert_eq!(trends.len(), 1);
        let trend = &trends[0];
        assert_eq!(trend.influence_type, InfluenceType::Catalyst);
        assert_eq!(trend.impact_timing, ImpactTiming::MediumTerm);
        assert_relative_eq!(trend.predictive_impact.if_trend_accelerates.score_change, 15.0, epsilon = 1e-9);
        assert_eq!(trend.predictive_impact.if_trend_accelerates.timeline_change, "accelerated by 2-3 months");
        assert_relative_eq!(trend.predictive_impact.if_trend_decelerates.score_change, -9.0, epsilon = 1e-9);
        assert_eq!(trend.predictive_impact.if_trend_decelerates.risk_change, 8.0);
    }

    #[test]
    fn test_weak_correlations_filtered() {
        let mut opp = reference_opportunity();
        opp.description = "Logistics software".to_string();
        // growth alignment only: exactly 0.2
        let s = signal("t1", 45.0);
        let analyzer = CorrelationAnalyzer::default();
        assert_relative_eq!(analyzer.correlation(&opp, &s), 0.2, epsilon = 1e-12);
        assert!(analyzer.analyze(&opp, 60.0, &[s], as_of()).unwrap().is_empty());
    }

    #[test]
    fn test_sorted_by_magnitude() {
        let opp = reference_opportunity();
        let driver = signal("driver", 45.0);
        let mut catalyst = signal("catalyst", 45.0);
        catalyst.momentum = Momentum::Accelerating;

        let trends = CorrelationAnalyzer::default()
            .analyze(&opp, 78.0, &[driver, catalyst], as_of())
            .unwrap();
        let ids: Vec<&str> = trends.iter().map(|t| t.trend_id.as_str()).collect();
        assert_eq!(ids, vec!["catalyst", "driver"]);
        assert_eq!(trends[1].influence_type, InfluenceType::Driver);
        for pair in trends.windows(2) {
            assert!(pair[0].opportunity_correlation.abs() >= pair[1].opportunity_correlation.abs());
        }
    }

    #[test]
    fn test_segments_and_keywords() {
        let mut opp = reference_opportunity();
        opp.description = "Skincare clinic network".to_string();
        let mut s = signal("t1", 45.0);
        let analyzer = CorrelationAnalyzer::new(CorrelationConfig { market_keywords: Vec::new() });
        assert_relative_eq!(analyzer.correlation(&opp, &s), 0.2, epsilon = 1e-12);

        s.market_segments = vec!["Skincare".to_string()];
        assert_relative_eq!(analyzer.correlation(&opp, &s), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_history_without_data_points() {
        let opp = reference_opportunity();
        let trends = CorrelationAnalyzer::default()
            .analyze(&opp, 78.0, &[signal("t1", 45.0)], as_of())
            .unwrap();
        let history = &trends[0].historical_correlation;

        assert_eq!(history.data_points.len(), 13);
        assert_eq!(history.data_points.last().map(|p| p.date), Some(as_of()));
        assert_eq!(
            history.data_points[0].date,
            as_of().checked_sub_months(Months::new(12)).unwrap()
        );
        // flat series falls back to the correlation itself
        assert_relative_eq!(history.correlation_coefficient, trends[0].opportunity_correlation, epsilon = 1e-12);
        assert_eq!(history.trend_direction, TrendDirection::Positive);
    }

    #[test]
    fn test_history_from_data_points() {
        let opp = reference_opportunity();
        let mut s = signal("t1", 45.0);
        s.history = (0..4)
            .map(|i| TrendDataPoint {
                date: as_of() - Duration::days(30 * (4 - i)),
                value: 40.0 + 10.0 * i as f64,
                source: "survey".to_string(),
            })
            .collect();

        let trends = CorrelationAnalyzer::default().analyze(&opp, 60.0, &[s], as_of()).unwrap();
        let history = &trends[0].historical_correlation;
        assert_eq!(history.data_points.len(), 4);
        // mean 55, correlation 0.5: 60 + 0.5 * (40 - 55) * 0.5
        assert_relative_eq!(history.data_points[0].opportunity_score, 56.25, epsilon = 1e-9);
        assert_relative_eq!(history.correlation_coefficient, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_exact_threshold_sum_is_dropped() {
        let mut opp = reference_opportunity();
        opp.description = "Regional lab roll-up".to_string();
        opp.opportunity_type = OpportunityType::Acquisition;
        opp.growth_potential = 10.0;
        let mut s = signal("t1", 100.0);
        s.lifecycle_stage = LifecycleStage::Declining;
        s.momentum = Momentum::Accelerating;

        // -0.1 + 0.2 + 0.2 lands exactly on the threshold
        let analyzer = CorrelationAnalyzer::default();
        assert_eq!(analyzer.correlation(&opp, &s), 0.3);
        assert!(analyzer.analyze(&opp, 60.0, &[s], as_of()).unwrap().is_empty());
    }

    #[test]
    fn test_timing_and_direction_tables() {
        assert_eq!(ImpactTiming::from_time_to_peak(3), ImpactTiming::Immediate);
        assert_eq!(ImpactTiming::from_time_to_peak(6), ImpactTiming::ShortTerm);
        assert_eq!(ImpactTiming::from_time_to_peak(12), ImpactTiming::MediumTerm);
        assert_eq!(ImpactTiming::from_time_to_peak(13), ImpactTiming::LongTerm);
        assert_eq!(TrendDirection::from_coefficient(0.05), TrendDirection::Neutral);
        assert_eq!(TrendDirection::from_coefficient(-0.5), TrendDirection::Negative);
        assert_eq!(InfluenceType::from_correlation(-0.4), InfluenceType::Barrier);
    }
}
