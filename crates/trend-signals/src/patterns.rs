use opportunity_core::{closed_enum, LifecycleStage, Momentum, TrendSignal};
use serde::{Deserialize, Serialize};

closed_enum! {
    pub enum PatternType: "pattern type" {
        Cyclical => "cyclical",
        Linear => "linear",
        Exponential => "exponential",
        Logarithmic => "logarithmic",
        Sigmoid => "sigmoid",
        Chaotic => "chaotic",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seasonality {
    pub factor: f64,
    pub peak_months: Vec<u32>,
    pub trough_months: Vec<u32>,
}

/// External driver that tends to move with the trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationFactor {
    pub factor_name: String,
    pub correlation_strength: f64,
    pub lag_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPattern {
    pub trend_id: String,
    pub pattern_type: PatternType,
    pub pattern_strength: f64,
    pub periodicity: Option<u32>,
    pub seasonality: Option<Seasonality>,
    pub correlation_factors: Vec<CorrelationFactor>,
}

pub fn analyze_pattern(signal: &TrendSignal) -> TrendPattern {
    TrendPattern {
        trend_id: signal.trend_id.clone(),
        pattern_type: identify_pattern_type(signal),
        pattern_strength: signal.confidence_score * 0.8,
        periodicity: match signal.lifecycle_stage {
            LifecycleStage::Emerging => None,
            _ => Some(12),
        },
        seasonality: seasonality_for(signal),
        correlation_factors: correlation_factors(),
    }
}

pub fn identify_pattern_type(signal: &TrendSignal) -> PatternType {
    if signal.momentum == Momentum::Accelerating && signal.velocity > 70.0 {
        return PatternType::Exponential;
    }
    if signal.momentum == Momentum::Steady {
        return PatternType::Linear;
    }
    if signal.lifecycle_stage == LifecycleStage::Mature {
        return PatternType::Sigmoid;
    }
    if signal.momentum == Momentum::Reversing {
        return PatternType::Chaotic;
    }
    PatternType::Linear
}

/// Consumer-facing segments follow the holiday cycle.
fn seasonality_for(signal: &TrendSignal) -> Option<Seasonality> {
    if !signal.market_segments.iter().any(|s| s == "consumer") {
        return None;
    }
    Some(Seasonality {
        factor: 0.2,
        peak_months: vec![11, 12, 1],
        trough_months: vec![2, 3, 4],
    })
}

fn correlation_factors() -> Vec<CorrelationFactor> {
    [
        ("Economic Growth", 0.7, 2),
        ("Technology Investment", 0.8, 6),
        ("Consumer Confidence", 0.6, 1),
    ]
    .into_iter()
    .map(|(name, strength, lag)| CorrelationFactor {
        factor_name: name.to_string(),
        correlation_strength: strength,
        lag_months: lag,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::signal;
    use approx::assert_relative_eq;

    #[test]
    fn test_pattern_types() {
        let mut s = signal("t1", 80.0, 85.0, 60.0);
        s.momentum = Momentum::Accelerating;
        assert_eq!(identify_pattern_type(&s), PatternType::Exponential);

        s.velocity = 50.0;
        s.lifecycle_stage = LifecycleStage::Mature;
        assert_eq!(identify_pattern_type(&s), PatternType::Sigmoid);

        s.lifecycle_stage = LifecycleStage::Growing;
        assert_eq!(identify_pattern_type(&s), PatternType::Linear);

        s.momentum = Momentum::Reversing;
        assert_eq!(identify_pattern_type(&s), PatternType::Chaotic);

        s.momentum = Momentum::Steady;
        assert_eq!(identify_pattern_type(&s), PatternType::Linear);
    }

    #[test]
    fn test_pattern_strength_and_periodicity() {
        let mut s = signal("t1", 75.0, 40.0, 60.0);
        s.lifecycle_stage = LifecycleStage::Emerging;
        let pattern = analyze_pattern(&s);
        assert_relative_eq!(pattern.pattern_strength, 60.0, epsilon = 1e-12);
        assert_eq!(pattern.periodicity, None);
        assert_eq!(pattern.correlation_factors.len(), 3);

        s.lifecycle_stage = LifecycleStage::Growing;
        assert_eq!(analyze_pattern(&s).periodicity, Some(12));
    }

    #[test]
    fn test_seasonality_only_for_consumer_segment() {
        let mut s = signal("t1", 75.0, 40.0, 60.0);
        assert!(analyze_pattern(&s).seasonality.is_none());

        s.market_segments = vec!["consumer".to_string()];
        let seasonality = analyze_pattern(&s).seasonality.unwrap();
        assert_eq!(seasonality.peak_months, vec![11, 12, 1]);
        assert_eq!(seasonality.trough_months, vec![2, 3, 4]);
    }
}
