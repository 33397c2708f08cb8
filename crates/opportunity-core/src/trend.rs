use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{closed_enum, EngineError, EngineResult};

closed_enum! {
    pub enum TrendCategory: "trend category" {
        Technology => "technology",
        Consumer => "consumer",
        Regulatory => "regulatory",
        Economic => "economic",
        Demographic => "demographic",
    }
}

impl TrendCategory {
    /// How fast trends in this category tend to move
    pub fn velocity_factor(&self) -> f64 {
        match self {
            TrendCategory::Technology => 1.2,
            TrendCategory::Consumer => 1.0,
            TrendCategory::Regulatory => 0.8,
            TrendCategory::Economic => 0.9,
            TrendCategory::Demographic => 0.7,
        }
    }

    /// How broadly trends in this category move the market
    pub fn impact_factor(&self) -> f64 {
        match self {
            TrendCategory::Technology => 1.3,
            TrendCategory::Economic => 1.2,
            TrendCategory::Regulatory => 1.1,
            TrendCategory::Consumer => 1.0,
            TrendCategory::Demographic => 0.9,
        }
    }
}

closed_enum! {
    /// Momentum reported by the upstream trend source
    pub enum SourceMomentum: "source momentum" {
        Accelerating => "accelerating",
        Steady => "steady",
        Decelerating => "decelerating",
    }
}

impl SourceMomentum {
    pub fn velocity_factor(&self) -> f64 {
        match self {
            SourceMomentum::Accelerating => 1.5,
            SourceMomentum::Steady => 1.0,
            SourceMomentum::Decelerating => 0.7,
        }
    }
}

impl From<SourceMomentum> for Momentum {
    fn from(source: SourceMomentum) -> Self {
        match source {
            SourceMomentum::Accelerating => Momentum::Accelerating,
            SourceMomentum::Steady => Momentum::Steady,
            SourceMomentum::Decelerating => Momentum::Decelerating,
        }
    }
}

closed_enum! {
    pub enum TimeHorizon: "time horizon" {
        ShortTerm => "short_term",
        MediumTerm => "medium_term",
        LongTerm => "long_term",
    }
}

impl TimeHorizon {
    pub fn velocity_factor(&self) -> f64 {
        match self {
            TimeHorizon::ShortTerm => 1.3,
            TimeHorizon::MediumTerm => 1.0,
            TimeHorizon::LongTerm => 0.8,
        }
    }

    pub fn impact_factor(&self) -> f64 {
        match self {
            TimeHorizon::ShortTerm => 1.2,
            TimeHorizon::MediumTerm => 1.0,
            TimeHorizon::LongTerm => 0.8,
        }
    }

    /// Scaling applied to the time-to-peak estimate
    pub fn peak_factor(&self) -> f64 {
        match self {
            TimeHorizon::ShortTerm => 0.5,
            TimeHorizon::MediumTerm => 1.0,
            TimeHorizon::LongTerm => 2.0,
        }
    }
}

closed_enum! {
    /// Signal-level momentum, which adds a reversing state to the source momentum
    pub enum Momentum: "momentum" {
        Accelerating => "accelerating",
        Steady => "steady",
        Decelerating => "decelerating",
        Reversing => "reversing",
    }
}

impl Momentum {
    /// Multiplier applied to the growth rate when projecting predictions
    pub fn projection_factor(&self) -> f64 {
        match self {
            Momentum::Accelerating => 1.3,
            Momentum::Steady => 1.0,
            Momentum::Decelerating => 0.7,
            Momentum::Reversing => 0.4,
        }
    }

    /// Per-month compounding rate used by the trajectory forecast
    pub fn monthly_rate(&self) -> f64 {
        match self {
            Momentum::Accelerating => 1.02,
            Momentum::Steady => 1.0,
            Momentum::Decelerating => 0.98,
            Momentum::Reversing => 0.95,
        }
    }

    /// Starting estimate for months until the trend peaks
    pub fn peak_base_months(&self) -> f64 {
        match self {
            Momentum::Accelerating => 6.0,
            Momentum::Steady => 12.0,
            Momentum::Decelerating => 18.0,
            Momentum::Reversing => 3.0,
        }
    }
}

closed_enum! {
    pub enum LifecycleStage: "lifecycle stage" {
        Emerging => "emerging",
        Growing => "growing",
        Mature => "mature",
        Declining => "declining",
    }
}

closed_enum! {
    pub enum SignalType: "signal type" {
        Weak => "weak",
        Moderate => "moderate",
        Strong => "strong",
        Breakthrough => "breakthrough",
    }
}

closed_enum! {
    pub enum GeographicScope: "geographic scope" {
        Local => "local",
        Regional => "regional",
        National => "national",
        Global => "global",
    }
}

impl GeographicScope {
    pub fn for_category(category: TrendCategory) -> Self {
        match category {
            TrendCategory::Technology | TrendCategory::Economic => GeographicScope::Global,
            TrendCategory::Regulatory => GeographicScope::National,
            TrendCategory::Consumer | TrendCategory::Demographic => GeographicScope::Regional,
        }
    }
}

/// A dated measurement backing a trend observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendDataPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportingData {
    #[serde(default)]
    pub data_points: Vec<TrendDataPoint>,
    #[serde(default)]
    pub key_drivers: Vec<String>,
    #[serde(default)]
    pub barriers: Vec<String>,
}

/// An opportunity the trend source attached to an observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendOpportunity {
    #[serde(default)]
    pub description: String,
    pub potential_value: f64,
    /// Months until the opportunity can reach the market
    pub time_to_market: f64,
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// Raw market trend observation as supplied by the upstream store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendObservation {
    pub id: String,
    pub trend_name: String,
    pub category: TrendCategory,
    #[serde(default)]
    pub description: String,
    /// Growth rate in percent, negative when shrinking
    pub growth_rate: f64,
    pub momentum: SourceMomentum,
    pub time_horizon: TimeHorizon,
    /// Source confidence (0-100)
    pub confidence_score: f64,
    #[serde(default)]
    pub supporting_data: SupportingData,
    #[serde(default)]
    pub opportunities: Vec<TrendOpportunity>,
    #[serde(default)]
    pub market_segments: Vec<String>,
}

impl TrendObservation {
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::InvalidData("trend id is empty".to_string()));
        }
        if !self.growth_rate.is_finite() || !self.confidence_score.is_finite() {
            return Err(EngineError::InvalidData(format!(
                "trend {}: growth rate and confidence must be numbers",
                self.id
            )));
        }
        if self.opportunities.iter().any(|o| !o.potential_value.is_finite()) {
            return Err(EngineError::InvalidData(format!(
                "trend {}: opportunity potential value is not a number",
                self.id
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predictions {
    pub short_term: String,
    pub medium_term: String,
    pub long_term: String,
}

/// Derived, enriched view of a trend observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSignal {
    pub id: String,
    pub trend_id: String,
    pub signal_type: SignalType,
    pub trend_name: String,
    pub description: String,
    pub category: TrendCategory,
    pub time_horizon: TimeHorizon,
    /// Inherited from the source observation, clamped to 0-100
    pub confidence_score: f64,
    /// Derived rate-of-change (0-100)
    pub velocity: f64,
    pub momentum: Momentum,
    pub market_impact: f64,
    /// Months until the trend peaks (1-36)
    pub time_to_peak: u32,
    pub lifecycle_stage: LifecycleStage,
    pub related_trends: Vec<String>,
    pub key_drivers: Vec<String>,
    pub risk_factors: Vec<String>,
    pub opportunity_score: f64,
    pub first_detected: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub data_sources: Vec<String>,
    pub geographic_scope: GeographicScope,
    pub market_segments: Vec<String>,
    pub watched: bool,
    pub predictions: Predictions,
    #[serde(default)]
    pub history: Vec<TrendDataPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_observation_defaults() {
        let json = r#"{
            "id": "t1",
            "trend_name": "Remote diagnostics",
            "category": "technology",
            "growth_rate": 25,
            "momentum": "accelerating",
            "time_horizon": "short_term",
            "confidence_score": 85
        }"#;
        let obs: TrendObservation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.category, TrendCategory::Technology);
        assert_eq!(obs.momentum, SourceMomentum::Accelerating);
        assert!(obs.market_segments.is_empty());
        assert!(obs.validate().is_ok());
    }

    #[test]
    fn test_source_momentum_cannot_be_reversing() {
        let json = r#"{
            "id": "t1",
            "trend_name": "x",
            "category": "consumer",
            "growth_rate": -25,
            "momentum": "reversing",
            "time_horizon": "short_term",
            "confidence_score": 85
        }"#;
        assert!(serde_json::from_str::<TrendObservation>(json).is_err());
        assert!("reversing".parse::<SourceMomentum>().is_err());
        assert_eq!("reversing".parse::<Momentum>().unwrap(), Momentum::Reversing);
    }

    #[test]
    fn test_lookup_tables() {
        assert_eq!(TrendCategory::Technology.velocity_factor(), 1.2);
        assert_eq!(TrendCategory::Demographic.impact_factor(), 0.9);
        assert_eq!(TimeHorizon::LongTerm.peak_factor(), 2.0);
        assert_eq!(Momentum::from(SourceMomentum::Steady), Momentum::Steady);
        assert_eq!(GeographicScope::for_category(TrendCategory::Regulatory), GeographicScope::National);
    }
}
