use chrono::{DateTime, Utc};
use opportunity_core::{closed_enum, Momentum, SignalType, TrendSignal};
use serde::{Deserialize, Serialize};

use crate::detector::combined_strength;

closed_enum! {
    pub enum AlertType: "alert type" {
        VelocityChange => "velocity_change",
        ThresholdBreach => "threshold_breach",
        DirectionChange => "direction_change",
        PatternMatch => "pattern_match",
    }
}

closed_enum! {
    pub enum AlertSeverity: "alert severity" {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

closed_enum! {
    pub enum Comparison: "comparison" {
        Above => "above",
        Below => "below",
    }
}

closed_enum! {
    pub enum ImpactLevel: "impact level" {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerCondition {
    pub metric: String,
    pub threshold: f64,
    pub actual_value: f64,
    pub comparison: Comparison,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactAssessment {
    pub business_impact: ImpactLevel,
    pub urgency: ImpactLevel,
    pub effort_required: ImpactLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAlert {
    pub id: String,
    pub alert_type: AlertType,
    pub trend_id: String,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub trigger_condition: TriggerCondition,
    pub recommended_actions: Vec<String>,
    pub impact_assessment: ImpactAssessment,
    pub created_at: DateTime<Utc>,
}

/// Rules in the order they are evaluated for each signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlertRule {
    Velocity,
    Opportunity,
    Momentum,
    Breakthrough,
    Confidence,
}

impl AlertRule {
    const ORDER: [AlertRule; 5] = [
        AlertRule::Velocity,
        AlertRule::Opportunity,
        AlertRule::Momentum,
        AlertRule::Breakthrough,
        AlertRule::Confidence,
    ];

    fn slug(&self) -> &'static str {
        match self {
            AlertRule::Velocity => "velocity",
            AlertRule::Opportunity => "opportunity",
            AlertRule::Momentum => "momentum",
            AlertRule::Breakthrough => "breakthrough",
            AlertRule::Confidence => "confidence",
        }
    }

    fn fires(&self, signal: &TrendSignal) -> bool {
        match self {
            AlertRule::Velocity => signal.velocity > 85.0,
            AlertRule::Opportunity => signal.opportunity_score > 80.0,
            AlertRule::Momentum => signal.momentum == Momentum::Reversing,
            AlertRule::Breakthrough => signal.signal_type == SignalType::Breakthrough,
            AlertRule::Confidence => signal.watched && signal.confidence_score < 40.0,
        }
    }

    fn alert_type(&self) -> AlertType {
        match self {
            AlertRule::Velocity => AlertType::VelocityChange,
            AlertRule::Opportunity | AlertRule::Confidence => AlertType::ThresholdBreach,
            AlertRule::Momentum => AlertType::DirectionChange,
            AlertRule::Breakthrough => AlertType::PatternMatch,
        }
    }

    fn severity(&self, signal: &TrendSignal) -> AlertSeverity {
        match self {
            AlertRule::Velocity if signal.velocity > 95.0 => AlertSeverity::Critical,
            AlertRule::Velocity | AlertRule::Opportunity => AlertSeverity::High,
            AlertRule::Momentum => AlertSeverity::Medium,
            AlertRule::Breakthrough => AlertSeverity::Critical,
            AlertRule::Confidence => AlertSeverity::Low,
        }
    }

    fn title(&self, signal: &TrendSignal) -> String {
        let prefix = match self {
            AlertRule::Velocity => "Rapid acceleration detected",
            AlertRule::Opportunity => "High-value opportunity identified",
            AlertRule::Momentum => "Trend reversal detected",
            AlertRule::Breakthrough => "Breakthrough trend identified",
            AlertRule::Confidence => "Confidence decline",
        };
        format!("{}: {}", prefix, signal.trend_name)
    }

    fn description(&self, signal: &TrendSignal) -> String {
        match self {
            AlertRule::Velocity => format!(
                "Trend velocity reached {:.1}% - indicating significant market acceleration",
                signal.velocity
            ),
            AlertRule::Opportunity => format!(
                "Opportunity score of {:.1}% indicates significant business potential",
                signal.opportunity_score
            ),
            AlertRule::Momentum => {
                "Momentum has shifted to reversing - reassess strategic positioning".to_string()
            }
            AlertRule::Breakthrough => {
                "This trend shows characteristics of a potential market breakthrough".to_string()
            }
            AlertRule::Confidence => format!(
                "Watched trend showing declining confidence ({:.1}%)",
                signal.confidence_score
            ),
        }
    }

    fn trigger(&self, signal: &TrendSignal) -> TriggerCondition {
        let (metric, threshold, actual_value, comparison) = match self {
            AlertRule::Velocity => ("velocity", 85.0, signal.velocity, Comparison::Above),
            AlertRule::Opportunity => ("opportunity_score", 80.0, signal.opportunity_score, Comparison::Above),
            AlertRule::Momentum => ("momentum", 0.0, -1.0, Comparison::Below),
            AlertRule::Breakthrough => (
                "signal_strength",
                85.0,
                combined_strength(signal.confidence_score, signal.velocity, signal.opportunity_score),
                Comparison::Above,
            ),
            AlertRule::Confidence => ("confidence_score", 40.0, signal.confidence_score, Comparison::Below),
        };
        TriggerCondition {
            metric: metric.to_string(),
            threshold,
            actual_value,
            comparison,
        }
    }

    fn recommended_actions(&self) -> &'static [&'static str] {
        match self {
            AlertRule::Velocity => &[
                "Accelerate strategic planning initiatives",
                "Increase resource allocation for trend monitoring",
                "Evaluate competitive positioning",
                "Consider early market entry strategies",
            ],
            AlertRule::Opportunity => &[
                "Conduct detailed market opportunity assessment",
                "Develop comprehensive market entry strategy",
                "Allocate R&D resources to trend-related innovations",
                "Engage with potential strategic partners",
            ],
            AlertRule::Momentum => &[
                "Review current investments in this trend",
                "Evaluate exit or pivot strategies",
                "Monitor for potential recovery signals",
                "Assess impact on related initiatives",
            ],
            AlertRule::Breakthrough => &[
                "Immediate executive briefing required",
                "Fast-track strategic planning sessions",
                "Evaluate first-mover advantage opportunities",
                "Prepare competitive response strategies",
            ],
            AlertRule::Confidence => &[
                "Investigate causes of confidence decline",
                "Seek additional data sources",
                "Consider removing from watch list",
                "Monitor for trend invalidation",
            ],
        }
    }

    /// (business impact, urgency, effort required)
    fn impact(&self) -> ImpactAssessment {
        use ImpactLevel::*;
        let (business_impact, urgency, effort_required) = match self {
            AlertRule::Velocity => (High, High, Medium),
            AlertRule::Opportunity => (High, Medium, High),
            AlertRule::Momentum => (Medium, Medium, Low),
            AlertRule::Breakthrough => (High, High, High),
            AlertRule::Confidence => (Low, Low, Low),
        };
        ImpactAssessment {
            business_impact,
            urgency,
            effort_required,
        }
    }

    fn build(&self, signal: &TrendSignal, as_of: DateTime<Utc>) -> TrendAlert {
        TrendAlert {
            id: format!("alert_{}_{}", self.slug(), signal.id),
            alert_type: self.alert_type(),
            trend_id: signal.trend_id.clone(),
            title: self.title(signal),
            description: self.description(signal),
            severity: self.severity(signal),
            trigger_condition: self.trigger(signal),
            recommended_actions: self.recommended_actions().iter().map(|a| a.to_string()).collect(),
            impact_assessment: self.impact(),
            created_at: as_of,
        }
    }
}

/// Scans trend signals for conditions that warrant attention.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertGenerator;

impl AlertGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Alerts for every signal, grouped by signal and ordered by rule within a signal.
    pub fn scan(&self, signals: &[TrendSignal], as_of: DateTime<Utc>) -> Vec<TrendAlert> {
        let alerts: Vec<TrendAlert> = signals
            .iter()
            .flat_map(|signal| {
                AlertRule::ORDER
                    .into_iter()
                    .filter(move |rule| rule.fires(signal))
                    .map(move |rule| rule.build(signal, as_of))
            })
            .collect();

        if !alerts.is_empty() {
            tracing::info!("Generated {} alerts from {} signals", alerts.len(), signals.len());
        }
        alerts
    }
}
