//! Opportunity Scoring
//!
//! Combines the six component scores into an overall score, then derives the
//! rationale, recommendation, comparables, market dynamics and sensitivity
//! analysis that make up an [`OpportunityScore`].

use opportunity_core::stats::round_score;
use opportunity_core::{closed_enum, EngineResult, Opportunity, ScoringContext};
use serde::{Deserialize, Serialize};

use crate::components::{Component, ComponentScorer, ComponentScores};
use crate::dynamics::{MarketDynamics, MarketDynamicsAnalyzer};
use crate::sensitivity::{SensitivityAnalysis, SensitivityAnalyzer};
use crate::similarity::{ComparableOpportunity, SimilarityMatcher};
use crate::weights::ScoringWeights;

closed_enum! {
    pub enum RecommendedAction: "recommended action" {
        PursueImmediately => "pursue_immediately",
        InvestigateFurther => "investigate_further",
        Monitor => "monitor",
        Pass => "pass",
    }
}

closed_enum! {
    pub enum Priority: "priority" {
        Critical => "critical",
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

/// Score bands in descending order: (minimum overall, action, priority, timeline, success probability)
const RECOMMENDATION_BANDS: [(u8, RecommendedAction, Priority, &str, f64); 5] = [
    (80, RecommendedAction::PursueImmediately, Priority::Critical, "Immediate action required within 2 weeks", 85.0),
    (70, RecommendedAction::PursueImmediately, Priority::High, "Begin planning within 1 month", 75.0),
    (60, RecommendedAction::InvestigateFurther, Priority::Medium, "Complete analysis within 2 months", 65.0),
    (40, RecommendedAction::Monitor, Priority::Low, "Quarterly review and assessment", 45.0),
    (0, RecommendedAction::Pass, Priority::Low, "No immediate action required", 25.0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rationale {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub key_factors: Vec<String>,
    pub assumptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: RecommendedAction,
    pub priority: Priority,
    pub timeline: String,
    pub next_steps: Vec<String>,
    pub resource_requirements: Vec<String>,
    pub success_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityScore {
    pub opportunity_id: String,
    /// Rounded weighted score (0-100)
    pub overall_score: u8,
    pub component_scores: ComponentScores,
    pub scoring_rationale: Rationale,
    pub recommendation: Recommendation,
    pub comparable_opportunities: Vec<ComparableOpportunity>,
    pub market_dynamics: MarketDynamics,
    pub sensitivity_analysis: SensitivityAnalysis,
}

/// Produces a full [`OpportunityScore`] for one opportunity at a time.
#[derive(Debug, Clone, Copy)]
pub struct OpportunityScorer {
    weights: ScoringWeights,
}

impl Default for OpportunityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl OpportunityScorer {
    /// Create a scorer with the default weights
    pub fn new() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Create a scorer with custom weights, rejecting invalid ones
    pub fn with_weights(weights: ScoringWeights) -> EngineResult<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score `opp`. `pool` is searched for comparable opportunities.
    pub fn score(
        &self,
        opp: &Opportunity,
        context: &ScoringContext,
        pool: &[Opportunity],
    ) -> EngineResult<OpportunityScore> {
        opp.validate()?;

        let components = ComponentScorer::new().score(opp, context);
        let overall_score = round_score(self.weights.weighted(&components));

        tracing::debug!(
            "Scored {}: overall={} market={:.1} advantage={:.1} fit={:.1}",
            opp.id,
            overall_score,
            components.market_attractiveness,
            components.competitive_advantage,
            components.strategic_fit
        );

        Ok(OpportunityScore {
            opportunity_id: opp.id.clone(),
            overall_score,
            component_scores: components,
            scoring_rationale: build_rationale(opp, &components),
            recommendation: recommend(overall_score, &components, opp),
            comparable_opportunities: SimilarityMatcher::new().find_comparables(opp, pool),
            market_dynamics: MarketDynamicsAnalyzer::new().analyze(opp),
            sensitivity_analysis: SensitivityAnalyzer::new(self.weights).analyze(&components),
        })
    }
}

/// The action band for a rounded overall score.
pub fn action_for(overall_score: u8) -> (RecommendedAction, Priority) {
    let (_, action, priority, _, _) = band_for(overall_score);
    (action, priority)
}

fn band_for(overall_score: u8) -> (u8, RecommendedAction, Priority, &'static str, f64) {
    RECOMMENDATION_BANDS
        .into_iter()
        .find(|(min, ..)| overall_score >= *min)
        .unwrap_or(RECOMMENDATION_BANDS[RECOMMENDATION_BANDS.len() - 1])
}

pub fn build_rationale(opp: &Opportunity, scores: &ComponentScores) -> Rationale {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut key_factors = Vec::new();

    for (component, score) in scores.iter() {
        if score >= 80.0 {
            strengths.push(strength_reason(component, opp));
        } else if score <= 40.0 {
            weaknesses.push(weakness_reason(component, opp));
        }

        if score >= 70.0 || score <= 50.0 {
            let impact = if score >= 70.0 {
                "positively influences"
            } else {
                "negatively impacts"
            };
            key_factors.push(format!(
                "{} {} overall scoring ({:.0}%)",
                component.headline(),
                impact,
                score
            ));
        }
    }

    Rationale {
        strengths,
        weaknesses,
        key_factors,
        assumptions: [
            "Market conditions remain stable",
            "Competitive landscape does not shift dramatically",
            "Required capabilities can be developed or acquired",
            "Investment capital is available as projected",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    }
}

fn strength_reason(component: Component, opp: &Opportunity) -> String {
    match component {
        Component::MarketAttractiveness => format!(
            "Large market size of ${:.1}M with {}% growth potential",
            opp.market_size / 1_000_000.0,
            opp.growth_potential
        ),
        Component::CompetitiveAdvantage => format!(
            "Strong competitive position with {} barriers to entry",
            opp.barriers_to_entry.len()
        ),
        Component::StrategicFit => format!(
            "High strategic alignment with {} opportunity type",
            opp.opportunity_type
        ),
        Component::ExecutionFeasibility => format!(
            "Achievable execution with {} month timeline",
            opp.time_to_capture
        ),
        Component::FinancialPotential => match opp.size_to_investment_ratio() {
            Some(ratio) => format!(
                "Attractive ROI with market size to investment ratio of {:.1}x",
                ratio
            ),
            None => "Attractive ROI with minimal investment required".to_string(),
        },
        Component::RiskAssessment => format!(
            "Well-managed risk profile with {} mitigation strategies",
            opp.risk_assessment.mitigation_strategies.len()
        ),
    }
}

fn weakness_reason(component: Component, opp: &Opportunity) -> String {
    match component {
        Component::MarketAttractiveness => format!(
            "Limited market appeal due to {} competition",
            opp.competition_level
        ),
        Component::CompetitiveAdvantage => {
            "Weak competitive position requiring significant capability development".to_string()
        }
        Component::StrategicFit => {
            "Misalignment with current strategic direction and capabilities".to_string()
        }
        Component::ExecutionFeasibility => format!(
            "Challenging execution due to high investment requirements (${:.0}k)",
            opp.investment_required.max() / 1_000.0
        ),
        Component::FinancialPotential => {
            "Uncertain financial returns given market dynamics".to_string()
        }
        Component::RiskAssessment => format!(
            "High risk exposure with {} significant risk factors",
            opp.risk_assessment.key_risks.len()
        ),
    }
}

pub fn recommend(overall_score: u8, scores: &ComponentScores, opp: &Opportunity) -> Recommendation {
    let (_, action, priority, timeline, success_probability) = band_for(overall_score);

    Recommendation {
        action,
        priority,
        timeline: timeline.to_string(),
        next_steps: next_steps(action, scores),
        resource_requirements: resource_requirements(action, opp),
        success_probability,
    }
}

fn next_steps(action: RecommendedAction, scores: &ComponentScores) -> Vec<String> {
    let mut steps: Vec<&str> = match action {
        RecommendedAction::PursueImmediately => vec![
            "Form cross-functional opportunity team",
            "Develop detailed business case",
            "Secure executive sponsorship",
            "Create implementation roadmap",
        ],
        RecommendedAction::InvestigateFurther => vec![
            "Conduct deeper market research",
            "Validate opportunity assumptions",
            "Perform pilot or proof-of-concept",
        ],
        RecommendedAction::Monitor => vec![
            "Set up monitoring dashboards",
            "Define trigger events for re-evaluation",
            "Maintain market intelligence",
            "Quarterly opportunity review",
        ],
        RecommendedAction::Pass => vec![
            "Document decision rationale",
            "Archive opportunity for future reference",
            "Notify stakeholders of decision",
        ],
    };

    match action {
        RecommendedAction::PursueImmediately => {
            if scores.competitive_advantage < 70.0 {
                steps.push("Conduct competitive analysis and positioning");
            }
            if scores.execution_feasibility < 70.0 {
                steps.push("Assess resource requirements and availability");
            }
        }
        RecommendedAction::InvestigateFurther => {
            if scores.market_attractiveness < 60.0 {
                steps.push("Reassess market size and growth potential");
            }
            if scores.strategic_fit < 60.0 {
                steps.push("Evaluate strategic alignment and fit");
            }
        }
        RecommendedAction::Monitor | RecommendedAction::Pass => {}
    }

    steps.into_iter().map(String::from).collect()
}

fn resource_requirements(action: RecommendedAction, opp: &Opportunity) -> Vec<String> {
    match action {
        RecommendedAction::PursueImmediately => {
            let mut resources = vec![
                "Executive sponsor and steering committee".to_string(),
                "Cross-functional project team (5-8 members)".to_string(),
                format!(
                    "Budget allocation: ${:.0}k - ${:.0}k",
                    opp.investment_required.min() / 1_000.0,
                    opp.investment_required.max() / 1_000.0
                ),
            ];
            resources.extend(
                opp.required_capabilities
                    .iter()
                    .map(|cap| format!("{} expertise and capabilities", cap)),
            );
            resources
        }
        RecommendedAction::InvestigateFurther => vec![
            "Research team (2-3 analysts)".to_string(),
            "Subject matter experts".to_string(),
            "Market research budget ($10k - $50k)".to_string(),
        ],
        RecommendedAction::Monitor => vec![
            "Part-time analyst for monitoring".to_string(),
            "Market intelligence tools and subscriptions".to_string(),
        ],
        RecommendedAction::Pass => Vec::new(),
    }
}
