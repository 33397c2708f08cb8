//! Component Scoring
//!
//! Six independent 0-100 scores per opportunity. Each function starts from a
//! base value, applies additive adjustments and clamps the result. Missing
//! context (`None`) skips the matching adjustment; zero denominators skip the
//! ratio terms that would divide by them.

use opportunity_core::stats::{clamp_score, texts_overlap};
use opportunity_core::{closed_enum, Opportunity, ScoringContext};
use serde::{Deserialize, Serialize};

closed_enum! {
    pub enum Component: "score component" {
        MarketAttractiveness => "market_attractiveness",
        CompetitiveAdvantage => "competitive_advantage",
        StrategicFit => "strategic_fit",
        ExecutionFeasibility => "execution_feasibility",
        FinancialPotential => "financial_potential",
        RiskAssessment => "risk_assessment",
    }
}

impl Component {
    /// Upper-case display name used in key factor sentences
    pub fn headline(&self) -> String {
        self.as_str().replace('_', " ").to_uppercase()
    }
}

/// Market size at which the size term saturates
const MARKET_SIZE_CAP: f64 = 10_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub market_attractiveness: f64,
    pub competitive_advantage: f64,
    pub strategic_fit: f64,
    pub execution_feasibility: f64,
    pub financial_potential: f64,
    pub risk_assessment: f64,
}

impl ComponentScores {
    pub fn uniform(value: f64) -> Self {
        Self {
            market_attractiveness: value,
            competitive_advantage: value,
            strategic_fit: value,
            execution_feasibility: value,
            financial_potential: value,
            risk_assessment: value,
        }
    }

    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::MarketAttractiveness => self.market_attractiveness,
            Component::CompetitiveAdvantage => self.competitive_advantage,
            Component::StrategicFit => self.strategic_fit,
            Component::ExecutionFeasibility => self.execution_feasibility,
            Component::FinancialPotential => self.financial_potential,
            Component::RiskAssessment => self.risk_assessment,
        }
    }

    fn slot(&mut self, component: Component) -> &mut f64 {
        match component {
            Component::MarketAttractiveness => &mut self.market_attractiveness,
            Component::CompetitiveAdvantage => &mut self.competitive_advantage,
            Component::StrategicFit => &mut self.strategic_fit,
            Component::ExecutionFeasibility => &mut self.execution_feasibility,
            Component::FinancialPotential => &mut self.financial_potential,
            Component::RiskAssessment => &mut self.risk_assessment,
        }
    }

    /// Copy with the listed components multiplied by `factor` and re-clamped.
    pub fn scaled(&self, components: &[Component], factor: f64) -> Self {
        let mut scaled = *self;
        for &component in components {
            let slot = scaled.slot(component);
            *slot = clamp_score(*slot * factor);
        }
        scaled
    }

    /// Components in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Component, f64)> + '_ {
        Component::ALL.iter().map(move |&c| (c, self.get(c)))
    }
}

/// Computes the six component scores for one opportunity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentScorer;

impl ComponentScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, opp: &Opportunity, context: &ScoringContext) -> ComponentScores {
        ComponentScores {
            market_attractiveness: market_attractiveness(opp),
            competitive_advantage: competitive_advantage(opp, context.company_strengths.as_deref()),
            strategic_fit: strategic_fit(opp, context.strategic_priorities.as_deref()),
            execution_feasibility: execution_feasibility(opp, context.resource_constraints.as_deref()),
            financial_potential: financial_potential(opp),
            risk_assessment: risk_assessment(opp),
        }
    }
}

pub fn market_attractiveness(opp: &Opportunity) -> f64 {
    let size_score = (opp.market_size / MARKET_SIZE_CAP * 100.0).min(100.0);
    let score = size_score * 0.40
        + opp.growth_potential * 0.35
        + opp.competition_level.attractiveness_score() * 0.25;
    clamp_score(score)
}

pub fn competitive_advantage(opp: &Opportunity, strengths: Option<&[String]>) -> f64 {
    let mut score = 50.0;

    if let Some(strengths) = strengths {
        let alignment: f64 = opp
            .required_capabilities
            .iter()
            .map(|capability| {
                if strengths.iter().any(|s| texts_overlap(s, capability)) {
                    20.0
                } else {
                    -5.0
                }
            })
            .sum();
        score += alignment.clamp(-20.0, 40.0);
    }

    // Barriers make the position defensible
    score += (opp.barriers_to_entry.len() as f64 * 8.0).min(20.0);

    if let Some(efficiency) = opp.size_to_investment_ratio() {
        if efficiency > 10.0 {
            score += 15.0;
        } else if efficiency > 5.0 {
            score += 10.0;
        } else if efficiency < 2.0 {
            score -= 10.0;
        }
    }

    clamp_score(score)
}

pub fn strategic_fit(opp: &Opportunity, priorities: Option<&[String]>) -> f64 {
    let mut score = opp.opportunity_type.strategic_base();

    if let Some(priorities) = priorities {
        let description = opp.description.to_lowercase();
        let aligned = priorities.iter().any(|priority| {
            let priority = priority.to_lowercase();
            description.contains(&priority)
                || opp
                    .required_capabilities
                    .iter()
                    .any(|cap| cap.to_lowercase().contains(&priority))
        });
        if aligned {
            score += 15.0;
        }
    }

    // Quick wins
    if opp.time_to_capture <= 3.0 {
        score += 10.0;
    } else if opp.time_to_capture > 12.0 {
        score -= 10.0;
    }

    clamp_score(score)
}

pub fn execution_feasibility(opp: &Opportunity, constraints: Option<&[String]>) -> f64 {
    let mut score = 70.0;

    let max_investment = opp.investment_required.max();
    if max_investment < 100_000.0 {
        score += 20.0;
    } else if max_investment < 500_000.0 {
        score += 10.0;
    } else if max_investment > 2_000_000.0 {
        score -= 20.0;
    } else if max_investment > 1_000_000.0 {
        score -= 10.0;
    }

    if opp.time_to_capture <= 6.0 {
        score += 15.0;
    } else if opp.time_to_capture <= 12.0 {
        score += 5.0;
    } else if opp.time_to_capture > 18.0 {
        score -= 15.0;
    }

    score -= opp.risk_assessment.risk_level.execution_penalty();

    if let Some(constraints) = constraints {
        score -= (constraints.len() as f64 * 5.0).min(20.0);
    }

    clamp_score(score)
}

pub fn financial_potential(opp: &Opportunity) -> f64 {
    let mut score = 0.0;

    if let Some(roi) = opp.size_to_investment_ratio() {
        if roi > 50.0 {
            score += 40.0;
        } else if roi > 20.0 {
            score += 30.0;
        } else if roi > 10.0 {
            score += 20.0;
        } else if roi > 5.0 {
            score += 10.0;
        }
    }

    score += opp.growth_potential * 0.3;

    // Two-year baseline
    if opp.time_to_capture > 0.0 {
        score += (24.0 / opp.time_to_capture * 15.0).min(30.0);
    }

    clamp_score(score)
}

pub fn risk_assessment(opp: &Opportunity) -> f64 {
    let risk = &opp.risk_assessment;
    let score = 100.0 - risk.risk_level.risk_penalty() - risk.key_risks.len() as f64 * 5.0
        + risk.mitigation_strategies.len() as f64 * 3.0;
    clamp_score(score)
}
