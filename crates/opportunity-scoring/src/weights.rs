use opportunity_core::stats::clamp_score;
use opportunity_core::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

use crate::components::{Component, ComponentScores};

/// Weights for the six scoring components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub market_attractiveness: f64,
    pub competitive_advantage: f64,
    pub strategic_fit: f64,
    pub execution_feasibility: f64,
    pub financial_potential: f64,
    pub risk_assessment: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            market_attractiveness: 0.25,
            competitive_advantage: 0.20,
            strategic_fit: 0.20,
            execution_feasibility: 0.15,
            financial_potential: 0.15,
            risk_assessment: 0.05,
        }
    }
}

impl ScoringWeights {
    /// Tolerance on the sum of all weights
    pub const SUM_TOLERANCE: f64 = 1e-9;

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

    /// Each weight must be in [0, 1] and together they must sum to 1.
    pub fn validate(&self) -> EngineResult<()> {
        for &component in Component::ALL {
            let weight = self.get(component);
            if !(0.0..=1.0).contains(&weight) {
                return Err(EngineError::InvalidConfig(format!(
                    "weight for {} must be between 0 and 1 (got {})",
                    component, weight
                )));
            }
        }

        let sum: f64 = Component::ALL.iter().map(|&c| self.get(c)).sum();
        if (sum - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(EngineError::InvalidConfig(format!(
                "scoring weights must sum to 1.0 (got {:.6})",
                sum
            )));
        }
        Ok(())
    }

    /// Convex combination of the component scores, each clamped first.
    pub fn weighted(&self, scores: &ComponentScores) -> f64 {
        Component::ALL
            .iter()
            .map(|&c| clamp_score(scores.get(c)) * self.get(c))
            .sum()
    }
}
