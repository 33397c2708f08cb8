use opportunity_core::stats::round_score;
use serde::{Deserialize, Serialize};

use crate::components::{Component, ComponentScores};
use crate::weights::ScoringWeights;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyVariable {
    pub variable: String,
    pub impact_on_score: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityAnalysis {
    pub optimistic_score: u8,
    pub pessimistic_score: u8,
    pub key_variables: Vec<KeyVariable>,
}

/// Re-weights scaled copies of the component scores to bracket the overall score.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensitivityAnalyzer {
    weights: ScoringWeights,
}

impl SensitivityAnalyzer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn analyze(&self, scores: &ComponentScores) -> SensitivityAnalysis {
        let optimistic = scores.scaled(
            &[Component::MarketAttractiveness, Component::FinancialPotential],
            1.2,
        );
        let pessimistic = scores.scaled(
            &[
                Component::MarketAttractiveness,
                Component::ExecutionFeasibility,
                Component::RiskAssessment,
            ],
            0.8,
        );

        SensitivityAnalysis {
            optimistic_score: round_score(self.weights.weighted(&optimistic)),
            pessimistic_score: round_score(self.weights.weighted(&pessimistic)),
            key_variables: key_variables(),
        }
    }
}

fn key_variables() -> Vec<KeyVariable> {
    [
        ("Market Size", 15.0, 75.0),
        ("Competition Level", 12.0, 80.0),
        ("Investment Requirements", 10.0, 90.0),
        ("Time to Capture", 8.0, 70.0),
    ]
    .into_iter()
    .map(|(variable, impact_on_score, confidence)| KeyVariable {
        variable: variable.to_string(),
        impact_on_score,
        confidence,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_scores() -> ComponentScores {
        ComponentScores {
            market_attractiveness: 59.0,
            competitive_advantage: 81.0,
            strategic_fit: 85.0,
            execution_feasibility: 95.0,
            financial_potential: 72.0,
            risk_assessment: 100.0,
        }
    }

    #[test]
    fn test_brackets_reference_score() {
        let analysis = SensitivityAnalyzer::default().analyze(&reference_scores());
        // 78 + 0.25*11.8 + 0.15*14.4 = 83.11
        assert_eq!(analysis.optimistic_score, 83);
        // 78 - 0.25*11.8 - 0.15*19 - 0.05*20 = 71.2
        assert_eq!(analysis.pessimistic_score, 71);
        assert!(analysis.pessimistic_score <= 78 && 78 <= analysis.optimistic_score);
    }

    #[test]
    fn test_optimistic_clamped_per_component() {
        let analysis = SensitivityAnalyzer::default().analyze(&ComponentScores::uniform(100.0));
        assert_eq!(analysis.optimistic_score, 100);
        assert_eq!(analysis.pessimistic_score, 91);
    }

    #[test]
    fn test_key_variables_fixed() {
        let analysis = SensitivityAnalyzer::default().analyze(&reference_scores());
        let names: Vec<&str> = analysis.key_variables.iter().map(|k| k.variable.as_str()).collect();
        assert_eq!(
            names,
            vec!["Market Size", "Competition Level", "Investment Requirements", "Time to Capture"]
        );
        assert_eq!(analysis.key_variables[2].confidence, 90.0);
    }
}
