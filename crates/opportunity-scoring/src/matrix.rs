//! Opportunity Matrix
//!
//! Positions scored opportunities on a 2D grid for portfolio triage. Four
//! matrix flavours pick different axes; every label, action and description
//! comes from an exhaustive lookup over (matrix type, quadrant).

use opportunity_core::{closed_enum, Opportunity};
use serde::{Deserialize, Serialize};

use crate::scorer::OpportunityScore;

/// Axis value at which an entry moves into the upper half
pub const QUADRANT_SPLIT: f64 = 50.0;
const MAX_LISTED: usize = 3;

closed_enum! {
    pub enum MatrixType: "matrix type" {
        AttractivenessFeasibility => "attractiveness_feasibility",
        GrowthShare => "growth_share",
        RiskReturn => "risk_return",
        StrategicPriority => "strategic_priority",
    }
}

impl Default for MatrixType {
    fn default() -> Self {
        MatrixType::AttractivenessFeasibility
    }
}

closed_enum! {
    pub enum Quadrant: "quadrant" {
        HighHigh => "high_high",
        HighLow => "high_low",
        LowHigh => "low_high",
        LowLow => "low_low",
    }
}

impl Quadrant {
    pub fn from_position(x: f64, y: f64) -> Self {
        match (x >= QUADRANT_SPLIT, y >= QUADRANT_SPLIT) {
            (true, true) => Quadrant::HighHigh,
            (true, false) => Quadrant::HighLow,
            (false, true) => Quadrant::LowHigh,
            (false, false) => Quadrant::LowLow,
        }
    }
}

impl MatrixType {
    /// (x, y, bubble size) for one scored opportunity
    pub fn position(&self, opp: &Opportunity, score: &OpportunityScore) -> (f64, f64, f64) {
        let components = &score.component_scores;
        match self {
            MatrixType::AttractivenessFeasibility => (
                components.market_attractiveness,
                components.execution_feasibility,
                opp.market_size / 1_000_000.0,
            ),
            MatrixType::GrowthShare => (
                opp.growth_potential,
                components.competitive_advantage,
                opp.market_size / 1_000_000.0,
            ),
            MatrixType::RiskReturn => (
                100.0 - components.risk_assessment,
                components.financial_potential,
                opp.investment_required.max() / 100_000.0,
            ),
            MatrixType::StrategicPriority => (
                components.strategic_fit,
                score.overall_score as f64,
                opp.time_to_capture,
            ),
        }
    }

    pub fn quadrant_label(&self, quadrant: Quadrant) -> &'static str {
        use MatrixType::*;
        use Quadrant::*;
        match (self, quadrant) {
            (AttractivenessFeasibility, HighHigh) => "Star Opportunities",
            (AttractivenessFeasibility, HighLow) => "Question Marks",
            (AttractivenessFeasibility, LowHigh) => "Cash Cows",
            (AttractivenessFeasibility, LowLow) => "Dogs",
            (GrowthShare, HighHigh) => "Growth Leaders",
            (GrowthShare, HighLow) => "Emerging Markets",
            (GrowthShare, LowHigh) => "Established Players",
            (GrowthShare, LowLow) => "Declining Markets",
            (RiskReturn, HighHigh) => "High Return/High Risk",
            (RiskReturn, HighLow) => "High Return/Low Risk",
            (RiskReturn, LowHigh) => "Low Return/High Risk",
            (RiskReturn, LowLow) => "Low Return/Low Risk",
            (StrategicPriority, HighHigh) => "Strategic Imperatives",
            (StrategicPriority, HighLow) => "Quick Wins",
            (StrategicPriority, LowHigh) => "Long-term Bets",
            (StrategicPriority, LowLow) => "Low Priority",
        }
    }

    pub fn quadrant_action(&self, quadrant: Quadrant) -> &'static str {
        use MatrixType::*;
        use Quadrant::*;
        match (self, quadrant) {
            (AttractivenessFeasibility, HighHigh) => "Invest heavily and pursue aggressively",
            (AttractivenessFeasibility, HighLow) => "Investigate and develop capabilities",
            (AttractivenessFeasibility, LowHigh) => "Harvest and optimize",
            (AttractivenessFeasibility, LowLow) => "Divest or ignore",
            (GrowthShare, HighHigh) => "Build market position",
            (GrowthShare, HighLow) => "Monitor and selectively invest",
            (GrowthShare, LowHigh) => "Defend position",
            (GrowthShare, LowLow) => "Exit or minimize investment",
            (RiskReturn, HighHigh) => "Careful evaluation and risk mitigation",
            (RiskReturn, HighLow) => "Pursue immediately",
            (RiskReturn, LowHigh) => "Avoid or pass",
            (RiskReturn, LowLow) => "Consider for stability",
            (StrategicPriority, HighHigh) => "Executive priority and full resources",
            (StrategicPriority, HighLow) => "Fast-track implementation",
            (StrategicPriority, LowHigh) => "Long-term strategic planning",
            (StrategicPriority, LowLow) => "Defer or delegate",
        }
    }

    pub fn quadrant_description(&self, quadrant: Quadrant) -> &'static str {
        use MatrixType::*;
        use Quadrant::*;
        match (self, quadrant) {
            (AttractivenessFeasibility, HighHigh) => "Highly attractive markets with strong execution capability",
            (AttractivenessFeasibility, HighLow) => "Attractive markets requiring capability development",
            (AttractivenessFeasibility, LowHigh) => "Less attractive but easily executable opportunities",
            (AttractivenessFeasibility, LowLow) => "Unattractive and difficult to execute opportunities",
            (GrowthShare, HighHigh) => "Fast-growing markets with competitive advantage",
            (GrowthShare, HighLow) => "Emerging high-growth opportunities",
            (GrowthShare, LowHigh) => "Mature markets with strong position",
            (GrowthShare, LowLow) => "Declining markets with weak position",
            (RiskReturn, HighHigh) => "High potential returns but significant risk exposure",
            (RiskReturn, HighLow) => "Attractive risk-adjusted returns",
            (RiskReturn, LowHigh) => "High risk with limited upside potential",
            (RiskReturn, LowLow) => "Safe but limited return opportunities",
            (StrategicPriority, HighHigh) => "Critical strategic opportunities with high scores",
            (StrategicPriority, HighLow) => "High-scoring opportunities with moderate strategic fit",
            (StrategicPriority, LowHigh) => "Strategic but lower-scoring opportunities",
            (StrategicPriority, LowLow) => "Limited strategic value and lower scores",
        }
    }

    pub fn axis_labels(&self) -> AxisLabels {
        let (x_axis, y_axis, size_metric) = match self {
            MatrixType::AttractivenessFeasibility => {
                ("Market Attractiveness", "Execution Feasibility", "Market Size ($M)")
            }
            MatrixType::GrowthShare => ("Market Growth Rate (%)", "Competitive Advantage", "Market Size ($M)"),
            MatrixType::RiskReturn => ("Risk Level", "Financial Potential", "Investment Required ($K)"),
            MatrixType::StrategicPriority => ("Strategic Fit", "Overall Score", "Time to Capture (Months)"),
        };
        AxisLabels {
            x_axis: x_axis.to_string(),
            y_axis: y_axis.to_string(),
            size_metric: size_metric.to_string(),
        }
    }

    pub fn quadrant_descriptions(&self) -> QuadrantDescriptions {
        QuadrantDescriptions {
            high_high: self.quadrant_description(Quadrant::HighHigh).to_string(),
            high_low: self.quadrant_description(Quadrant::HighLow).to_string(),
            low_high: self.quadrant_description(Quadrant::LowHigh).to_string(),
            low_low: self.quadrant_description(Quadrant::LowLow).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixEntry {
    pub opportunity_id: String,
    pub x_axis_value: f64,
    pub y_axis_value: f64,
    pub bubble_size: f64,
    pub quadrant: Quadrant,
    pub quadrant_label: String,
    pub recommended_action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLabels {
    pub x_axis: String,
    pub y_axis: String,
    pub size_metric: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadrantDescriptions {
    pub high_high: String,
    pub high_low: String,
    pub low_high: String,
    pub low_low: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixInsights {
    pub top_quadrant_count: usize,
    pub emerging_opportunities: Vec<String>,
    pub declining_opportunities: Vec<String>,
    pub strategic_recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityMatrix {
    pub matrix_type: MatrixType,
    pub opportunities: Vec<MatrixEntry>,
    pub axis_labels: AxisLabels,
    pub quadrant_descriptions: QuadrantDescriptions,
    pub insights: MatrixInsights,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixGenerator {
    matrix_type: MatrixType,
}

impl MatrixGenerator {
    pub fn new(matrix_type: MatrixType) -> Self {
        Self { matrix_type }
    }

    /// Place every scored opportunity, preserving input order.
    pub fn generate(&self, scored: &[(&Opportunity, &OpportunityScore)]) -> OpportunityMatrix {
        let entries: Vec<MatrixEntry> = scored
            .iter()
            .map(|(opp, score)| self.entry(opp, score))
            .collect();

        tracing::info!(
            "Built {} matrix with {} opportunities",
            self.matrix_type,
            entries.len()
        );

        OpportunityMatrix {
            matrix_type: self.matrix_type,
            insights: insights(&entries),
            opportunities: entries,
            axis_labels: self.matrix_type.axis_labels(),
            quadrant_descriptions: self.matrix_type.quadrant_descriptions(),
        }
    }

    fn entry(&self, opp: &Opportunity, score: &OpportunityScore) -> MatrixEntry {
        let (x, y, size) = self.matrix_type.position(opp, score);
        let quadrant = Quadrant::from_position(x, y);
        MatrixEntry {
            opportunity_id: opp.id.clone(),
            x_axis_value: x,
            y_axis_value: y,
            bubble_size: size,
            quadrant,
            quadrant_label: self.matrix_type.quadrant_label(quadrant).to_string(),
            recommended_action: self.matrix_type.quadrant_action(quadrant).to_string(),
        }
    }
}

fn ids_in(entries: &[MatrixEntry], quadrant: Quadrant) -> Vec<String> {
    entries
        .iter()
        .filter(|e| e.quadrant == quadrant)
        .take(MAX_LISTED)
        .map(|e| e.opportunity_id.clone())
        .collect()
}

fn insights(entries: &[MatrixEntry]) -> MatrixInsights {
    let top_quadrant_count = entries.iter().filter(|e| e.quadrant == Quadrant::HighHigh).count();
    let emerging = ids_in(entries, Quadrant::HighLow);
    let declining = ids_in(entries, Quadrant::LowLow);

    let strategic_recommendations = vec![
        if top_quadrant_count > 0 {
            format!("Focus resources on {} top-quadrant opportunities", top_quadrant_count)
        } else {
            "No clear winners identified - investigate emerging opportunities".to_string()
        },
        if emerging.is_empty() {
            "Limited pipeline of emerging opportunities".to_string()
        } else {
            "Develop capabilities for emerging opportunities".to_string()
        },
        if declining.is_empty() {
            "Strong opportunity portfolio overall".to_string()
        } else {
            "Consider divesting from declining opportunities".to_string()
        },
    ];

    MatrixInsights {
        top_quadrant_count,
        emerging_opportunities: emerging,
        declining_opportunities: declining,
        strategic_recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::OpportunityScorer;
    use crate::test_support::{opportunity_with, reference_opportunity};
    use opportunity_core::{CompetitionLevel, ScoringContext};

    fn scored(opps: &[Opportunity]) -> Vec<OpportunityScore> {
        let scorer = OpportunityScorer::new();
        opps.iter()
            .map(|o| scorer.score(o, &ScoringContext::default(), opps).unwrap())
            .collect()
    }

    #[test]
    fn test_quadrant_consistency() {
        let quadrant = Quadrant::from_position(70.0, 80.0);
        assert_eq!(quadrant, Quadrant::HighHigh);
        assert_eq!(
            MatrixType::AttractivenessFeasibility.quadrant_label(quadrant),
            "Star Opportunities"
        );
        assert_eq!(Quadrant::from_position(50.0, 49.9), Quadrant::HighLow);
        assert_eq!(Quadrant::from_position(49.9, 50.0), Quadrant::LowHigh);
        assert_eq!(Quadrant::from_position(0.0, 0.0), Quadrant::LowLow);
    }

    #[test]
    fn test_every_cell_has_text() {
        for &matrix_type in MatrixType::ALL {
            for &quadrant in Quadrant::ALL {
                assert!(!matrix_type.quadrant_label(quadrant).is_empty());
                assert!(!matrix_type.quadrant_action(quadrant).is_empty());
                assert!(!matrix_type.quadrant_description(quadrant).is_empty());
            }
        }
    }

    #[test]
    fn test_attractiveness_feasibility_matrix() {
        let star = reference_opportunity();
        let mut weak = opportunity_with("weak", 100_000.0, 5_000_000.0, 30.0);
        weak.growth_potential = 5.0;
        weak.competition_level = CompetitionLevel::High;
        let opps = vec![star, weak];
        let scores = scored(&opps);
        let pairs: Vec<(&Opportunity, &OpportunityScore)> = opps.iter().zip(scores.iter()).collect();

        let matrix = MatrixGenerator::new(MatrixType::AttractivenessFeasibility).generate(&pairs);

        assert_eq!(matrix.opportunities.len(), 2);
        assert_eq!(matrix.opportunities[0].quadrant, Quadrant::HighHigh);
        assert_eq!(matrix.opportunities[0].bubble_size, 5.0);
        assert_eq!(matrix.opportunities[1].quadrant, Quadrant::LowLow);
        assert_eq!(matrix.opportunities[1].recommended_action, "Divest or ignore");
        assert_eq!(matrix.insights.top_quadrant_count, 1);
        assert_eq!(matrix.insights.declining_opportunities, vec!["weak".to_string()]);
        assert_eq!(
            matrix.insights.strategic_recommendations,
            vec![
                "Focus resources on 1 top-quadrant opportunities".to_string(),
                "Limited pipeline of emerging opportunities".to_string(),
                "Consider divesting from declining opportunities".to_string(),
            ]
        );
        assert_eq!(matrix.axis_labels.size_metric, "Market Size ($M)");
    }

    #[test]
    fn test_risk_return_axes() {
        let opps = vec![reference_opportunity()];
        let scores = scored(&opps);
        let pairs: Vec<(&Opportunity, &OpportunityScore)> = opps.iter().zip(scores.iter()).collect();
        let matrix = MatrixGenerator::new(MatrixType::RiskReturn).generate(&pairs);

        let entry = &matrix.opportunities[0];
        assert_eq!(entry.x_axis_value, 0.0);
        assert_eq!(entry.y_axis_value, 72.0);
        assert_eq!(entry.bubble_size, 2.0);
        assert_eq!(entry.quadrant, Quadrant::LowHigh);
        assert_eq!(entry.quadrant_label, "Low Return/High Risk");
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = MatrixGenerator::default().generate(&[]);
        assert_eq!(matrix.matrix_type, MatrixType::AttractivenessFeasibility);
        assert!(matrix.opportunities.is_empty());
        assert_eq!(matrix.insights.top_quadrant_count, 0);
        assert_eq!(
            matrix.insights.strategic_recommendations[0],
            "No clear winners identified - investigate emerging opportunities"
        );
    }
}
