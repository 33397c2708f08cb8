use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{closed_enum, EngineError, EngineResult};

closed_enum! {
    /// Kind of business initiative being evaluated
    pub enum OpportunityType: "opportunity type" {
        NewMarket => "new_market",
        Expansion => "expansion",
        ProductGap => "product_gap",
        Partnership => "partnership",
        Acquisition => "acquisition",
    }
}

impl OpportunityType {
    /// Base strategic value of the opportunity type (0-100)
    pub fn strategic_base(&self) -> f64 {
        match self {
            OpportunityType::NewMarket => 85.0,
            OpportunityType::Expansion => 80.0,
            OpportunityType::ProductGap => 75.0,
            OpportunityType::Partnership => 65.0,
            OpportunityType::Acquisition => 60.0,
        }
    }

    /// Maturity of the technology the opportunity relies on (0-100)
    pub fn technology_maturity(&self) -> f64 {
        match self {
            OpportunityType::NewMarket => 60.0,
            OpportunityType::ProductGap => 80.0,
            OpportunityType::Expansion
            | OpportunityType::Partnership
            | OpportunityType::Acquisition => 90.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OpportunityType::NewMarket => "new market",
            OpportunityType::Expansion => "expansion",
            OpportunityType::ProductGap => "product gap",
            OpportunityType::Partnership => "partnership",
            OpportunityType::Acquisition => "acquisition",
        }
    }
}

closed_enum! {
    pub enum CompetitionLevel: "competition level" {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl CompetitionLevel {
    /// Inverse competition score used by market attractiveness
    pub fn attractiveness_score(&self) -> f64 {
        match self {
            CompetitionLevel::Low => 100.0,
            CompetitionLevel::Medium => 60.0,
            CompetitionLevel::High => 30.0,
        }
    }
}

closed_enum! {
    pub enum RiskLevel: "risk level" {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl RiskLevel {
    /// Points removed from execution feasibility
    pub fn execution_penalty(&self) -> f64 {
        match self {
            RiskLevel::Low => 0.0,
            RiskLevel::Medium => 10.0,
            RiskLevel::High => 25.0,
        }
    }

    /// Points removed from the risk assessment score
    pub fn risk_penalty(&self) -> f64 {
        match self {
            RiskLevel::Low => 0.0,
            RiskLevel::Medium => 20.0,
            RiskLevel::High => 40.0,
        }
    }
}

/// Investment envelope for an opportunity.
///
/// [`InvestmentRange::new`] enforces `min <= max`. Deserialized ranges are
/// taken as given and checked by [`Opportunity::validate`], so one bad
/// record does not fail a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRange {
    min: f64,
    max: f64,
    /// Optional cost split carried through to reports
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub breakdown: HashMap<String, f64>,
}

impl InvestmentRange {
    pub fn new(min: f64, max: f64) -> EngineResult<Self> {
        let range = Self {
            min,
            max,
            breakdown: HashMap::new(),
        };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(EngineError::InvalidData(format!(
                "investment bounds must be finite (min={}, max={})",
                self.min, self.max
            )));
        }
        if self.min < 0.0 {
            return Err(EngineError::InvalidData(format!(
                "investment minimum must be non-negative (min={})",
                self.min
            )));
        }
        if self.min > self.max {
            return Err(EngineError::InvalidData(format!(
                "investment minimum {} exceeds maximum {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub key_risks: Vec<String>,
    #[serde(default)]
    pub mitigation_strategies: Vec<String>,
}

/// A candidate business initiative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub opportunity_type: OpportunityType,
    /// Addressable market in currency units
    pub market_size: f64,
    /// Expected growth in percent (may exceed 100)
    pub growth_potential: f64,
    pub competition_level: CompetitionLevel,
    #[serde(default)]
    pub barriers_to_entry: Vec<String>,
    #[serde(default)]
    pub required_capabilities: Vec<String>,
    /// Months until the opportunity can be captured
    pub time_to_capture: f64,
    pub investment_required: InvestmentRange,
    pub risk_assessment: RiskProfile,
}

impl Opportunity {
    /// Reject records that break hard invariants.
    ///
    /// Zero denominators (max investment, time to capture) are allowed here;
    /// the scorers neutralise the affected terms instead.
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::InvalidData("opportunity id is empty".to_string()));
        }
        if !self.market_size.is_finite() || self.market_size < 0.0 {
            return Err(EngineError::InvalidData(format!(
                "opportunity {}: market size must be a non-negative number (got {})",
                self.id, self.market_size
            )));
        }
        if !self.growth_potential.is_finite() {
            return Err(EngineError::InvalidData(format!(
                "opportunity {}: growth potential is not a number",
                self.id
            )));
        }
        if !self.time_to_capture.is_finite() {
            return Err(EngineError::InvalidData(format!(
                "opportunity {}: time to capture is not a number",
                self.id
            )));
        }
        self.investment_required
            .validate()
            .map_err(|e| match e {
                EngineError::InvalidData(reason) => {
                    EngineError::InvalidData(format!("opportunity {}: {}", self.id, reason))
                }
                other => other,
            })?;
        Ok(())
    }

    /// Market size divided by the maximum investment, if the ratio is defined
    pub fn size_to_investment_ratio(&self) -> Option<f64> {
        let max = self.investment_required.max();
        if max > 0.0 {
            Some(self.market_size / max)
        } else {
            None
        }
    }
}

/// Optional company context supplied alongside an opportunity.
///
/// A `None` list means "unknown" and skips the matching bonus entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringContext {
    #[serde(default)]
    pub company_strengths: Option<Vec<String>>,
    #[serde(default)]
    pub strategic_priorities: Option<Vec<String>>,
    #[serde(default)]
    pub resource_constraints: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opportunity_json(min: f64, max: f64) -> String {
        format!(
            r#"{{
                "id": "opp-1",
                "opportunity_type": "new_market",
                "market_size": 5000000,
                "growth_potential": 40,
                "competition_level": "low",
                "time_to_capture": 4,
                "investment_required": {{ "min": {}, "max": {} }},
                "risk_assessment": {{ "risk_level": "low" }}
            }}"#,
            min, max
        )
    }

    #[test]
    fn test_investment_range_rejects_inverted_bounds() {
        assert!(InvestmentRange::new(10.0, 5.0).is_err());
        assert!(InvestmentRange::new(-1.0, 5.0).is_err());
        let range = InvestmentRange::new(5.0, 5.0).unwrap();
        assert_eq!(range.min(), 5.0);
        assert_eq!(range.max(), 5.0);
    }

    #[test]
    fn test_deserialize_opportunity() {
        let opp: Opportunity = serde_json::from_str(&opportunity_json(50000.0, 200000.0)).unwrap();
        assert_eq!(opp.opportunity_type, OpportunityType::NewMarket);
        assert_eq!(opp.competition_level, CompetitionLevel::Low);
        assert!(opp.barriers_to_entry.is_empty());
        assert!(opp.validate().is_ok());
    }

    #[test]
    fn test_inverted_investment_fails_validation() {
        let opp: Opportunity = serde_json::from_str(&opportunity_json(300000.0, 200000.0)).unwrap();
        let err = opp.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidData(_)));
        assert!(err.to_string().contains("opportunity opp-1: "));
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_breakdown_round_trips() {
        let json = opportunity_json(1.0, 2.0).replace(
            r#""max": 2 }"#,
            r#""max": 2, "breakdown": { "software": 1.5 } }"#,
        );
        let opp: Opportunity = serde_json::from_str(&json).unwrap();
        assert_eq!(opp.investment_required.breakdown.get("software"), Some(&1.5));
        let value = serde_json::to_value(&opp).unwrap();
        assert_eq!(value["investment_required"]["breakdown"]["software"], 1.5);
    }

    #[test]
    fn test_deserialize_rejects_unknown_type() {
        let json = opportunity_json(1.0, 2.0).replace("new_market", "joint_venture");
        let result: Result<Opportunity, _> = serde_json::from_str(&json);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("new-market".parse::<OpportunityType>().unwrap(), OpportunityType::NewMarket);
        assert_eq!("Product Gap".parse::<OpportunityType>().unwrap(), OpportunityType::ProductGap);
        assert_eq!("HIGH".parse::<CompetitionLevel>().unwrap(), CompetitionLevel::High);

        let err = "extreme".parse::<RiskLevel>().unwrap_err();
        assert_eq!(err, EngineError::unknown("risk level", "extreme"));
        assert!(err.to_string().contains("risk level"));
    }

    #[test]
    fn test_ratio_guards_zero_investment() {
        let mut opp: Opportunity = serde_json::from_str(&opportunity_json(0.0, 0.0)).unwrap();
        assert_eq!(opp.size_to_investment_ratio(), None);
        opp.investment_required = InvestmentRange::new(0.0, 1_000_000.0).unwrap();
        assert_eq!(opp.size_to_investment_ratio(), Some(5.0));
    }

    #[test]
    fn test_validate_rejects_negative_market() {
        let mut opp: Opportunity = serde_json::from_str(&opportunity_json(1.0, 2.0)).unwrap();
        opp.market_size = -10.0;
        assert!(matches!(opp.validate(), Err(EngineError::InvalidData(_))));
    }

    #[test]
    fn test_risk_penalties_are_distinct() {
        let penalties: Vec<f64> = RiskLevel::ALL.iter().map(|r| r.risk_penalty()).collect();
        assert_eq!(penalties, vec![0.0, 20.0, 40.0]);
    }
}
