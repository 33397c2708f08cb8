use opportunity_core::{closed_enum, CompetitionLevel, Opportunity};
use serde::{Deserialize, Serialize};

closed_enum! {
    pub enum GrowthTrajectory: "growth trajectory" {
        Accelerating => "accelerating",
        Steady => "steady",
        Decelerating => "decelerating",
        Mature => "mature",
    }
}

closed_enum! {
    pub enum CompetitiveIntensity: "competitive intensity" {
        Low => "low",
        Medium => "medium",
        High => "high",
        Intense => "intense",
    }
}

closed_enum! {
    pub enum BarrierLevel: "barrier level" {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDynamics {
    pub growth_trajectory: GrowthTrajectory,
    pub competitive_intensity: CompetitiveIntensity,
    pub barriers_to_entry: BarrierLevel,
    /// 0-100
    pub customer_readiness: f64,
    /// 0-100
    pub technology_maturity: f64,
}

/// Qualitative market read-out derived from an opportunity's own attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketDynamicsAnalyzer;

impl MarketDynamicsAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, opp: &Opportunity) -> MarketDynamics {
        let growth = opp.growth_potential;
        let growth_trajectory = if growth > 30.0 {
            GrowthTrajectory::Accelerating
        } else if growth > 15.0 {
            GrowthTrajectory::Steady
        } else if growth > 5.0 {
            GrowthTrajectory::Decelerating
        } else {
            GrowthTrajectory::Mature
        };

        let competitive_intensity = match opp.competition_level {
            CompetitionLevel::High => CompetitiveIntensity::Intense,
            CompetitionLevel::Medium => CompetitiveIntensity::High,
            CompetitionLevel::Low => CompetitiveIntensity::Medium,
        };

        let barriers_to_entry = match opp.barriers_to_entry.len() {
            n if n > 3 => BarrierLevel::High,
            n if n > 1 => BarrierLevel::Medium,
            _ => BarrierLevel::Low,
        };

        let readiness_bonus = if opp.time_to_capture <= 6.0 { 20.0 } else { 0.0 };

        MarketDynamics {
            growth_trajectory,
            competitive_intensity,
            barriers_to_entry,
            customer_readiness: (growth + readiness_bonus).min(100.0),
            technology_maturity: opp.opportunity_type.technology_maturity(),
        }
    }
}
