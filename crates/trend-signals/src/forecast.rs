//! Trajectory Forecasting
//!
//! Deterministic extrapolation of a signal's opportunity score over a
//! monthly horizon, with an uncertainty band that widens as confidence drops.
//! Optional multiplicative noise is driven by a seeded `StdRng` so repeated
//! runs with the same seed produce identical forecasts.

use chrono::{DateTime, Months, Utc};
use opportunity_core::stats::clamp_score;
use opportunity_core::{
    closed_enum, EngineError, EngineResult, LifecycleStage, Momentum, SignalType, TrendSignal,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

closed_enum! {
    pub enum ForecastHorizon: "forecast horizon" {
        Short => "short",
        Medium => "medium",
        Long => "long",
    }
}

impl ForecastHorizon {
    pub fn months(&self) -> u32 {
        match self {
            ForecastHorizon::Short => 6,
            ForecastHorizon::Medium => 18,
            ForecastHorizon::Long => 36,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastConfig {
    /// Seed for trajectory noise. `None` disables noise entirely.
    pub noise_seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub month: u32,
    pub date: DateTime<Utc>,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    pub optimistic: f64,
    pub realistic: f64,
    pub pessimistic: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendForecast {
    pub trend_id: String,
    pub forecast_horizon: ForecastHorizon,
    pub predicted_trajectory: Vec<TrajectoryPoint>,
    pub scenario_analysis: ScenarioAnalysis,
    pub key_assumptions: Vec<String>,
    pub risk_factors: Vec<String>,
    pub model_accuracy: f64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct TrajectoryForecaster {
    config: ForecastConfig,
}

impl TrajectoryForecaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn forecast(
        &self,
        signal: &TrendSignal,
        horizon: ForecastHorizon,
        as_of: DateTime<Utc>,
    ) -> EngineResult<TrendForecast> {
        let trajectory = self.trajectory(signal, horizon.months(), as_of)?;
        let last = trajectory.last().map(|p| p.value).ok_or_else(|| {
            EngineError::InsufficientData(format!("empty trajectory for {}", signal.trend_id))
        })?;

        tracing::debug!(
            "Forecast {} over {} months: final value {:.1}",
            signal.trend_id,
            horizon.months(),
            last
        );

        Ok(TrendForecast {
            trend_id: signal.trend_id.clone(),
            forecast_horizon: horizon,
            predicted_trajectory: trajectory,
            scenario_analysis: ScenarioAnalysis {
                optimistic: (last * 1.25).min(100.0),
                realistic: last,
                pessimistic: last * 0.75,
            },
            key_assumptions: key_assumptions(signal),
            risk_factors: signal.risk_factors.clone(),
            model_accuracy: signal.confidence_score,
            generated_at: as_of,
        })
    }

    /// Points for months `0..=months`, each clamped to 0-100.
    pub fn trajectory(
        &self,
        signal: &TrendSignal,
        months: u32,
        as_of: DateTime<Utc>,
    ) -> EngineResult<Vec<TrajectoryPoint>> {
        if months == 0 {
            return Err(EngineError::InvalidConfig("forecast horizon must be at least one month".to_string()));
        }

        let mut rng = self
            .config
            .noise_seed
            .map(|seed| StdRng::seed_from_u64(seed ^ trend_seed(&signal.trend_id)));

        let uncertainty = (100.0 - clamp_score(signal.confidence_score)) / 100.0;
        let mut points = Vec::with_capacity(months as usize + 1);

        for i in 0..=months {
            let date = as_of.checked_add_months(Months::new(i)).ok_or_else(|| {
                EngineError::InvalidData(format!("forecast date out of range at month {}", i))
            })?;

            let step = i as f64;
            let mut value = signal.opportunity_score * momentum_effect(signal.momentum, step);
            value *= 1.0 + (signal.velocity / 100.0) * (step / months as f64) * 0.5;

            if let Some(rng) = rng.as_mut() {
                let u: f64 = rng.gen();
                value *= 1.0 + (u - 0.5) * 0.1;
            }

            match signal.lifecycle_stage {
                LifecycleStage::Emerging if step > months as f64 * 0.6 => value *= 1.2,
                LifecycleStage::Declining => value *= 0.97_f64.powf(step),
                _ => {}
            }

            let value = clamp_score(value);
            let half_width = value * uncertainty * 0.4;
            points.push(TrajectoryPoint {
                month: i,
                date,
                value,
                lower: clamp_score(value - half_width),
                upper: clamp_score(value + half_width),
            });
        }

        Ok(points)
    }
}

fn momentum_effect(momentum: Momentum, step: f64) -> f64 {
    momentum.monthly_rate().powf(step)
}

/// Per-trend offset so signals sharing a seed still get distinct noise.
fn trend_seed(trend_id: &str) -> u64 {
    let digest = Sha256::digest(trend_id.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

pub fn key_assumptions(signal: &TrendSignal) -> Vec<String> {
    let mut assumptions = vec![
        "Current market conditions remain stable",
        "No major regulatory disruptions occur",
        "Technology adoption rates continue as projected",
    ];

    if signal.signal_type == SignalType::Breakthrough {
        assumptions.push("Innovation momentum is sustained");
        assumptions.push("Market acceptance exceeds expectations");
    }
    if signal.lifecycle_stage == LifecycleStage::Emerging {
        assumptions.push("Early adopter enthusiasm translates to mainstream adoption");
    }
    if signal.momentum == Momentum::Accelerating {
        assumptions.push("Growth drivers remain strong");
        assumptions.push("Competitive response does not significantly slow adoption");
    }

    assumptions.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{as_of, signal};
    use approx::assert_relative_eq;

    #[test]
    fn test_forecast_length_and_bounds() {
        let mut s = signal("t1", 60.0, 95.0, 90.0);
        s.momentum = Momentum::Accelerating;
        s.lifecycle_stage = LifecycleStage::Emerging;

        for &horizon in ForecastHorizon::ALL {
            let forecast = TrajectoryForecaster::new().forecast(&s, horizon, as_of()).unwrap();
            assert_eq!(forecast.predicted_trajectory.len(), horizon.months() as usize + 1);
            for point in &forecast.predicted_trajectory {
                assert!((0.0..=100.0).contains(&point.value));
                assert!(point.lower <= point.value && point.value <= point.upper);
                assert!(point.lower >= 0.0 && point.upper <= 100.0);
            }
            assert!(forecast.scenario_analysis.optimistic <= 100.0);
        }
    }

    #[test]
    fn test_steady_trajectory_without_noise() {
        let s = signal("t1", 80.0, 40.0, 50.0);
        let points = TrajectoryForecaster::new().trajectory(&s, 6, as_of()).unwrap();

        assert_relative_eq!(points[0].value, 50.0, epsilon = 1e-9);
        // 50 * (1 + 0.4 * 1 * 0.5)
        assert_relative_eq!(points[6].value, 60.0, epsilon = 1e-9);
        // half width 60 * 0.2 * 0.4
        assert_relative_eq!(points[6].lower, 55.2, epsilon = 1e-9);
        assert_relative_eq!(points[6].upper, 64.8, epsilon = 1e-9);
        assert_eq!(points[6].date, as_of().checked_add_months(Months::new(6)).unwrap());
    }

    #[test]
    fn test_declining_trajectory_decays() {
        let mut s = signal("t1", 80.0, 10.0, 50.0);
        s.momentum = Momentum::Reversing;
        s.lifecycle_stage = LifecycleStage::Declining;
        let points = TrajectoryForecaster::new().trajectory(&s, 18, as_of()).unwrap();
        assert!(points.windows(2).all(|w| w[1].value <= w[0].value));
    }

    #[test]
    fn test_scenarios() {
        let s = signal("t1", 80.0, 40.0, 50.0);
        let forecast = TrajectoryForecaster::new()
            .forecast(&s, ForecastHorizon::Short, as_of())
            .unwrap();
        assert_relative_eq!(forecast.scenario_analysis.realistic, 60.0, epsilon = 1e-9);
        assert_relative_eq!(forecast.scenario_analysis.optimistic, 75.0, epsilon = 1e-9);
        assert_relative_eq!(forecast.scenario_analysis.pessimistic, 45.0, epsilon = 1e-9);
        assert_eq!(forecast.model_accuracy, 80.0);
        assert_eq!(forecast.generated_at, as_of());
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let s = signal("t1", 70.0, 50.0, 55.0);
        let seeded = TrajectoryForecaster::with_config(ForecastConfig { noise_seed: Some(42) });

        let a = seeded.forecast(&s, ForecastHorizon::Medium, as_of()).unwrap();
        let b = seeded.forecast(&s, ForecastHorizon::Medium, as_of()).unwrap();
        assert_eq!(a, b);

        let plain = TrajectoryForecaster::new()
            .forecast(&s, ForecastHorizon::Medium, as_of())
            .unwrap();
        assert_ne!(a.predicted_trajectory, plain.predicted_trajectory);
        for (noisy, clean) in a.predicted_trajectory.iter().zip(&plain.predicted_trajectory) {
            assert!((noisy.value - clean.value).abs() <= clean.value * 0.05 + 1e-9);
        }
    }

    #[test]
    fn test_key_assumptions() {
        let mut s = signal("t1", 90.0, 90.0, 90.0);
        assert_eq!(key_assumptions(&s).len(), 3);

        s.signal_type = SignalType::Breakthrough;
        s.lifecycle_stage = LifecycleStage::Emerging;
        s.momentum = Momentum::Accelerating;
        assert_eq!(key_assumptions(&s).len(), 8);
    }

    #[test]
    fn test_zero_month_horizon_rejected() {
        let s = signal("t1", 80.0, 40.0, 50.0);
        assert!(TrajectoryForecaster::new().trajectory(&s, 0, as_of()).is_err());
    }

    #[test]
    fn test_horizon_months() {
        assert_eq!("medium".parse::<ForecastHorizon>().unwrap().months(), 18);
        assert!("quarterly".parse::<ForecastHorizon>().is_err());
    }
}
