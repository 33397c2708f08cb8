use anyhow::{Context, Result};
use opportunity_scoring::{CorrelationConfig, MatrixType, ScoringWeights};
use std::env;
use std::str::FromStr;
use trend_signals::ForecastHorizon;

/// Runtime configuration for the batch pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub weights: ScoringWeights,
    pub matrix_type: MatrixType,
    pub forecast_horizon: ForecastHorizon,
    /// Seed for forecast noise; `None` keeps trajectories noise-free
    pub forecast_noise_seed: Option<u64>,
    /// Signals below this confidence are dropped before correlation
    pub min_signal_confidence: Option<f64>,
    pub correlation_keywords: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            matrix_type: MatrixType::default(),
            forecast_horizon: ForecastHorizon::Medium,
            forecast_noise_seed: None,
            min_signal_confidence: None,
            correlation_keywords: CorrelationConfig::default().market_keywords,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ScoringWeights::default();
        let weights = ScoringWeights {
            market_attractiveness: parse_or(&lookup, "SCORING_WEIGHT_MARKET_ATTRACTIVENESS", defaults.market_attractiveness)?,
            competitive_advantage: parse_or(&lookup, "SCORING_WEIGHT_COMPETITIVE_ADVANTAGE", defaults.competitive_advantage)?,
            strategic_fit: parse_or(&lookup, "SCORING_WEIGHT_STRATEGIC_FIT", defaults.strategic_fit)?,
            execution_feasibility: parse_or(&lookup, "SCORING_WEIGHT_EXECUTION_FEASIBILITY", defaults.execution_feasibility)?,
            financial_potential: parse_or(&lookup, "SCORING_WEIGHT_FINANCIAL_POTENTIAL", defaults.financial_potential)?,
            risk_assessment: parse_or(&lookup, "SCORING_WEIGHT_RISK_ASSESSMENT", defaults.risk_assessment)?,
        };
        weights.validate().context("Invalid scoring weights")?;

        let correlation_keywords = match lookup("CORRELATION_KEYWORDS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
            None => CorrelationConfig::default().market_keywords,
        };

        Ok(Self {
            weights,
            matrix_type: parse_or(&lookup, "MATRIX_TYPE", MatrixType::default())?,
            forecast_horizon: parse_or(&lookup, "FORECAST_HORIZON", ForecastHorizon::Medium)?,
            forecast_noise_seed: parse_opt(&lookup, "FORECAST_NOISE_SEED")?,
            min_signal_confidence: parse_opt(&lookup, "MIN_SIGNAL_CONFIDENCE")?,
            correlation_keywords,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

fn parse_opt<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Failed to parse {}={:?}", key, raw)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.correlation_keywords, vec!["dental", "aesthetic"]);
        assert_eq!(config.forecast_horizon, ForecastHorizon::Medium);
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("MATRIX_TYPE", "risk-return"),
            ("FORECAST_HORIZON", "long"),
            ("FORECAST_NOISE_SEED", "42"),
            ("MIN_SIGNAL_CONFIDENCE", "55.5"),
            ("CORRELATION_KEYWORDS", " orthodontic, ,implant "),
        ]))
        .unwrap();

        assert_eq!(config.matrix_type, MatrixType::RiskReturn);
        assert_eq!(config.forecast_horizon, ForecastHorizon::Long);
        assert_eq!(config.forecast_noise_seed, Some(42));
        assert_eq!(config.min_signal_confidence, Some(55.5));
        assert_eq!(config.correlation_keywords, vec!["orthodontic", "implant"]);
    }

    #[test]
    fn test_rebalanced_weights_accepted() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("SCORING_WEIGHT_MARKET_ATTRACTIVENESS", "0.30"),
            ("SCORING_WEIGHT_RISK_ASSESSMENT", "0.0"),
        ]))
        .unwrap();
        assert_eq!(config.weights.market_attractiveness, 0.30);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let err = EngineConfig::from_lookup(lookup(&[("SCORING_WEIGHT_STRATEGIC_FIT", "0.5")])).unwrap_err();
        assert!(err.to_string().contains("Invalid scoring weights"));
    }

    #[test]
    fn test_parse_errors_carry_key() {
        let err = EngineConfig::from_lookup(lookup(&[("FORECAST_NOISE_SEED", "abc")])).unwrap_err();
        assert!(err.to_string().contains("FORECAST_NOISE_SEED"));

        let err = EngineConfig::from_lookup(lookup(&[("MATRIX_TYPE", "pie_chart")])).unwrap_err();
        assert!(err.to_string().contains("MATRIX_TYPE"));
    }
}
