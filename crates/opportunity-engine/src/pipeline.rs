use chrono::{DateTime, Utc};
use opportunity_core::{EngineResult, Opportunity, ScoringContext, TrendObservation, TrendSignal};
use opportunity_scoring::{
    CorrelationAnalyzer, CorrelationConfig, MatrixGenerator, OpportunityMatrix, OpportunityScore,
    OpportunityScorer, OpportunityTrend,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use trend_signals::{
    analyze_pattern, AlertGenerator, DetectionConfig, ForecastConfig, TrajectoryForecaster,
    TrendAlert, TrendForecast, TrendPattern, TrendSignalDetector,
};

use crate::config::EngineConfig;

/// A skipped input record and why it was skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub id: String,
    pub kind: RecordKind,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Opportunity,
    Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityCorrelations {
    pub opportunity_id: String,
    pub trends: Vec<OpportunityTrend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineReport {
    pub generated_at: DateTime<Utc>,
    pub scores: Vec<OpportunityScore>,
    pub matrix: OpportunityMatrix,
    pub signals: Vec<TrendSignal>,
    pub patterns: Vec<TrendPattern>,
    pub correlations: Vec<OpportunityCorrelations>,
    pub forecasts: Vec<TrendForecast>,
    pub alerts: Vec<TrendAlert>,
    pub rejected: Vec<RejectedRecord>,
}

/// Batch pipeline: detect, score, place, correlate, forecast and alert.
pub struct OpportunityEngine {
    config: EngineConfig,
    context: ScoringContext,
    scorer: OpportunityScorer,
    detector: TrendSignalDetector,
    forecaster: TrajectoryForecaster,
    correlator: CorrelationAnalyzer,
}

impl OpportunityEngine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let scorer = OpportunityScorer::with_weights(config.weights)?;
        let detector = TrendSignalDetector::with_config(DetectionConfig {
            min_confidence: config.min_signal_confidence,
        });
        let forecaster = TrajectoryForecaster::with_config(ForecastConfig {
            noise_seed: config.forecast_noise_seed,
        });
        let correlator = CorrelationAnalyzer::new(CorrelationConfig {
            market_keywords: config.correlation_keywords.clone(),
        });

        Ok(Self {
            config,
            context: ScoringContext::default(),
            scorer,
            detector,
            forecaster,
            correlator,
        })
    }

    /// Company context applied to every scored opportunity
    pub fn with_context(mut self, context: ScoringContext) -> Self {
        self.context = context;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the whole pipeline. Invalid records are skipped and listed in
    /// [`EngineReport::rejected`]; outputs follow input order.
    pub fn run(
        &self,
        opportunities: &[Opportunity],
        observations: &[TrendObservation],
        as_of: DateTime<Utc>,
    ) -> EngineResult<EngineReport> {
        let mut rejected = Vec::new();

        let opportunities: Vec<Opportunity> = opportunities
            .iter()
            .filter(|opp| match opp.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Skipping opportunity {}: {}", opp.id, e);
                    rejected.push(RejectedRecord {
                        id: opp.id.clone(),
                        kind: RecordKind::Opportunity,
                        reason: e.to_string(),
                    });
                    false
                }
            })
            .cloned()
            .collect();

        let observations: Vec<TrendObservation> = observations
            .iter()
            .filter(|trend| match trend.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Skipping trend {}: {}", trend.id, e);
                    rejected.push(RejectedRecord {
                        id: trend.id.clone(),
                        kind: RecordKind::Trend,
                        reason: e.to_string(),
                    });
                    false
                }
            })
            .cloned()
            .collect();

        let signals = self.detector.detect_all(&observations, as_of)?;
        let scores = self.score(&opportunities)?;

        let scored: Vec<(&Opportunity, &OpportunityScore)> = opportunities.iter().zip(scores.iter()).collect();
        let matrix = MatrixGenerator::new(self.config.matrix_type).generate(&scored);

        let correlations = scored
            .par_iter()
            .map(|(opp, score)| {
                let trends = self
                    .correlator
                    .analyze(opp, f64::from(score.overall_score), &signals, as_of)?;
                Ok(OpportunityCorrelations {
                    opportunity_id: opp.id.clone(),
                    trends,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let forecasts = signals
            .iter()
            .map(|signal| self.forecaster.forecast(signal, self.config.forecast_horizon, as_of))
            .collect::<EngineResult<Vec<_>>>()?;

        let patterns = signals.iter().map(analyze_pattern).collect();
        let alerts = AlertGenerator::new().scan(&signals, as_of);

        tracing::info!(
            "Pipeline complete: {} scores, {} signals, {} forecasts, {} alerts, {} rejected",
            scores.len(),
            signals.len(),
            forecasts.len(),
            alerts.len(),
            rejected.len()
        );

        Ok(EngineReport {
            generated_at: as_of,
            scores,
            matrix,
            signals,
            patterns,
            correlations,
            forecasts,
            alerts,
            rejected,
        })
    }

    fn score(&self, opportunities: &[Opportunity]) -> EngineResult<Vec<OpportunityScore>> {
        let scores = opportunities
            .par_iter()
            .map(|opp| self.scorer.score(opp, &self.context, opportunities))
            .collect::<EngineResult<Vec<_>>>()?;

        tracing::info!("Scored {} opportunities", scores.len());
        Ok(scores)
    }
}
