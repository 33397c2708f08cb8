//! Trend signal detection, forecasting and alerting.
//!
//! Raw [`TrendObservation`](opportunity_core::TrendObservation)s are turned
//! into [`TrendSignal`](opportunity_core::TrendSignal)s by the detector; the
//! forecaster and alert generator then work from those signals.

pub mod alerts;
pub mod detector;
pub mod forecast;
pub mod patterns;
pub mod predictions;
pub mod related;

pub use alerts::{AlertGenerator, AlertSeverity, AlertType, TrendAlert};
pub use detector::{DetectionConfig, TrendSignalDetector};
pub use forecast::{ForecastConfig, ForecastHorizon, TrajectoryForecaster, TrendForecast};
pub use patterns::{analyze_pattern, PatternType, TrendPattern};
