//! opportunity-engine: score opportunities and forecast trends from JSON records.
//!
//! Usage:
//!   opportunity-engine --opportunities opps.json --trends trends.json
//!   opportunity-engine --opportunities opps.json --trends trends.json --matrix risk_return --horizon long --pretty
//!   opportunity-engine ... --context context.json --as-of 2025-01-01T00:00:00Z
//!
//! Configuration is read from the environment (and `.env`), see `EngineConfig`.
//! Command-line flags override the matching environment values.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use opportunity_core::{Opportunity, ScoringContext, TrendObservation};
use opportunity_engine::{EngineConfig, OpportunityEngine};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: opportunity-engine --opportunities FILE --trends FILE \
[--matrix TYPE] [--horizon short|medium|long] [--context FILE] [--as-of RFC3339] [--pretty]";

#[derive(Debug, Default)]
struct Args {
    opportunities: Option<PathBuf>,
    trends: Option<PathBuf>,
    context: Option<PathBuf>,
    matrix: Option<String>,
    horizon: Option<String>,
    as_of: Option<String>,
    pretty: bool,
}

fn parse_args(raw: &[String]) -> Result<Args> {
    let mut args = Args::default();
    let mut iter = raw.iter();

    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .with_context(|| format!("{} requires a value\n{}", flag, USAGE))
        };
        match flag.as_str() {
            "--opportunities" => args.opportunities = Some(value()?.into()),
            "--trends" => args.trends = Some(value()?.into()),
            "--context" => args.context = Some(value()?.into()),
            "--matrix" => args.matrix = Some(value()?),
            "--horizon" => args.horizon = Some(value()?),
            "--as-of" => args.as_of = Some(value()?),
            "--pretty" => args.pretty = true,
            "--help" | "-h" => bail!("{}", USAGE),
            other => bail!("unknown argument {:?}\n{}", other, USAGE),
        }
    }

    Ok(args)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "opportunity_engine=info,opportunity_scoring=info,trend_signals=info".into());

    // Logs go to stderr so stdout carries only the report
    if json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&raw)?;

    let mut config = EngineConfig::from_env().context("Failed to load engine configuration")?;
    if let Some(matrix) = &args.matrix {
        config.matrix_type = matrix.parse().context("Invalid --matrix")?;
    }
    if let Some(horizon) = &args.horizon {
        config.forecast_horizon = horizon.parse().context("Invalid --horizon")?;
    }

    let as_of = match &args.as_of {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Invalid --as-of {:?}", raw))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let opportunities_path = args.opportunities.as_deref().with_context(|| format!("--opportunities is required\n{}", USAGE))?;
    let trends_path = args.trends.as_deref().with_context(|| format!("--trends is required\n{}", USAGE))?;

    let opportunities: Vec<Opportunity> = load_json(opportunities_path)?;
    let observations: Vec<TrendObservation> = load_json(trends_path)?;
    let context: ScoringContext = match &args.context {
        Some(path) => load_json(path)?,
        None => ScoringContext::default(),
    };

    tracing::info!(
        "Loaded {} opportunities and {} trend observations",
        opportunities.len(),
        observations.len()
    );

    let engine = OpportunityEngine::new(config)?.with_context(context);
    let report = engine.run(&opportunities, &observations, as_of)?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_full_args() {
        let args = parse_args(&strings(&[
            "--opportunities",
            "opps.json",
            "--trends",
            "trends.json",
            "--matrix",
            "growth_share",
            "--horizon",
            "short",
            "--pretty",
        ]))
        .unwrap();

        assert_eq!(args.opportunities, Some(PathBuf::from("opps.json")));
        assert_eq!(args.trends, Some(PathBuf::from("trends.json")));
        assert_eq!(args.matrix.as_deref(), Some("growth_share"));
        assert_eq!(args.horizon.as_deref(), Some("short"));
        assert!(args.pretty);
    }

    #[test]
    fn test_missing_value_is_error() {
        let err = parse_args(&strings(&["--trends"])).unwrap_err();
        assert!(err.to_string().contains("--trends requires a value"));
    }

    #[test]
    fn test_unknown_flag_is_error() {
        assert!(parse_args(&strings(&["--verbose"])).is_err());
    }
}
