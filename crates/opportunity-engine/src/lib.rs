//! Batch opportunity engine: configuration plus the end-to-end pipeline that
//! turns opportunity and trend records into a single report.

pub mod config;
pub mod pipeline;

pub use config::EngineConfig;
pub use pipeline::{EngineReport, OpportunityCorrelations, OpportunityEngine, RecordKind, RejectedRecord};
