pub mod batch;
pub mod config;
pub mod error;
pub mod ingest;
pub mod report;
pub mod scoring;
pub mod telemetry;

pub use batch::{BatchOutcome, TierSummary};
pub use scoring::{RiskEngine, RiskThresholds, RiskTier, ScoredRecord};
