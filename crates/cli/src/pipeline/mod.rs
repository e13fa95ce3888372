//! Broadcast orchestration module.

mod orchestrator;
mod stats;

pub use orchestrator::{load_jobs, Pipeline, PipelineConfig};
pub use stats::PipelineStats;
