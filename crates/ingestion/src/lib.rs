//! # Ingestion
//!
//! Recipient sheet ingestion module.
//!
//! Responsibilities:
//! - Decode tabular sources (workbook, JSON) into `RawRow`s
//! - Normalize rows into ordered `DeliveryJob`s
//! - Report how many rows were kept or dropped
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{open_source, JobNormalizer};
//!
//! let mut source = open_source(&blueprint.source)?;
//! let rows = source.read_rows()?;
//! let jobs = JobNormalizer::new(blueprint.routing.clone()).normalize(&rows);
//! ```

mod error;
mod normalizer;
mod sources;
mod stats;

// Re-exports
pub use contracts::{DeliveryJob, JobSource, RawRow};
pub use error::{IngestionError, Result};
pub use normalizer::{normalize_url, JobNormalizer, DEFAULT_URL_SCHEME};
pub use sources::{open_source, JsonRowsSource, MemorySource, WorkbookSource};
pub use stats::NormalizeStats;
