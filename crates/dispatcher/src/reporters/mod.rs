//! Progress reporter implementations
//!
//! Contains LogReporter, JsonLinesReporter, MetricsReporter, RecordingReporter,
//! and FanoutReporter.

mod fanout;
mod json_lines;
mod log;
mod metrics;
mod recording;

pub use self::fanout::FanoutReporter;
pub use self::json_lines::JsonLinesReporter;
pub use self::log::LogReporter;
pub use self::metrics::MetricsReporter;
pub use self::recording::RecordingReporter;
