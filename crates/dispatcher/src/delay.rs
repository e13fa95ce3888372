//! DelayPolicy - pacing between recipients
//!
//! Configured before a run (default or operator override). A run holds a
//! shared borrow of the policy for its whole duration, so `set` cannot be
//! called while jobs are being dispatched.

use std::fmt;
use std::time::Duration;

use contracts::{DelayConfig, DEFAULT_DELAY_SECONDS};
use tracing::{info, warn};

/// Smallest meaningful delay
pub const MIN_DELAY_MILLIS: u64 = 1000;

/// Why an operator value was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelayFallback {
    /// Input was not a whole number
    NotANumber(String),
    /// Input was below one second
    BelowMinimum(i64),
}

impl fmt::Display for DelayFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber(input) => write!(f, "'{input}' is not a whole number of seconds"),
            Self::BelowMinimum(secs) => write!(f, "{secs}s is below the 1s minimum"),
        }
    }
}

/// Result of setting the delay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelayUpdate {
    /// Operator value accepted
    Applied { millis: u64 },
    /// Operator value rejected, default in effect
    FellBack { millis: u64, reason: DelayFallback },
}

impl DelayUpdate {
    /// Effective delay after the update
    pub fn millis(&self) -> u64 {
        match self {
            Self::Applied { millis } | Self::FellBack { millis, .. } => *millis,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::FellBack { .. })
    }

    /// Operator-facing message
    pub fn notice(&self) -> String {
        match self {
            Self::Applied { millis } => {
                format!("Delay set to {} seconds between messages", millis / 1000)
            }
            Self::FellBack { millis, reason } => format!(
                "Invalid delay ({reason}); using default of {} seconds",
                millis / 1000
            ),
        }
    }
}

/// Inter-job delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    delay_millis: u64,
    default_millis: u64,
}

impl DelayPolicy {
    /// Policy whose default (and initial value) is `default_seconds`
    ///
    /// A default below one second is replaced by the built-in 25 s.
    pub fn new(default_seconds: u64) -> Self {
        let secs = if default_seconds < 1 {
            DEFAULT_DELAY_SECONDS
        } else {
            default_seconds
        };
        let default_millis = secs.saturating_mul(1000);
        Self {
            delay_millis: default_millis,
            default_millis,
        }
    }

    pub fn from_config(config: &DelayConfig) -> Self {
        Self::new(config.default_seconds)
    }

    /// Parse operator input as whole seconds
    ///
    /// Unparseable input or a value below 1 falls back to the default.
    pub fn set(&mut self, candidate: &str) -> DelayUpdate {
        let input = candidate.trim();
        let update = match input.parse::<i64>() {
            Ok(secs) if secs >= 1 => {
                self.delay_millis = (secs as u64).saturating_mul(1000);
                DelayUpdate::Applied {
                    millis: self.delay_millis,
                }
            }
            Ok(secs) => self.fall_back(DelayFallback::BelowMinimum(secs)),
            Err(_) => self.fall_back(DelayFallback::NotANumber(input.to_string())),
        };

        match &update {
            DelayUpdate::Applied { millis } => info!(delay_ms = millis, "Delay configured"),
            DelayUpdate::FellBack { millis, reason } => {
                warn!(delay_ms = millis, reason = %reason, "Invalid delay, using default")
            }
        }
        update
    }

    fn fall_back(&mut self, reason: DelayFallback) -> DelayUpdate {
        self.delay_millis = self.default_millis;
        DelayUpdate::FellBack {
            millis: self.delay_millis,
            reason,
        }
    }

    /// Effective delay in milliseconds
    pub fn get(&self) -> u64 {
        self.delay_millis
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.delay_millis)
    }

    pub fn default_millis(&self) -> u64 {
        self.default_millis
    }

    /// `jobs × delay`, in seconds
    pub fn estimate_total_seconds(&self, jobs: usize) -> u64 {
        (jobs as u64).saturating_mul(self.delay_millis) / 1000
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_SECONDS)
    }
}
