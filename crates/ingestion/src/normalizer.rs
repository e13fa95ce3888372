//! JobNormalizer - raw rows to delivery jobs
//!
//! Pure transformation. A row without a usable `to` is dropped; every other
//! malformed cell degrades to an absent payload. Nothing here fails.

use contracts::{columns, DeliveryJob, MediaKind, RawRow, RoutingConfig};
use metrics::counter;
use tracing::{debug, instrument};

use crate::stats::NormalizeStats;

/// Scheme prepended to links that carry none
pub const DEFAULT_URL_SCHEME: &str = "https://";

const RECOGNIZED_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Prepend the default scheme unless the link already has a recognized one
pub fn normalize_url(raw: &str) -> String {
    let url = raw.trim();
    let lower = url.to_ascii_lowercase();
    if RECOGNIZED_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        url.to_string()
    } else {
        format!("{DEFAULT_URL_SCHEME}{url}")
    }
}

/// Row normalizer
///
/// The only component that builds `DeliveryJob`s.
#[derive(Debug, Clone)]
pub struct JobNormalizer {
    routing: RoutingConfig,
}

impl JobNormalizer {
    pub fn new(routing: RoutingConfig) -> Self {
        Self { routing }
    }

    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    /// Normalize all rows, preserving order of the survivors
    pub fn normalize(&self, rows: &[RawRow]) -> Vec<DeliveryJob> {
        self.normalize_with_stats(rows).0
    }

    /// Normalize all rows and count what was kept
    #[instrument(name = "job_normalizer_normalize", skip(self, rows), fields(rows = rows.len()))]
    pub fn normalize_with_stats(&self, rows: &[RawRow]) -> (Vec<DeliveryJob>, NormalizeStats) {
        let mut stats = NormalizeStats::default();
        let mut jobs = Vec::with_capacity(rows.len());

        for (idx, row) in rows.iter().enumerate() {
            stats.rows_read += 1;
            match self.normalize_row(row) {
                Some(job) => {
                    if job.is_empty() {
                        stats.jobs_without_payload += 1;
                    }
                    jobs.push(job);
                }
                None => {
                    stats.rows_dropped += 1;
                    debug!(row = idx + 1, "Row has no recipient, skipped");
                }
            }
        }
        stats.jobs_built = jobs.len() as u64;

        counter!("broadcaster_rows_read_total").increment(stats.rows_read);
        counter!("broadcaster_rows_dropped_total").increment(stats.rows_dropped);

        (jobs, stats)
    }

    /// Normalize one row; `None` when the row has no recipient
    pub fn normalize_row(&self, row: &RawRow) -> Option<DeliveryJob> {
        let to = row.trimmed(columns::TO)?;

        let mut job = DeliveryJob::new(self.recipient_id(&to));
        job.text = row.trimmed(columns::TEXT);
        job.url = row.trimmed(columns::URL).map(|u| normalize_url(&u));

        for kind in MediaKind::ALL {
            if let Some(rel) = row.trimmed(kind.column()) {
                job.media
                    .insert(kind, self.routing.media_base_dir.join(rel));
            }
        }

        Some(job)
    }

    /// Canonical address; the identifier itself is not validated
    fn recipient_id(&self, identifier: &str) -> String {
        format!(
            "{}{}{}",
            self.routing.country_code, identifier, self.routing.address_suffix
        )
    }
}
