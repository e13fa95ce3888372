//! Normalization statistics

/// Counts from one normalization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    /// Rows handed to the normalizer
    pub rows_read: u64,

    /// Rows excluded for lack of a recipient
    pub rows_dropped: u64,

    /// Jobs produced
    pub jobs_built: u64,

    /// Jobs with a recipient but nothing to send
    pub jobs_without_payload: u64,
}
