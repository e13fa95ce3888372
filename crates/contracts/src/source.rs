//! JobSource trait - tabular data source abstraction
//!
//! Decouples row decoding (workbook, JSON, in-memory) from normalization.

use crate::{ContractError, RawRow};

/// Tabular data source
///
/// A source either yields all of its rows or fails as a whole; a failure here
/// means no job queue can be built.
pub trait JobSource {
    /// Source name (used for logging)
    fn name(&self) -> &str;

    /// Decode every data row, in source order
    fn read_rows(&mut self) -> Result<Vec<RawRow>, ContractError>;
}
