//! MemorySource - rows already in memory

use contracts::{ContractError, JobSource, RawRow};

/// Source backed by a vector of rows (tests, embedding hosts)
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    rows: Vec<RawRow>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

impl JobSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_rows(&mut self) -> Result<Vec<RawRow>, ContractError> {
        Ok(self.rows.clone())
    }
}
