//! JsonRowsSource - JSON array of row objects
//!
//! Same field names as the workbook columns. `null`, arrays and nested
//! objects are treated as empty cells; non-object array items become empty
//! rows (and are dropped by the normalizer).

use std::path::{Path, PathBuf};

use contracts::{CellValue, ContractError, JobSource, RawRow};
use serde_json::Value;
use tracing::info;

use crate::error::{IngestionError, Result};

/// JSON-backed job source
#[derive(Debug, Clone)]
pub struct JsonRowsSource {
    name: String,
    path: PathBuf,
}

impl JsonRowsSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }

    fn load(&self) -> Result<Vec<RawRow>> {
        let path = self.path.display().to_string();
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| IngestionError::OpenFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
        parse_rows(&content).map_err(|message| IngestionError::DecodeFailed { path, message })
    }
}

impl JobSource for JsonRowsSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_rows(&mut self) -> std::result::Result<Vec<RawRow>, ContractError> {
        let rows = self.load()?;
        info!(source = %self.name, rows = rows.len(), "JSON rows decoded");
        Ok(rows)
    }
}

/// Parse a JSON document holding an array of row objects
pub fn parse_rows(content: &str) -> std::result::Result<Vec<RawRow>, String> {
    let doc: Value = serde_json::from_str(content).map_err(|e| format!("json error: {e}"))?;
    let Value::Array(items) = doc else {
        return Err("expected a JSON array of row objects".to_string());
    };

    Ok(items
        .iter()
        .map(|item| match item {
            Value::Object(fields) => fields
                .iter()
                .filter_map(|(field, value)| Some((field.trim(), cell_value(value)?)))
                .collect::<RawRow>(),
            _ => RawRow::new(),
        })
        .collect())
}

fn cell_value(value: &Value) -> Option<CellValue> {
    match value {
        Value::Bool(b) => Some(CellValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(CellValue::Int)
            .or_else(|| n.as_f64().map(CellValue::Float)),
        Value::String(s) => Some(CellValue::Text(s.clone())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
