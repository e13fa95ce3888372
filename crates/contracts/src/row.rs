//! RawRow - JobSource output
//!
//! One decoded line of the recipient sheet, keyed by header name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recognized column names
pub mod columns {
    pub const TO: &str = "to";
    pub const TEXT: &str = "text";
    pub const URL: &str = "url";
    pub const IMAGE_PATH: &str = "imagePath";
    pub const VIDEO_PATH: &str = "videoPath";
    pub const AUDIO_PATH: &str = "audioPath";
    pub const FILE_PATH: &str = "filePath";

    pub const ALL: [&str; 7] = [TO, TEXT, URL, IMAGE_PATH, VIDEO_PATH, AUDIO_PATH, FILE_PATH];
}

/// Primitive cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Render the cell as text
    ///
    /// Integral floats print without a fractional part, so a phone number
    /// stored as a numeric cell keeps its digits.
    pub fn as_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                (*f as i64).to_string()
            }
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Raw tabular row
///
/// Empty cells are simply not present in the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    cells: BTreeMap<String, CellValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.cells.get(field)
    }

    /// Cell rendered as trimmed text, `None` when absent or blank
    pub fn trimmed(&self, field: &str) -> Option<String> {
        let text = self.get(field)?.as_text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (field, value) in iter {
            row.insert(field, value);
        }
        row
    }
}
