//! WorkbookSource - first (or named) sheet of a spreadsheet
//!
//! The first used row holds the column names; every following row becomes a
//! `RawRow`. Blank rows are skipped, empty and error cells are absent.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};
use contracts::{CellValue, ContractError, JobSource, RawRow};
use tracing::{debug, info, instrument};

use crate::error::{IngestionError, Result};

/// Spreadsheet-backed job source (.xlsx/.xlsm/.xlsb/.xls/.ods)
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    name: String,
    path: PathBuf,
    sheet: Option<String>,
}

impl WorkbookSource {
    /// Create a new WorkbookSource; `sheet = None` reads the first sheet
    pub fn new(path: impl AsRef<Path>, sheet: Option<String>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path, sheet }
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(name = "workbook_source_read_range", skip(self), fields(path = %self.path.display()))]
    fn read_range(&self) -> Result<Range<Data>> {
        let mut workbook =
            open_workbook_auto(&self.path).map_err(|e| IngestionError::OpenFailed {
                path: self.path_str(),
                message: e.to_string(),
            })?;

        let sheet_names = workbook.sheet_names();
        let sheet = match &self.sheet {
            Some(wanted) if sheet_names.iter().any(|s| s == wanted) => wanted.clone(),
            Some(wanted) => {
                return Err(IngestionError::SheetNotFound {
                    path: self.path_str(),
                    sheet: wanted.clone(),
                })
            }
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| IngestionError::NoSheets {
                    path: self.path_str(),
                })?,
        };

        debug!(sheet = %sheet, "Reading worksheet");

        workbook
            .worksheet_range(&sheet)
            .map_err(|e| IngestionError::DecodeFailed {
                path: self.path_str(),
                message: e.to_string(),
            })
    }
}

impl JobSource for WorkbookSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_rows(&mut self) -> std::result::Result<Vec<RawRow>, ContractError> {
        let range = self.read_range()?;
        let rows = rows_from_range(&range);
        info!(source = %self.name, rows = rows.len(), "Workbook rows decoded");
        Ok(rows)
    }
}

/// Convert a worksheet range into rows keyed by the header row
pub fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    let mut lines = range.rows();
    let Some(header) = lines.next() else {
        return Vec::new();
    };

    let headers: Vec<Option<String>> = header
        .iter()
        .map(|cell| {
            let name = cell_value(cell)?.as_text();
            let name = name.trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect();

    lines
        .map(|cells| {
            headers
                .iter()
                .zip(cells)
                .filter_map(|(field, cell)| Some((field.clone()?, cell_value(cell)?)))
                .collect::<RawRow>()
        })
        .filter(|row| !row.is_empty())
        .collect()
}

fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Int(i) => Some(CellValue::Int(*i)),
        Data::Float(f) => Some(CellValue::Float(*f)),
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::Float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(_) | Data::Empty => None,
    }
}
