//! JobSource implementations
//!
//! Contains WorkbookSource, JsonRowsSource, and MemorySource.

mod json_rows;
mod memory;
mod workbook;

pub use self::json_rows::JsonRowsSource;
pub use self::memory::MemorySource;
pub use self::workbook::WorkbookSource;

use contracts::{JobSource, SourceConfig, SourceFormat};
use tracing::{debug, instrument};

use crate::error::{IngestionError, Result};

/// Create a JobSource from configuration
///
/// The format is inferred from the file extension.
#[instrument(name = "ingestion_open_source", skip(config), fields(path = %config.path.display()))]
pub fn open_source(config: &SourceConfig) -> Result<Box<dyn JobSource>> {
    let format = SourceFormat::from_path(&config.path).ok_or_else(|| {
        IngestionError::UnsupportedFormat {
            path: config.path.display().to_string(),
        }
    })?;

    debug!(?format, "Opening job source");

    match format {
        SourceFormat::Workbook => Ok(Box::new(WorkbookSource::new(
            &config.path,
            config.sheet.clone(),
        ))),
        SourceFormat::JsonRows => Ok(Box::new(JsonRowsSource::new(&config.path))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_open_source_by_extension() {
        let config = SourceConfig {
            path: PathBuf::from("rows.json"),
            sheet: None,
        };
        let source = open_source(&config).unwrap();
        assert_eq!(source.name(), "rows.json");

        let config = SourceConfig {
            path: PathBuf::from("mensajes.xlsx"),
            sheet: Some("Hoja1".to_string()),
        };
        assert!(open_source(&config).is_ok());
    }

    #[test]
    fn test_open_source_unsupported() {
        let config = SourceConfig {
            path: PathBuf::from("rows.csv"),
            sheet: None,
        };
        let result = open_source(&config);
        assert!(matches!(
            result,
            Err(IngestionError::UnsupportedFormat { .. })
        ));
    }
}
