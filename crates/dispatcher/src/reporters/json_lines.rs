//! JsonLinesReporter - appends one JSON object per event to a file

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use contracts::{ProgressEvent, ProgressReporter};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::DispatcherError;

#[derive(Serialize)]
struct Line<'a> {
    ts: String,
    #[serde(flatten)]
    event: &'a ProgressEvent,
}

/// Machine-readable progress log
pub struct JsonLinesReporter {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
    lines: u64,
}

impl JsonLinesReporter {
    /// Open (append) the output file
    pub fn new(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, DispatcherError> {
        let name = name.into();
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        info!(reporter = %name, path = %path.display(), "JsonLinesReporter opened");

        Ok(Self {
            name,
            path,
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines written so far
    pub fn lines(&self) -> u64 {
        self.lines
    }

    fn write_event(&mut self, event: &ProgressEvent) -> std::io::Result<()> {
        let line = Line {
            ts: Utc::now().to_rfc3339(),
            event,
        };
        serde_json::to_writer(&mut self.writer, &line)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl ProgressReporter for JsonLinesReporter {
    fn name(&self) -> &str {
        &self.name
    }

    fn report(&mut self, event: &ProgressEvent) {
        match self.write_event(event) {
            Ok(()) => self.lines += 1,
            Err(e) => warn!(
                reporter = %self.name,
                event = event.name(),
                error = %e,
                "Failed to write progress line"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::PayloadKind;
    use tempfile::tempdir;

    #[test]
    fn test_json_lines_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("progress.jsonl");

        let mut reporter = JsonLinesReporter::new("jsonl", &path).unwrap();
        reporter.report(&ProgressEvent::JobStarted {
            index: 1,
            total: 1,
            recipient_id: "573001112222@s.whatsapp.net".to_string(),
        });
        reporter.report(&ProgressEvent::PayloadSent {
            recipient_id: "573001112222@s.whatsapp.net".to_string(),
            kind: PayloadKind::Url,
        });
        assert_eq!(reporter.lines(), 2);
        drop(reporter);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "job_started");
        assert_eq!(lines[0]["index"], 1);
        assert_eq!(lines[1]["kind"], "url");
        assert!(lines[1]["ts"].is_string());
    }
}
