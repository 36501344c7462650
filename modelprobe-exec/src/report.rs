//! CSV report of a finished run.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use modelprobe_core::AttemptResult;
use serde::{Deserialize, Serialize};

pub const REPORT_PREFIX: &str = "model_test_report_";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode report: {0}")]
    Csv(#[from] csv::Error),
}

/// One CSV row. Column order is the field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub timestamp: String,
    pub provider_name: String,
    pub category: String,
    pub target_id: String,
    pub status: String,
    pub error_code: String,
    pub error_category: String,
    pub remedy: String,
    pub latency_ms: u64,
    pub retries: u32,
    pub response_content: String,
}

impl From<&AttemptResult> for ReportRow {
    fn from(r: &AttemptResult) -> Self {
        Self {
            timestamp: r.timestamp.to_rfc3339(),
            provider_name: r.provider_name.clone(),
            category: r.category.clone().unwrap_or_default(),
            target_id: r.target_id.clone(),
            status: r.status.to_string(),
            error_code: r.error_code.clone(),
            error_category: r.error_category.clone(),
            remedy: r.remedy.clone(),
            latency_ms: r.latency_ms,
            retries: r.retries_used,
            response_content: r.raw_response.clone(),
        }
    }
}

pub fn report_file_name(now: DateTime<Local>) -> String {
    format!("{REPORT_PREFIX}{}.csv", now.format("%Y%m%d_%H%M%S"))
}

pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, results: &[AttemptResult]) -> Result<PathBuf, ReportError> {
        self.write_at(results, Local::now())
    }

    /// Writes one row per result into a fresh file named after `now`.
    /// An existing report is never overwritten: a numeric suffix is added.
    pub fn write_at(
        &self,
        results: &[AttemptResult],
        now: DateTime<Local>,
    ) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ReportError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let (path, file) = self.create_unique(&report_file_name(now))?;

        let mut writer = csv::Writer::from_writer(file);
        for result in results {
            writer.serialize(ReportRow::from(result))?;
        }
        if results.is_empty() {
            writer.write_record(HEADER)?;
        }
        writer.flush().map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), rows = results.len(), "report written");
        Ok(path)
    }

    fn create_unique(&self, file_name: &str) -> Result<(PathBuf, File), ReportError> {
        let stem = file_name.trim_end_matches(".csv");
        let mut n = 0u32;
        loop {
            let candidate = if n == 0 {
                self.dir.join(file_name)
            } else {
                self.dir.join(format!("{stem}_{n}.csv"))
            };
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(source) => {
                    return Err(ReportError::Io {
                        path: candidate,
                        source,
                    })
                }
            }
        }
    }
}

const HEADER: [&str; 11] = [
    "timestamp",
    "provider_name",
    "category",
    "target_id",
    "status",
    "error_code",
    "error_category",
    "remedy",
    "latency_ms",
    "retries",
    "response_content",
];

pub fn read_report(path: &Path) -> Result<Vec<ReportRow>, ReportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<ReportRow>, _>>()?;
    Ok(rows)
}
