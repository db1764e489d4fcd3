//! Downloadable artifacts: single results and history bundles.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::api::CalculationResult;
use crate::history::HistoryEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unable to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to encode export: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("unable to write csv export: {0}")]
    Csv(#[from] csv::Error),
}

/// Threshold values embedded in every history export for reference.
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdSnapshot {
    pub no_penalty: &'static str,
    pub fixed_penalty: &'static str,
    pub progressive_penalty: &'static str,
}

impl ThresholdSnapshot {
    pub const fn standard() -> Self {
        Self {
            no_penalty: "0-30 minutes: no penalty",
            fixed_penalty: "31-60 minutes: ₹500 fixed",
            progressive_penalty: "61+ minutes: ₹1000 + ₹25 per minute over 60",
        }
    }
}

#[derive(Debug, Serialize)]
struct HistoryBundle<'a> {
    exported_at: String,
    total_entries: usize,
    history: Vec<&'a HistoryEntry>,
    thresholds: ThresholdSnapshot,
}

#[derive(Debug, Serialize)]
struct HistoryCsvRow<'a> {
    id: &'a str,
    timestamp: &'a str,
    delay_minutes: u32,
    penalty_amount: f64,
    penalty_applied: bool,
    rule: &'a str,
    service_type: &'a str,
}

/// Directory receiving exported files; created on first write.
#[derive(Debug, Clone)]
pub struct ExportDirectory {
    dir: PathBuf,
}

impl ExportDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes `ai-bos-result-<request_id>.json`.
    pub fn save_result(&self, result: &CalculationResult) -> Result<PathBuf, ExportError> {
        let path = self.prepare(&format!(
            "ai-bos-result-{}.json",
            file_safe(&result.request_id)
        ))?;
        let encoded = serde_json::to_string_pretty(result)?;
        write_file(&path, encoded)?;
        Ok(path)
    }

    pub fn export_history<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a HistoryEntry>,
        format: ExportFormat,
        at: DateTime<Local>,
    ) -> Result<PathBuf, ExportError> {
        let stem = format!("ai-bos-history-{}", at.format("%Y%m%d-%H%M%S"));
        let path = unclaimed(self.prepare(&format!("{stem}.{}", format.extension()))?);
        let entries: Vec<&HistoryEntry> = entries.into_iter().collect();

        match format {
            ExportFormat::Json => {
                let bundle = HistoryBundle {
                    exported_at: at.to_rfc3339(),
                    total_entries: entries.len(),
                    history: entries,
                    thresholds: ThresholdSnapshot::standard(),
                };
                write_file(&path, serde_json::to_string_pretty(&bundle)?)?;
            }
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_path(&path)?;
                for entry in entries {
                    writer.serialize(HistoryCsvRow {
                        id: &entry.id,
                        timestamp: &entry.timestamp,
                        delay_minutes: entry.delay,
                        penalty_amount: entry.penalty,
                        penalty_applied: entry.full_result.calculation_result.penalty_applied,
                        rule: &entry.rule,
                        service_type: entry.full_result.service_type(),
                    })?;
                }
                writer.flush().map_err(|source| ExportError::Io {
                    path: path.clone(),
                    source,
                })?;
            }
        }

        Ok(path)
    }

    fn prepare(&self, file_name: &str) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir).map_err(|source| ExportError::Io {
            path: self.dir.clone(),
            source,
        })?;
        Ok(self.dir.join(file_name))
    }
}

/// Same-second exports get a `-2`, `-3`, ... suffix instead of replacing
/// an earlier file.
fn unclaimed(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();

    (2u32..)
        .map(|n| path.with_file_name(format!("{stem}-{n}.{extension}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(path)
}

fn write_file(path: &Path, contents: String) -> Result<(), ExportError> {
    fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn file_safe(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
