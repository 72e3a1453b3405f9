// file: src/exporter/json.rs
// description: json export of clone run reports

use crate::error::{CloneError, Result};
use crate::models::{CloneOutcome, RunReport};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportedOutcome {
    pub index: usize,
    pub name: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportManifest {
    pub exported_at: String,
    pub destination: String,
    pub started_at: String,
    pub finished_at: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<ExportedOutcome>,
}

impl ReportManifest {
    pub fn from_report(report: &RunReport) -> Self {
        let outcomes = report
            .outcomes()
            .iter()
            .enumerate()
            .map(|(index, outcome)| match outcome {
                CloneOutcome::Cloned { name, path } => ExportedOutcome {
                    index,
                    name: name.clone(),
                    status: "cloned",
                    path: Some(path.display().to_string()),
                    error: None,
                },
                CloneOutcome::Failed { name, error } => ExportedOutcome {
                    index,
                    name: name.clone(),
                    status: "failed",
                    path: None,
                    error: Some(error.to_string()),
                },
            })
            .collect();

        Self {
            exported_at: Utc::now().to_rfc3339(),
            destination: report.destination().display().to_string(),
            started_at: report.started_at().to_rfc3339(),
            finished_at: report.finished_at().to_rfc3339(),
            total: report.len(),
            succeeded: report.succeeded(),
            failed: report.failed(),
            outcomes,
        }
    }
}

impl JsonExporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Result<Self> {
        let output_path = output_path.into();
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { output_path })
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn export(&self, report: &RunReport, pretty: bool) -> Result<ReportManifest> {
        let manifest = ReportManifest::from_report(report);

        let json = if pretty {
            serde_json::to_string_pretty(&manifest)
        } else {
            serde_json::to_string(&manifest)
        }
        .map_err(|e| CloneError::Serialization(e.to_string()))?;

        fs::write(&self.output_path, json)?;

        info!(
            "Report written to {} ({} outcomes)",
            self.output_path.display(),
            manifest.total
        );
        Ok(manifest)
    }
}
