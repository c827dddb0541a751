use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Extracted { pages: usize },
    NotFound,
    Failed { message: String },
}

/// What happened to one block of the output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub filename: String,
    pub path: String,
    pub status: FileStatus,
    pub bytes_written: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub total_files: usize,
    pub extracted: usize,
    pub not_found: usize,
    pub failed: usize,
    pub total_pages: usize,
    pub bytes_written: u64,
    pub duration: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub output_path: String,
    pub files: Vec<FileReport>,
    pub summary: ExtractionSummary,
    pub extraction_time: DateTime<Utc>,
}

impl ExtractionReport {
    pub fn new(output_path: &Path, files: Vec<FileReport>, duration: Duration) -> Self {
        let summary = summarize(&files, duration);

        Self {
            output_path: output_path.display().to_string(),
            files,
            summary,
            extraction_time: Utc::now(),
        }
    }

    /// Blocks whose body is a not-found or error message.
    pub fn problems(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| !matches!(f.status, FileStatus::Extracted { .. }))
    }

    pub fn has_problems(&self) -> bool {
        self.problems().next().is_some()
    }
}

fn summarize(files: &[FileReport], duration: Duration) -> ExtractionSummary {
    let mut summary = ExtractionSummary {
        total_files: files.len(),
        extracted: 0,
        not_found: 0,
        failed: 0,
        total_pages: 0,
        bytes_written: 0,
        duration,
    };

    for file in files {
        summary.bytes_written += file.bytes_written;
        match file.status {
            FileStatus::Extracted { pages } => {
                summary.extracted += 1;
                summary.total_pages += pages;
            }
            FileStatus::NotFound => summary.not_found += 1,
            FileStatus::Failed { .. } => summary.failed += 1,
        }
    }

    summary
}
